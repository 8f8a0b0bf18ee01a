use strata_geom::Vec3;

pub type EntityKind = u16;

/// Slot type meaning "empty".
pub const NO_ENTITY: EntityKind = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartKind {
    Body,
    Head,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelPart {
    pub kind: PartKind,
    pub offset: Vec3,
    pub rotation: Vec3,
}

/// Posable part list rebuilt whenever an entity slot is (re)filled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityModel {
    pub parts: Vec<ModelPart>,
}

impl EntityModel {
    pub fn build(kind: EntityKind) -> Self {
        if kind == NO_ENTITY {
            return Self::default();
        }
        Self {
            parts: vec![
                ModelPart {
                    kind: PartKind::Body,
                    offset: Vec3::ZERO,
                    rotation: Vec3::ZERO,
                },
                ModelPart {
                    kind: PartKind::Head,
                    offset: Vec3::new(0.0, 1.5, 0.0),
                    rotation: Vec3::ZERO,
                },
            ],
        }
    }

    /// Pitch of the first head part, if any.
    pub fn head_pitch(&self) -> Option<f32> {
        self.parts
            .iter()
            .find(|p| p.kind == PartKind::Head)
            .map(|p| p.rotation.x)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub position: Vec3,
    /// Degrees; x = pitch, y = yaw, z = roll.
    pub rotation: Vec3,
    pub model: EntityModel,
}

impl Entity {
    #[inline]
    pub fn is_live(&self) -> bool {
        self.kind != NO_ENTITY
    }
}

/// Fixed-capacity table indexed by externally assigned entity ids.
pub struct EntityTable {
    slots: Vec<Entity>,
}

impl EntityTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Entity::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Overwrites slot `id`. Returns false for ids outside the table.
    pub fn add(&mut self, id: usize, kind: EntityKind, position: Vec3, rotation: Vec3) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            log::debug!(target: "entity", "add: id {id} out of range");
            return false;
        };
        *slot = Entity {
            kind,
            position,
            rotation,
            model: EntityModel::build(kind),
        };
        log::trace!(target: "entity", "add {id} kind={kind}");
        true
    }

    /// Moves an entity. The body keeps only yaw; pitch goes to the head.
    pub fn teleport(&mut self, id: usize, position: Vec3, rotation: Vec3) -> bool {
        let Some(e) = self.slots.get_mut(id) else {
            log::debug!(target: "entity", "teleport: id {id} out of range");
            return false;
        };
        e.position = position;
        e.rotation = Vec3::new(0.0, rotation.y, 0.0);
        for part in e.model.parts.iter_mut().filter(|p| p.kind == PartKind::Head) {
            part.rotation.x = rotation.x;
        }
        true
    }

    pub fn remove(&mut self, id: usize) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            log::debug!(target: "entity", "remove: id {id} out of range");
            return false;
        };
        let was_live = slot.is_live();
        *slot = Entity::default();
        was_live
    }

    pub fn get(&self, id: usize) -> Option<&Entity> {
        self.slots.get(id).filter(|e| e.is_live())
    }

    /// Live entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.slots.iter().enumerate().filter(|(_, e)| e.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|e| e.is_live()).count()
    }

    pub fn clear(&mut self) {
        self.slots.fill(Entity::default());
    }
}
