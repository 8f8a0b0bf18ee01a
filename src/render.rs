use strata_chunk::{ChunkCoord, ChunkMesh};
use strata_geom::Vec3;

use crate::entity::Entity;
use crate::world::World;

/// Opaque texture/shader ids owned by the rendering layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Material {
    pub texture: Option<u32>,
    pub shader: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    Opaque,
    Transparent,
}

/// Draw primitives the world submits to.
pub trait RenderBackend {
    fn prepare(&mut self, material: &Material);
    fn set_backface_culling(&mut self, enabled: bool);
    fn draw_chunk_mesh(&mut self, coord: ChunkCoord, origin: Vec3, mesh: &ChunkMesh, pass: RenderPass);
    fn draw_entity(&mut self, id: usize, entity: &Entity);
    fn finish(&mut self) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Unit view direction.
    pub forward: Vec3,
    pub fovy_deg: f32,
}

impl Camera {
    pub fn new(position: Vec3, forward: Vec3, fovy_deg: f32) -> Self {
        Self {
            position,
            forward: forward.normalized(),
            fovy_deg,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub considered: usize,
    pub culled: usize,
    pub submitted: usize,
}

/// Backend that records submissions instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub prepared: Option<Material>,
    pub calls: Vec<(ChunkCoord, RenderPass)>,
    pub entities: Vec<usize>,
    pub culling_toggles: Vec<bool>,
    pub quads: usize,
    pub frames: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(&self, pass: RenderPass) -> Vec<ChunkCoord> {
        self.calls
            .iter()
            .filter(|(_, p)| *p == pass)
            .map(|(c, _)| *c)
            .collect()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
        self.entities.clear();
        self.culling_toggles.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn prepare(&mut self, material: &Material) {
        self.prepared = Some(*material);
    }

    fn set_backface_culling(&mut self, enabled: bool) {
        self.culling_toggles.push(enabled);
    }

    fn draw_chunk_mesh(&mut self, coord: ChunkCoord, _origin: Vec3, mesh: &ChunkMesh, pass: RenderPass) {
        self.quads += mesh.quad_count();
        self.calls.push((coord, pass));
    }

    fn draw_entity(&mut self, id: usize, _entity: &Entity) {
        self.entities.push(id);
    }

    fn finish(&mut self) {
        self.frames += 1;
    }
}

impl World {
    /// Submits every visible chunk back to front, opaque pass first, then entities.
    ///
    /// A chunk farther than one chunk width is culled when the chord between
    /// the unit direction to its centre and the camera forward exceeds
    /// `fovy + frustum_margin`.
    pub fn draw_world(&self, camera: &Camera, backend: &mut dyn RenderBackend) -> DrawStats {
        let mut stats = DrawStats::default();
        backend.prepare(&self.material);

        let frustum = camera.fovy_deg.to_radians() + self.config().frustum_margin;
        let near = self.dims().sx as f32;
        let mut sorted = Vec::with_capacity(self.chunks().len());
        for (h, chunk) in self.chunks().iter() {
            stats.considered += 1;
            let center = chunk.center();
            let dist = center.distance(camera.position);
            let dir = (center - camera.position).normalized();
            if dist > near && dir.distance(camera.forward) > frustum {
                stats.culled += 1;
                continue;
            }
            sorted.push((h, dist));
        }
        // Stable: equal distances keep list order.
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        stats.submitted = sorted.len();

        for &(h, _) in &sorted {
            if let Some(c) = self.chunks().get(h) {
                backend.draw_chunk_mesh(c.coord, c.block_origin, &c.mesh, RenderPass::Opaque);
            }
        }
        backend.set_backface_culling(false);
        for &(h, _) in &sorted {
            if let Some(c) = self.chunks().get(h) {
                backend.draw_chunk_mesh(c.coord, c.block_origin, &c.mesh_transparent, RenderPass::Transparent);
            }
        }
        backend.set_backface_culling(true);

        for (id, e) in self.entities().iter() {
            backend.draw_entity(id, e);
        }
        backend.finish();
        log::trace!(
            target: "render",
            "drew {} of {} chunks ({} culled)",
            stats.submitted,
            stats.considered,
            stats.culled
        );
        stats
    }
}
