use hashbrown::HashMap;
use strata_chunk::{ChunkCoord, ChunkDims, ChunkHandle, Face};

use crate::chunk::Chunk;

struct Slot {
    generation: u32,
    chunk: Option<Chunk>,
}

/// Owns every loaded chunk.
///
/// Chunks live in an arena of slots addressed by [`ChunkHandle`]; a slot's
/// generation is bumped when its chunk is removed so old handles stop
/// resolving. Insertion order is kept as a doubly-linked list threaded
/// through the chunks, and a coordinate map gives O(1) lookup.
pub struct ChunkStore {
    dims: ChunkDims,
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_coord: HashMap<ChunkCoord, ChunkHandle>,
    head: Option<ChunkHandle>,
    tail: Option<ChunkHandle>,
}

impl ChunkStore {
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            slots: Vec::new(),
            free: Vec::new(),
            by_coord: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    pub fn lookup(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.by_coord.get(&coord).copied()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn get(&self, h: ChunkHandle) -> Option<&Chunk> {
        let slot = self.slots.get(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        slot.chunk.as_ref()
    }

    pub fn get_mut(&mut self, h: ChunkHandle) -> Option<&mut Chunk> {
        let slot = self.slots.get_mut(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        slot.chunk.as_mut()
    }

    pub fn get_at(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.lookup(coord).and_then(|h| self.get(h))
    }

    pub fn head(&self) -> Option<ChunkHandle> {
        self.head
    }

    pub fn tail(&self) -> Option<ChunkHandle> {
        self.tail
    }

    pub fn next_of(&self, h: ChunkHandle) -> Option<ChunkHandle> {
        self.get(h).and_then(|c| c.next)
    }

    pub fn prev_of(&self, h: ChunkHandle) -> Option<ChunkHandle> {
        self.get(h).and_then(|c| c.prev)
    }

    /// Chunks in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cur: self.head,
        }
    }

    pub fn handles(&self) -> Vec<ChunkHandle> {
        self.iter().map(|(h, _)| h).collect()
    }

    /// Adds an empty chunk at the tail and wires neighbour links both ways.
    /// Returns `None` without touching anything if `coord` is already loaded.
    pub fn insert(&mut self, coord: ChunkCoord) -> Option<ChunkHandle> {
        if self.by_coord.contains_key(&coord) {
            return None;
        }
        let h = match self.free.pop() {
            Some(index) => ChunkHandle::new(index, self.slots[index as usize].generation),
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    chunk: None,
                });
                ChunkHandle::new((self.slots.len() - 1) as u32, 0)
            }
        };

        let mut chunk = Chunk::new(coord, self.dims);
        for face in Face::ALL {
            let Some(nh) = self.lookup(coord.neighbor(face)) else {
                continue;
            };
            chunk.neighbours[face.index()] = Some(nh);
            if let Some(n) = self.get_mut(nh) {
                n.neighbours[face.opposite().index()] = Some(h);
            }
        }

        chunk.prev = self.tail;
        if let Some(t) = self.tail.and_then(|t| self.get_mut(t)) {
            t.next = Some(h);
        }
        self.tail = Some(h);
        if self.head.is_none() {
            self.head = Some(h);
        }

        self.slots[h.index as usize].chunk = Some(chunk);
        self.by_coord.insert(coord, h);
        Some(h)
    }

    /// Unlinks and returns the chunk at `coord`; its neighbours forget it.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let h = self.by_coord.remove(&coord)?;
        self.detach(h)
    }

    pub fn remove_handle(&mut self, h: ChunkHandle) -> Option<Chunk> {
        let coord = self.get(h)?.coord;
        self.remove(coord)
    }

    fn detach(&mut self, h: ChunkHandle) -> Option<Chunk> {
        let slot = self.slots.get_mut(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        let chunk = slot.chunk.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);

        match chunk.prev.and_then(|p| self.get_mut(p)) {
            Some(p) => p.next = chunk.next,
            None => self.head = chunk.next,
        }
        match chunk.next.and_then(|n| self.get_mut(n)) {
            Some(n) => n.prev = chunk.prev,
            None => self.tail = chunk.prev,
        }

        for face in Face::ALL {
            if let Some(n) = chunk.neighbours[face.index()].and_then(|nh| self.get_mut(nh)) {
                n.neighbours[face.opposite().index()] = None;
            }
        }
        Some(chunk)
    }

    /// Removes chunks from the head until the store is empty.
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        while let Some(h) = self.head {
            let Some(coord) = self.get(h).map(|c| c.coord) else {
                break;
            };
            self.remove(coord);
            removed += 1;
        }
        removed
    }

    /// True when every existing neighbour has finished lighting.
    pub fn neighbours_lit(&self, h: ChunkHandle) -> bool {
        let Some(c) = self.get(h) else {
            return false;
        };
        c.neighbours
            .iter()
            .flatten()
            .all(|&nh| self.get(nh).is_some_and(|n| n.is_light_generated))
    }

    /// Built, not building, and no neighbour building.
    pub fn is_evictable(&self, h: ChunkHandle) -> bool {
        let Some(c) = self.get(h) else {
            return false;
        };
        if !c.is_built || c.is_building {
            return false;
        }
        c.neighbours
            .iter()
            .flatten()
            .all(|&nh| self.get(nh).is_none_or(|n| !n.is_building))
    }

    /// Walks the list and coordinate map and reports the first inconsistency.
    pub fn check_links(&self) -> Result<(), String> {
        let mut prev: Option<ChunkHandle> = None;
        let mut cur = self.head;
        let mut count = 0usize;
        while let Some(h) = cur {
            let c = self
                .get(h)
                .ok_or_else(|| format!("dangling handle {h:?} in list"))?;
            if c.prev != prev {
                return Err(format!("{:?}: prev {:?} != {:?}", c.coord, c.prev, prev));
            }
            if self.by_coord.get(&c.coord) != Some(&h) {
                return Err(format!("{:?}: coordinate map out of sync", c.coord));
            }
            for face in Face::ALL {
                let expected = self.lookup(c.coord.neighbor(face));
                if c.neighbours[face.index()] != expected {
                    return Err(format!("{:?}: stale {:?} neighbour", c.coord, face));
                }
            }
            count += 1;
            if count > self.by_coord.len() {
                return Err("list longer than coordinate map (cycle?)".to_string());
            }
            prev = Some(h);
            cur = c.next;
        }
        if prev != self.tail {
            return Err(format!("tail {:?} != last {:?}", self.tail, prev));
        }
        if count != self.by_coord.len() {
            return Err(format!("list has {count} chunks, map has {}", self.by_coord.len()));
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    store: &'a ChunkStore,
    cur: Option<ChunkHandle>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (ChunkHandle, &'a Chunk);

    fn next(&mut self) -> Option<Self::Item> {
        let h = self.cur?;
        let c = self.store.get(h)?;
        self.cur = c.next;
        Some((h, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ChunkStore {
        ChunkStore::new(ChunkDims::new(4, 4, 4))
    }

    #[test]
    fn insert_wires_neighbours_both_ways() {
        let mut s = store();
        let a = s.insert(ChunkCoord::new(0, 0, 0)).unwrap();
        let b = s.insert(ChunkCoord::new(1, 0, 0)).unwrap();
        assert_eq!(s.get(a).unwrap().neighbour(Face::PosX), Some(b));
        assert_eq!(s.get(b).unwrap().neighbour(Face::NegX), Some(a));
        assert_eq!(s.get(a).unwrap().neighbour(Face::PosY), None);
        s.check_links().unwrap();
    }

    #[test]
    fn duplicate_insert_keeps_first_chunk() {
        let mut s = store();
        let a = s.insert(ChunkCoord::new(2, -1, 3)).unwrap();
        s.get_mut(a).unwrap().has_started_generating = true;
        assert!(s.insert(ChunkCoord::new(2, -1, 3)).is_none());
        assert_eq!(s.len(), 1);
        assert!(s.get(a).unwrap().has_started_generating);
    }

    #[test]
    fn remove_patches_list_and_neighbours() {
        let mut s = store();
        let a = s.insert(ChunkCoord::new(0, 0, 0)).unwrap();
        let b = s.insert(ChunkCoord::new(0, 1, 0)).unwrap();
        let c = s.insert(ChunkCoord::new(0, 2, 0)).unwrap();
        let removed = s.remove(ChunkCoord::new(0, 1, 0)).unwrap();
        assert_eq!(removed.coord, ChunkCoord::new(0, 1, 0));
        assert_eq!(s.next_of(a), Some(c));
        assert_eq!(s.prev_of(c), Some(a));
        assert_eq!(s.get(a).unwrap().neighbour(Face::PosY), None);
        assert_eq!(s.get(c).unwrap().neighbour(Face::NegY), None);
        assert!(s.get(b).is_none());
        assert!(s.remove(ChunkCoord::new(0, 1, 0)).is_none());
        s.check_links().unwrap();
    }

    #[test]
    fn reused_slot_invalidates_old_handle() {
        let mut s = store();
        let a = s.insert(ChunkCoord::new(0, 0, 0)).unwrap();
        s.remove(ChunkCoord::new(0, 0, 0));
        let b = s.insert(ChunkCoord::new(5, 5, 5)).unwrap();
        assert_eq!(a.index, b.index);
        assert_ne!(a.generation, b.generation);
        assert!(s.get(a).is_none());
        assert_eq!(s.get(b).unwrap().coord, ChunkCoord::new(5, 5, 5));
    }

    #[test]
    fn eviction_requires_quiet_neighbours() {
        let mut s = store();
        let a = s.insert(ChunkCoord::new(0, 0, 0)).unwrap();
        let b = s.insert(ChunkCoord::new(0, 0, 1)).unwrap();
        for h in [a, b] {
            s.get_mut(h).unwrap().is_built = true;
        }
        assert!(s.is_evictable(b));
        s.get_mut(a).unwrap().is_building = true;
        assert!(!s.is_evictable(b));
        assert!(!s.is_evictable(a));
    }

    #[test]
    fn clear_empties_store() {
        let mut s = store();
        for x in 0..4 {
            s.insert(ChunkCoord::new(x, 0, 0));
        }
        assert_eq!(s.clear(), 4);
        assert!(s.is_empty());
        assert!(s.head().is_none());
        s.check_links().unwrap();
    }
}
