/// Stable reference to a chunk slot.
///
/// The generation changes every time the slot is reused, so a handle kept
/// past its chunk's eviction no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkHandle {
    pub index: u32,
    pub generation: u32,
}

impl ChunkHandle {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}
