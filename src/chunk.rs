use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims, ChunkHandle, ChunkMesh, Face, LightGrid};
use strata_geom::Vec3;

/// Where a chunk sits in the generate/light/build pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Fresh,
    QueuedForGeneration,
    Generated,
    QueuedForBuild,
    Built,
}

/// One loaded chunk.
///
/// `has_started_generating` and `is_building` double as "already queued"
/// guards for the generation and build queues.
pub struct Chunk {
    pub coord: ChunkCoord,
    pub block_origin: Vec3,
    pub buf: ChunkBuf,
    pub light: Option<LightGrid>,
    pub has_started_generating: bool,
    pub is_light_generated: bool,
    pub is_building: bool,
    pub is_built: bool,
    pub mesh: ChunkMesh,
    pub mesh_transparent: ChunkMesh,
    pub(crate) neighbours: [Option<ChunkHandle>; 6],
    pub(crate) prev: Option<ChunkHandle>,
    pub(crate) next: Option<ChunkHandle>,
}

impl Chunk {
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        Self {
            coord,
            block_origin: coord.block_origin(dims),
            buf: ChunkBuf::new(coord, dims),
            light: None,
            has_started_generating: false,
            is_light_generated: false,
            is_building: false,
            is_built: false,
            mesh: ChunkMesh::default(),
            mesh_transparent: ChunkMesh::default(),
            neighbours: [None; 6],
            prev: None,
            next: None,
        }
    }

    /// Installs worker output. The chunk is main-thread owned from here on.
    pub fn apply_generation(&mut self, buf: ChunkBuf, light: LightGrid) {
        self.buf = buf;
        self.light = Some(light);
        self.has_started_generating = true;
        self.is_light_generated = true;
    }

    pub fn state(&self) -> ChunkState {
        if self.is_building {
            ChunkState::QueuedForBuild
        } else if self.is_built {
            ChunkState::Built
        } else if self.is_light_generated {
            ChunkState::Generated
        } else if self.has_started_generating {
            ChunkState::QueuedForGeneration
        } else {
            ChunkState::Fresh
        }
    }

    #[inline]
    pub fn neighbour(&self, face: Face) -> Option<ChunkHandle> {
        self.neighbours[face.index()]
    }

    pub fn neighbours(&self) -> [Option<ChunkHandle>; 6] {
        self.neighbours
    }

    pub fn center(&self) -> Vec3 {
        self.block_origin + self.buf.dims().half_extent()
    }
}
