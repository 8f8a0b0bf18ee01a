use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::{AIR, BlockId, BlockRegistry};
use strata_chunk::ChunkBuf;

use crate::TerrainGenerator;
use crate::params::WorldGenParams;

fn resolve(reg: &BlockRegistry, name: &str, fallback: BlockId) -> BlockId {
    reg.id_by_name(name).unwrap_or(fallback)
}

/// Heightmap terrain: stone, a few layers of dirt, grass on top, sand and water near sea level.
pub struct NoiseTerrain {
    height: FastNoiseLite,
    base_height: f32,
    amplitude: f32,
    sea_level: i32,
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    water: BlockId,
}

impl NoiseTerrain {
    pub fn new(params: &WorldGenParams, reg: &BlockRegistry) -> Self {
        let mut height = FastNoiseLite::with_seed(params.seed);
        height.set_noise_type(Some(NoiseType::OpenSimplex2));
        height.set_frequency(Some(params.frequency));
        let stone = resolve(reg, "stone", 1);
        Self {
            height,
            base_height: params.base_height,
            amplitude: params.amplitude,
            sea_level: params.sea_level,
            stone,
            dirt: resolve(reg, "dirt", stone),
            grass: resolve(reg, "grass", stone),
            sand: resolve(reg, "sand", stone),
            water: resolve(reg, "water", AIR),
        }
    }

    /// Surface height (top solid block) of the column at `(wx, wz)`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let n = self.height.get_noise_2d(wx as f32, wz as f32);
        (self.base_height + n * self.amplitude).floor() as i32
    }

    fn block_at(&self, wy: i32, surface: i32) -> BlockId {
        if wy > surface {
            if wy <= self.sea_level { self.water } else { AIR }
        } else if wy == surface {
            if surface <= self.sea_level + 1 { self.sand } else { self.grass }
        } else if wy >= surface - 3 {
            self.dirt
        } else {
            self.stone
        }
    }
}

impl TerrainGenerator for NoiseTerrain {
    fn generate(&self, buf: &mut ChunkBuf) {
        let base_x = buf.coord.cx * buf.sx as i32;
        let base_y = buf.coord.cy * buf.sy as i32;
        let base_z = buf.coord.cz * buf.sz as i32;
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                let surface = self.surface_height(base_x + x as i32, base_z + z as i32);
                for y in 0..buf.sy {
                    let id = self.block_at(base_y + y as i32, surface);
                    buf.set_local(x, y, z, id);
                }
            }
        }
    }
}

/// Solid ground up to and including `height`, air above.
pub struct FlatTerrain {
    pub height: i32,
    pub block: BlockId,
}

impl FlatTerrain {
    pub fn new(height: i32, block: BlockId) -> Self {
        Self { height, block }
    }

    pub fn from_params(params: &WorldGenParams, reg: &BlockRegistry) -> Self {
        Self::new(params.flat_height, resolve(reg, "stone", 1))
    }
}

impl TerrainGenerator for FlatTerrain {
    fn generate(&self, buf: &mut ChunkBuf) {
        let base_y = buf.coord.cy * buf.sy as i32;
        for y in 0..buf.sy {
            let id = if base_y + y as i32 <= self.height {
                self.block
            } else {
                AIR
            };
            for z in 0..buf.sz {
                for x in 0..buf.sx {
                    buf.set_local(x, y, z, id);
                }
            }
        }
    }
}
