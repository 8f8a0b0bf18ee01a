#![allow(dead_code)]

use std::sync::Arc;

use strata::{BlockRegistry, ChunkCoord, ChunkHandle, World, WorldConfig};
use strata_chunk::{ChunkBuf, compute_light};
use strata_worldgen::{FlatTerrain, TerrainGenerator};

pub fn config(chunk: usize, draw_distance: i32) -> WorldConfig {
    WorldConfig {
        chunk_size: [chunk, chunk, chunk],
        draw_distance,
        ..WorldConfig::default()
    }
}

/// World over flat stone up to `height`, with no worker running.
pub fn flat_world(cfg: WorldConfig, height: i32) -> World {
    let reg = Arc::new(BlockRegistry::builtin());
    let stone = reg.id_by_name("stone").unwrap();
    let generator: Arc<dyn TerrainGenerator> = Arc::new(FlatTerrain::new(height, stone));
    World::with_generator(cfg, reg, generator)
}

/// Generates and lights one chunk in place, as the worker would.
pub fn light_chunk(world: &mut World, coord: ChunkCoord, fill: u16) -> ChunkHandle {
    let h = world.chunks().lookup(coord).unwrap();
    let mut buf = ChunkBuf::new(coord, world.dims());
    buf.blocks.fill(fill);
    let light = compute_light(&buf, world.registry());
    world
        .chunks_mut()
        .get_mut(h)
        .unwrap()
        .apply_generation(buf, light);
    h
}

pub fn drain_builds(world: &mut World, max_calls: usize) {
    for _ in 0..max_calls {
        if world.process_build_queue() == 0 {
            break;
        }
    }
}
