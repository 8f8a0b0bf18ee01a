use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use strata::{Camera, RecordingBackend, Vec3, World, WorldConfig};
use strata_blocks::BlockRegistry;

#[derive(Parser, Debug)]
#[command(name = "strata", about = "Headless voxel world fly-through")]
struct Args {
    /// World config TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the terrain seed
    #[arg(long)]
    seed: Option<i32>,
    #[arg(long)]
    draw_distance: Option<i32>,
    /// Frames to simulate
    #[arg(long, default_value_t = 120)]
    frames: u32,
    /// Observer speed in blocks per frame along +X
    #[arg(long, default_value_t = 0.5)]
    speed: f32,
    /// Blocks to dig at the observer's feet along the way
    #[arg(long, default_value_t = 4)]
    edits: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => WorldConfig::from_path(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.worldgen.seed = seed;
    }
    if let Some(dd) = args.draw_distance {
        cfg.draw_distance = dd;
    }
    cfg.validate()?;

    let fovy = cfg.fovy_deg;
    let start_y = cfg.worldgen.base_height + cfg.worldgen.amplitude + 4.0;
    let mut world = World::new(cfg, Arc::new(BlockRegistry::builtin()));
    world.apply_texture(1);
    world.apply_shader(1);
    world.set_observer(Vec3::new(0.5, start_y, 0.5));
    world.load_singleplayer()?;
    world.add_entity(0, 1, world.observer(), Vec3::ZERO);

    let mut backend = RecordingBackend::new();
    let edit_every = if args.edits == 0 {
        0
    } else {
        (args.frames / args.edits).max(1)
    };
    let mut edits_done = 0;
    for frame in 0..args.frames {
        let pos = world.observer() + Vec3::new(args.speed, 0.0, 0.0);
        world.set_observer(pos);
        world.teleport_entity(0, pos, Vec3::new(0.0, 90.0, 0.0));
        world.stream_chunks();

        let camera = Camera::new(pos, Vec3::new(1.0, -0.2, 0.0), fovy);
        backend.reset();
        let draw = world.draw_world(&camera, &mut backend);

        if edit_every > 0 && edits_done < args.edits && frame % edit_every == 0 {
            let below = pos - Vec3::new(0.0, 2.0, 0.0);
            if world.set_block(below, strata::AIR, false) {
                edits_done += 1;
            }
        }

        if frame % 30 == 0 {
            let s = world.stats();
            log::info!(
                target: "world",
                "frame {frame}: loaded={} built={} gen_backlog={} build_queue={} drawn={}/{}",
                s.loaded,
                s.built,
                s.generation_backlog,
                s.build_queue,
                draw.submitted,
                draw.considered
            );
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    let s = world.stats();
    log::info!(
        target: "world",
        "done: {} frames, {} chunks loaded, {} built, {} edits, {} quads submitted",
        backend.frames,
        s.loaded,
        s.built,
        edits_done,
        backend.quads
    );
    world.unload_world();
    Ok(())
}
