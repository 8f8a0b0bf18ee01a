mod common;

use std::time::Duration;

use common::{config, drain_builds, flat_world, light_chunk};
use strata::{AIR, ChunkCoord, ChunkState, Vec3};

#[test]
fn build_waits_for_neighbour_lighting() {
    let mut world = flat_world(config(4, 1), 1);
    let a = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    let b = world.insert_chunk(ChunkCoord::new(1, 0, 0)).unwrap();
    assert_eq!(world.queued_builds(), vec![a, b]);

    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), 1);
    assert_eq!(world.process_build_queue(), 0);
    assert!(!world.chunks().get(a).unwrap().is_built);
    assert_eq!(world.queued_builds(), vec![a, b]);

    light_chunk(&mut world, ChunkCoord::new(1, 0, 0), 1);
    assert_eq!(world.process_build_queue(), 2);
    for h in [a, b] {
        let c = world.chunks().get(h).unwrap();
        assert_eq!(c.state(), ChunkState::Built);
    }
    assert!(world.queued_builds().is_empty());
}

#[test]
fn unlit_head_blocks_the_queue() {
    let mut world = flat_world(config(4, 1), 1);
    world.insert_chunk(ChunkCoord::new(0, 0, 0));
    world.insert_chunk(ChunkCoord::new(5, 0, 0));
    light_chunk(&mut world, ChunkCoord::new(5, 0, 0), 1);
    assert_eq!(world.process_build_queue(), 0);
    let far = world.chunks().lookup(ChunkCoord::new(5, 0, 0)).unwrap();
    assert!(!world.chunks().get(far).unwrap().is_built);
}

#[test]
fn build_budget_limits_each_call() {
    let mut world = flat_world(config(4, 1), 1);
    for x in 0..5 {
        world.insert_chunk(ChunkCoord::new(x * 2, 0, 0));
        light_chunk(&mut world, ChunkCoord::new(x * 2, 0, 0), 1);
    }
    assert_eq!(world.process_build_queue(), 3);
    assert_eq!(world.process_build_queue(), 2);
    assert_eq!(world.process_build_queue(), 0);
}

#[test]
fn insert_queues_generation_once() {
    let mut world = flat_world(config(4, 1), 1);
    let h = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    assert!(world.insert_chunk(ChunkCoord::new(0, 0, 0)).is_none());
    world.queue_chunk(h);
    assert_eq!(world.generation_queue_len(), 1);
    assert_eq!(world.queued_builds(), vec![h]);
    assert_eq!(
        world.chunks().get(h).unwrap().state(),
        ChunkState::QueuedForBuild
    );
}

#[test]
fn building_neighbour_blocks_eviction() {
    let mut world = flat_world(config(4, 1), 1);
    let a = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    let b = world.insert_chunk(ChunkCoord::new(0, 0, 1)).unwrap();
    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), 1);
    light_chunk(&mut world, ChunkCoord::new(0, 0, 1), 1);
    drain_builds(&mut world, 4);

    world.chunks_mut().get_mut(a).unwrap().is_building = true;
    world.set_observer(Vec3::new(1000.0, 0.0, 0.0));
    assert_eq!(world.unload_far_chunks(), 0);
    assert!(world.chunks().get(b).is_some());

    world.chunks_mut().get_mut(a).unwrap().is_building = false;
    assert_eq!(world.unload_far_chunks(), 2);
    assert!(world.chunks().is_empty());
}

#[test]
fn near_chunks_are_kept() {
    let mut world = flat_world(config(4, 1), 1);
    world.insert_chunk(ChunkCoord::new(0, 0, 0));
    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), 1);
    drain_builds(&mut world, 2);
    world.set_observer(Vec3::new(2.0, 2.0, 2.0));
    assert_eq!(world.unload_far_chunks(), 0);
    assert_eq!(world.chunks().len(), 1);
}

#[test]
fn boundary_edit_requeues_both_sides() {
    let mut world = flat_world(config(4, 1), 1);
    let a = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    let b = world.insert_chunk(ChunkCoord::new(1, 0, 0)).unwrap();
    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), 1);
    light_chunk(&mut world, ChunkCoord::new(1, 0, 0), 1);
    drain_builds(&mut world, 4);
    assert!(world.queued_builds().is_empty());

    let cell = Vec3::new(3.5, 1.5, 1.5);
    assert_eq!(world.get_block(cell), 1);
    assert!(world.set_block(cell, AIR, false));
    assert_eq!(world.get_block(cell), AIR);

    let queued = world.queued_builds();
    assert!(queued.contains(&a));
    assert!(queued.contains(&b));
    assert!(world.chunks().get(a).unwrap().is_building);
    assert!(world.chunks().get(b).unwrap().is_building);

    drain_builds(&mut world, 4);
    let mesh_b = &world.chunks().get(b).unwrap().mesh;
    assert!(!mesh_b.is_empty());
}

#[test]
fn immediate_edit_rebuilds_in_place() {
    let mut world = flat_world(config(4, 1), 1);
    let a = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), AIR);
    drain_builds(&mut world, 2);
    assert!(world.chunks().get(a).unwrap().mesh.is_empty());

    assert!(world.set_block(Vec3::new(1.0, 1.0, 1.0), 1, true));
    let c = world.chunks().get(a).unwrap();
    assert_eq!(c.mesh.quad_count(), 6);
    assert!(!c.is_building);
    assert!(world.queued_builds().is_empty());
}

#[test]
fn edits_on_missing_or_unlit_chunks_are_rejected() {
    let mut world = flat_world(config(4, 1), 1);
    assert_eq!(world.get_block(Vec3::new(100.0, 0.0, 0.0)), AIR);
    assert!(!world.set_block(Vec3::new(100.0, 0.0, 0.0), 1, true));

    let h = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    assert!(!world.set_block(Vec3::new(1.0, 1.0, 1.0), 1, false));
    assert_eq!(world.chunks().get(h).unwrap().buf.get_local(1, 1, 1), AIR);
}

#[test]
fn negative_positions_resolve_to_the_right_chunk() {
    let mut world = flat_world(config(4, 1), 1);
    world.insert_chunk(ChunkCoord::new(-1, -1, -1));
    light_chunk(&mut world, ChunkCoord::new(-1, -1, -1), AIR);
    assert!(world.set_block(Vec3::new(-0.5, -4.0, -3.2), 6, false));
    assert_eq!(world.get_block_at(-1, -4, -4), 6);
    let c = world.chunks().get_at(ChunkCoord::new(-1, -1, -1)).unwrap();
    assert_eq!(c.buf.get_local(3, 0, 0), 6);
}

#[test]
fn streams_builds_and_evicts_a_cube() {
    let mut world = flat_world(config(8, 1), 3);
    world.set_observer(Vec3::new(4.0, 4.0, 4.0));
    world.load_singleplayer().unwrap();
    assert!(world.is_worker_running());

    world.stream_chunks();
    assert_eq!(world.chunks().len(), 27);
    assert!(world.wait_for_generation(Duration::from_secs(10)));

    for _ in 0..30 {
        world.stream_chunks();
        if world.stats().built == 27 && world.stats().build_queue == 0 {
            break;
        }
    }
    let stats = world.stats();
    assert_eq!(stats.loaded, 27);
    assert_eq!(stats.built, 27);
    assert_eq!(stats.generation_backlog, 0);
    world.chunks().check_links().unwrap();

    // Flat ground at y <= 3 shows up in the origin chunk.
    assert_eq!(world.get_block_at(0, 3, 0), 1);
    assert_eq!(world.get_block_at(0, 4, 0), AIR);

    world.set_observer(Vec3::new(1000.0, 4.0, 4.0));
    assert_eq!(world.unload_far_chunks(), 27);
    assert!(world.chunks().is_empty());
    assert!(world.chunks().head().is_none());

    world.unload_world();
    assert!(!world.is_worker_running());
    assert!(!world.load_enabled());
}

#[test]
fn unload_world_joins_worker_and_releases_chunks() {
    let mut world = flat_world(config(8, 2), 3);
    world.load_singleplayer().unwrap();
    world.stream_chunks();
    assert!(world.chunks().len() > 1);
    world.unload_world();
    assert!(world.chunks().is_empty());
    assert!(world.queued_builds().is_empty());
    assert!(!world.is_worker_running());

    // Streaming after unload does not load anything.
    world.stream_chunks();
    assert!(world.chunks().is_empty());

    // A second session starts cleanly.
    world.load_singleplayer().unwrap();
    assert_eq!(world.chunks().len(), 1);
    assert!(world.wait_for_generation(Duration::from_secs(10)));
    let origin = world.chunks().lookup(ChunkCoord::new(0, 0, 0)).unwrap();
    assert!(world.chunks().get(origin).unwrap().is_light_generated);
    world.unload_world();
}

#[test]
fn chunks_inserted_while_unloaded_generate_after_reload() {
    let mut world = flat_world(config(8, 1), 3);
    world.set_observer(Vec3::new(4.0, 4.0, 4.0));
    world.load_singleplayer().unwrap();
    world.unload_world();

    // The generation queue is closed, so nothing may be marked as started.
    let h = world.insert_chunk(ChunkCoord::new(0, 0, 0)).unwrap();
    assert!(!world.chunks().get(h).unwrap().has_started_generating);
    assert_eq!(world.generation_queue_len(), 0);
    assert_eq!(world.queued_builds(), vec![h]);

    world.load_singleplayer().unwrap();
    assert!(world.chunks().get(h).unwrap().has_started_generating);
    for _ in 0..30 {
        assert!(world.wait_for_generation(Duration::from_secs(10)));
        world.stream_chunks();
        let s = world.stats();
        if s.built == s.loaded && s.build_queue == 0 {
            break;
        }
    }
    let c = world.chunks().get(h).unwrap();
    assert!(c.is_light_generated);
    assert!(c.is_built);
    let s = world.stats();
    assert_eq!(s.loaded, 27);
    assert_eq!(s.built, 27);
    world.unload_world();
}
