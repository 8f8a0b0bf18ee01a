mod common;

use common::{config, flat_world, light_chunk};
use strata::{ChunkCoord, Vec3, World, WorldConfig};

#[test]
fn initialize_starts_idle() {
    let world = World::initialize();
    assert!(!world.load_enabled());
    assert!(!world.is_worker_running());
    assert_eq!(world.draw_distance(), 3);
    assert_eq!(world.entities().capacity(), 256);
    assert_eq!(world.stats(), Default::default());
}

#[test]
fn entity_operations_go_through_the_table() {
    let mut world = flat_world(
        WorldConfig {
            max_entities: 4,
            ..config(4, 1)
        },
        1,
    );
    assert!(world.add_entity(3, 2, Vec3::new(1.0, 2.0, 3.0), Vec3::new(15.0, 45.0, 5.0)));
    assert!(!world.add_entity(4, 2, Vec3::ZERO, Vec3::ZERO));
    assert!(world.teleport_entity(3, Vec3::new(9.0, 9.0, 9.0), Vec3::new(-20.0, 180.0, 0.0)));
    let e = world.entities().get(3).unwrap();
    assert_eq!(e.position, Vec3::new(9.0, 9.0, 9.0));
    assert_eq!(e.rotation, Vec3::new(0.0, 180.0, 0.0));
    assert_eq!(e.model.head_pitch(), Some(-20.0));
    assert_eq!(world.stats().entities, 1);
    assert!(world.remove_entity(3));
    assert_eq!(world.stats().entities, 0);
}

#[test]
fn stats_follow_the_pipeline() {
    let mut world = flat_world(config(4, 1), 1);
    world.insert_chunk(ChunkCoord::new(0, 0, 0));
    world.insert_chunk(ChunkCoord::new(0, 1, 0));
    let s = world.stats();
    assert_eq!(s.loaded, 2);
    assert_eq!(s.generation_backlog, 2);
    assert_eq!(s.build_queue, 2);
    assert_eq!(s.built, 0);

    light_chunk(&mut world, ChunkCoord::new(0, 0, 0), 1);
    light_chunk(&mut world, ChunkCoord::new(0, 1, 0), 0);
    world.process_build_queue();
    let s = world.stats();
    assert_eq!(s.build_queue, 0);
    assert_eq!(s.built, 2);
}

#[test]
fn draw_distance_is_clamped() {
    let mut world = World::initialize();
    world.set_draw_distance(-4);
    assert_eq!(world.draw_distance(), 0);
    world.set_draw_distance(6);
    assert_eq!(world.config().draw_distance, 6);
}
