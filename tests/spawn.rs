use beatdrop::beat::BeatTrack;
use beatdrop::config::SessionConfig;
use beatdrop::constants::note;
use beatdrop::error::{GameError, PlacementError};
use beatdrop::systems::{
    beat_cursor_system, find_placement, min_note_spacing, random_note_color, spawn_region, spawn_system, Note,
    SessionState,
};
use bevy_ecs::event::Events;
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use glam::Vec2;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn scheduler_world(track: BeatTrack) -> World {
    let mut world = common::create_test_world();
    world.insert_resource(track);
    world
}

fn run_scheduler(world: &mut World, now: f64) {
    common::set_time(world, now);
    world
        .run_system_once(beat_cursor_system)
        .expect("System should run successfully");
    world.run_system_once(spawn_system).expect("System should run successfully");
}

#[test]
fn test_placement_inside_spawn_region() {
    let mut rng = common::test_rng();
    let (min, max) = spawn_region();

    for _ in 0..200 {
        let position = find_placement(&mut rng, &[], 0.0, 1).expect("an empty field always has room");
        assert_that(&(position.x >= min.x && position.x <= max.x)).is_true();
        assert_that(&(position.y >= min.y && position.y <= max.y)).is_true();
    }
}

#[test]
fn test_placement_keeps_spacing() {
    let mut rng = common::test_rng();
    let spacing = min_note_spacing(5.0);
    let mut placed: Vec<Vec2> = Vec::new();

    for _ in 0..12 {
        if let Ok(position) = find_placement(&mut rng, &placed, spacing, 32) {
            placed.push(position);
        }
    }

    assert_that(&placed.len()).is_greater_than(1);
    for (i, a) in placed.iter().enumerate() {
        for b in &placed[i + 1..] {
            assert_that(&a.distance(*b)).is_greater_than_or_equal_to(spacing);
        }
    }
}

#[test]
fn test_placement_exhaustion() {
    let mut rng = common::test_rng();
    let (min, max) = spawn_region();
    let center = (min + max) / 2.0;

    // One note whose exclusion zone covers the whole region.
    let result = find_placement(&mut rng, &[center], max.distance(min), 32);
    assert_eq!(result, Err(PlacementError::Exhausted { attempts: 32 }));
}

#[test]
fn test_note_colors_are_pastel() {
    let mut rng = common::test_rng();
    for _ in 0..100 {
        let color = random_note_color(&mut rng);
        for channel in [color.r, color.g, color.b] {
            assert_that(&channel).is_greater_than_or_equal_to(note::COLOR_CHANNEL_MIN);
        }
        assert_that(&color.a).is_equal_to(255);
    }
}

#[test]
fn test_beat_cursor_skips_stale_onsets() {
    let mut world = scheduler_world(BeatTrack::new(&[1.0, 1.6, 2.2], &[0.5, 0.1, 0.4]));

    run_scheduler(&mut world, 1.2);
    assert_that(&world.resource::<SessionState>().beat_index).is_equal_to(0);

    run_scheduler(&mut world, 1.5);
    assert_that(&world.resource::<SessionState>().beat_index).is_equal_to(1);

    run_scheduler(&mut world, 5.0);
    assert_that(&world.resource::<SessionState>().beat_index).is_equal_to(3);
}

#[test]
fn test_quiet_beat_never_spawns() {
    let mut world = scheduler_world(BeatTrack::new(&[0.5, 3.0], &[0.25, 0.1]));

    for step in 0..120 {
        run_scheduler(&mut world, step as f64 * common::TICK);
    }

    assert_that(&common::count::<Note>(&mut world)).is_equal_to(0);
    assert_that(&world.resource::<SessionState>().total_notes_spawned).is_equal_to(0);
}

#[test]
fn test_short_interval_spawns_repeatedly_on_one_onset() {
    let track = BeatTrack::new(&[1.0, 5.0], &[0.5, 0.5]);
    let mut world = scheduler_world(track);
    world.insert_resource(SessionConfig {
        note_interval: 0.2,
        ..SessionConfig::default()
    });

    for step in 0..=60 {
        run_scheduler(&mut world, step as f64 * common::TICK);
    }

    let mut times: Vec<f64> = world.query::<&Note>().iter(&world).map(|note| note.spawned_at).collect();
    times.sort_by(f64::total_cmp);

    // About 1.0, 1.23 and 1.47; the cursor leaves the onset at 1.5.
    assert_that(&times.len()).is_equal_to(3);
    assert_that(&times[0]).is_close_to(1.0, common::TICK + 1e-9);
    for pair in times.windows(2) {
        let gap = pair[1] - pair[0];
        assert_that(&(gap > 0.2 && gap < 0.2 + common::TICK + 1e-9)).is_true();
    }
    let session = world.resource::<SessionState>();
    assert_that(&session.total_notes_spawned).is_equal_to(3);
    assert_that(&session.beat_index).is_equal_to(1);
    assert_that(&session.skipped_beat).is_none();
}

#[test]
fn test_default_interval_spawns_once_per_onset() {
    let mut world = scheduler_world(BeatTrack::new(&[1.0, 5.0], &[0.9, 0.9]));

    for step in 0..=60 {
        run_scheduler(&mut world, step as f64 * common::TICK);
    }

    assert_that(&common::count::<Note>(&mut world)).is_equal_to(1);
}

#[test]
fn test_interval_gates_spawns() {
    let track = BeatTrack::new(&[1.0, 1.2, 1.8], &[0.9, 0.9, 0.9]);
    let mut world = scheduler_world(track);
    world.insert_resource(SessionConfig {
        onset_stale_after: 0.1,
        ..SessionConfig::default()
    });

    let mut now = 0.0;
    while now < 2.5 {
        run_scheduler(&mut world, now);
        now += common::TICK;
    }

    // 1.2 goes stale before the interval since 1.0 has passed; 1.8 is far enough.
    assert_that(&world.resource::<SessionState>().total_notes_spawned).is_equal_to(2);
}

#[test]
fn test_session_start_offsets_onsets() {
    let mut world = scheduler_world(BeatTrack::new(&[1.0], &[0.9]));
    world.insert_resource(SessionState::new(10.0));

    run_scheduler(&mut world, 10.9);
    assert_that(&common::count::<Note>(&mut world)).is_equal_to(0);

    run_scheduler(&mut world, 11.0);
    assert_that(&common::count::<Note>(&mut world)).is_equal_to(1);
}

#[test]
fn test_crowded_field_skips_spawn() {
    let mut world = scheduler_world(BeatTrack::new(&[1.0, 4.0], &[0.9, 0.9]));
    world.insert_resource(SessionConfig {
        placement_margin: 1_000.0,
        ..SessionConfig::default()
    });
    let (min, max) = spawn_region();
    common::spawn_test_note(&mut world, (min + max) / 2.0, 0.0);

    run_scheduler(&mut world, 1.0);
    run_scheduler(&mut world, 1.1);

    assert_that(&common::count::<Note>(&mut world)).is_equal_to(1);
    let session = world.resource::<SessionState>();
    assert_that(&session.skipped_beat).is_equal_to(Some(0));
    assert_that(&session.last_spawn_time).is_none();

    let mut errors = world.resource_mut::<Events<GameError>>();
    let errors: Vec<GameError> = errors.drain().collect();
    assert_that(&errors.len()).is_equal_to(1);
    assert_that(&matches!(errors[0], GameError::Placement(PlacementError::Exhausted { .. }))).is_true();
}
