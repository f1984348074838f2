use beatdrop::beat::BeatTrack;
use beatdrop::config::{FrameOverrunPolicy, SessionConfig};
use beatdrop::constants::DEFAULT_FPS;
use beatdrop::error::{FrameError, GameError};
use beatdrop::systems::{
    video_pacing_system, video_start_time, DrawCommand, EndReason, SessionStage, TickInput, VideoCursor, VideoInfo,
};
use bevy_ecs::event::Events;
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn video_world(frames: usize, policy: FrameOverrunPolicy) -> World {
    let mut world = common::create_test_world();
    world.insert_resource(VideoCursor::new(VideoInfo::new(frames, 30.0)));
    world.insert_resource(SessionConfig {
        overrun_policy: policy,
        ..SessionConfig::default()
    });
    world
}

fn run_pacing(world: &mut World, now: f64) -> VideoCursor {
    common::set_time(world, now);
    world
        .run_system_once(video_pacing_system)
        .expect("System should run successfully");
    *world.resource::<VideoCursor>()
}

fn drain_errors(world: &mut World) -> Vec<GameError> {
    world.resource_mut::<Events<GameError>>().drain().collect()
}

/// Starts playback and steps onto the last of three frames.
fn play_to_last_frame(world: &mut World) {
    assert_that(&run_pacing(world, 0.65).current_frame()).is_equal_to(Some(0));
    assert_that(&run_pacing(world, 0.7).current_frame()).is_equal_to(Some(1));
    assert_that(&run_pacing(world, 0.75).current_frame()).is_equal_to(Some(2));
}

#[test]
fn test_video_info_sanitizes_fps() {
    assert_that(&VideoInfo::new(10, 0.0).fps).is_equal_to(DEFAULT_FPS);
    assert_that(&VideoInfo::new(10, f64::NAN).fps).is_equal_to(DEFAULT_FPS);
    assert_that(&VideoInfo::new(10, 24.0).fps).is_equal_to(24.0);
}

#[test]
fn test_start_time_follows_first_onset_phase() {
    let track = BeatTrack::new(&[3.25, 4.0], &[0.5, 0.5]);

    assert_that(&video_start_time(&track, 0.6)).is_close_to(0.85, 1e-9);
    assert_that(&video_start_time(&BeatTrack::empty(), 0.6)).is_close_to(0.6, 1e-9);
}

#[test]
fn test_video_waits_for_start_time() {
    let mut world = video_world(3, FrameOverrunPolicy::Clamp);

    assert_that(&run_pacing(&mut world, 0.3).current_frame()).is_none();
    assert_that(&run_pacing(&mut world, 0.6).current_frame()).is_none();
    assert_that(&run_pacing(&mut world, 0.65).current_frame()).is_equal_to(Some(0));
}

#[test]
fn test_clamp_holds_last_frame() {
    let mut world = video_world(3, FrameOverrunPolicy::Clamp);
    play_to_last_frame(&mut world);

    let cursor = run_pacing(&mut world, 0.8);
    assert_that(&cursor.current_frame()).is_equal_to(Some(2));
    assert_that(&cursor.clamped).is_true();
    let errors = drain_errors(&mut world);
    assert_that(&errors.len()).is_equal_to(1);
    assert_that(&matches!(
        errors[0],
        GameError::Frame(FrameError::Overrun { frame: 3, frame_count: 3 })
    ))
    .is_true();

    // Reported once, then held quietly.
    assert_that(&run_pacing(&mut world, 0.85).current_frame()).is_equal_to(Some(2));
    assert_that(&drain_errors(&mut world).is_empty()).is_true();
    assert_eq!(*world.resource::<SessionStage>(), SessionStage::Playing);
}

#[test]
fn test_loop_wraps_to_first_frame() {
    let mut world = video_world(3, FrameOverrunPolicy::Loop);
    play_to_last_frame(&mut world);

    assert_that(&run_pacing(&mut world, 0.8).current_frame()).is_equal_to(Some(0));
    assert_that(&run_pacing(&mut world, 0.85).current_frame()).is_equal_to(Some(1));
    assert_that(&drain_errors(&mut world).is_empty()).is_true();
}

#[test]
fn test_end_session_policy() {
    let mut world = video_world(3, FrameOverrunPolicy::EndSession);
    play_to_last_frame(&mut world);

    run_pacing(&mut world, 0.8);
    assert_eq!(
        *world.resource::<SessionStage>(),
        SessionStage::Ended(EndReason::VideoEnded)
    );
    assert_that(&drain_errors(&mut world).len()).is_equal_to(1);
}

#[test]
fn test_no_frames_never_starts() {
    let mut world = video_world(0, FrameOverrunPolicy::EndSession);

    for step in 1..60 {
        run_pacing(&mut world, step as f64 * common::TICK);
    }

    let cursor = *world.resource::<VideoCursor>();
    assert_that(&cursor.started).is_false();
    assert_that(&cursor.current_frame()).is_none();
    assert_eq!(*world.resource::<SessionStage>(), SessionStage::Playing);
}

#[test]
fn test_game_ends_when_video_runs_out() {
    let config = SessionConfig {
        phase_offset: 0.01,
        overrun_policy: FrameOverrunPolicy::EndSession,
        ..SessionConfig::default()
    };
    let mut game = common::create_test_game_with(BeatTrack::empty(), config, VideoInfo::new(2, 30.0));

    assert_that(&game.tick(common::TICK, TickInput::idle())).is_false();
    assert_eq!(game.draw_list().first(), Some(&DrawCommand::Background { frame: 0 }));
    assert_that(&game.tick(2.0 * common::TICK, TickInput::idle())).is_false();
    assert_eq!(game.draw_list().first(), Some(&DrawCommand::Background { frame: 1 }));

    assert_that(&game.tick(3.0 * common::TICK, TickInput::idle())).is_true();
    assert_eq!(game.summary().reason, Some(EndReason::VideoEnded));
}
