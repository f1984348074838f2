//! This module contains the main game logic and state.

use bevy_ecs::event::Events;
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::world::World;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::beat::BeatTrack;
use crate::config::SessionConfig;
use crate::error::{GameError, GameResult};
use crate::events::NoteJudged;
use crate::summary::SessionSummary;
use crate::systems::{
    beat_cursor_system, judge_system, note_lifecycle_system, particle_burst_system, particle_motion_system,
    render_system, scoring_system, session_active, spawn_system, time_to_live_system, video_pacing_system, DrawCommand,
    DrawList, EndReason, GameRng, PendingClicks, SessionStage, SessionState, TickInput, TickTime, VideoCursor, VideoInfo,
};

/// System set for all gameplay systems, which stop running once the session ends
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Clicks are matched against notes before anything spawns or expires
    Input,
    /// Beat cursor, spawning and the note lifecycle
    Update,
    /// Systems that react to judgments
    Respond,
    /// Video cursor
    Pacing,
}

/// System set for building the draw list
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
struct RenderSet;

/// Scheduler of one play session, built on the Bevy ECS architecture.
///
/// The world holds the live notes and particles as entities, and the beat track, session
/// counters, video cursor and draw list as resources. Time is never read from a clock: the
/// host passes `now` into [`Game::tick`], which makes every session replayable.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Creates a session over `track`, starting at `session_start` on the host's clock.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidArgument` if the configuration cannot be run.
    pub fn new(
        config: SessionConfig,
        track: BeatTrack,
        video: VideoInfo,
        rng: SmallRng,
        session_start: f64,
    ) -> GameResult<Game> {
        config.validate()?;
        info!(
            beats = track.len(),
            frames = video.frame_count,
            fps = video.fps,
            interval = config.note_interval,
            overrun = %config.overrun_policy,
            "Starting session"
        );

        let mut world = World::default();
        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        world.init_resource::<Events<NoteJudged>>();
        world.init_resource::<Events<GameError>>();

        world.insert_resource(config);
        world.insert_resource(track);
        world.insert_resource(VideoCursor::new(video));
        world.insert_resource(SessionState::new(session_start));
        world.insert_resource(SessionStage::Playing);
        world.insert_resource(TickTime::new(session_start));
        world.insert_resource(PendingClicks::default());
        world.insert_resource(GameRng(rng));
        world.insert_resource(DrawList::default());

        Self::configure_schedule(&mut schedule);

        Ok(Game { world, schedule })
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule
            .add_systems((
                judge_system.in_set(GameplaySet::Input),
                (beat_cursor_system, spawn_system, note_lifecycle_system)
                    .chain()
                    .in_set(GameplaySet::Update),
                (
                    scoring_system,
                    particle_burst_system,
                    particle_motion_system,
                    time_to_live_system,
                )
                    .chain()
                    .in_set(GameplaySet::Respond),
                video_pacing_system.in_set(GameplaySet::Pacing),
                render_system.in_set(RenderSet),
            ))
            .configure_sets(
                (
                    GameplaySet::Input.run_if(session_active),
                    GameplaySet::Update.run_if(session_active),
                    GameplaySet::Respond.run_if(session_active),
                    GameplaySet::Pacing.run_if(session_active),
                )
                    .chain(),
            )
            .configure_sets(RenderSet.after(GameplaySet::Pacing));
    }

    /// Advances the session to `now`, feeding it the input polled since the last tick.
    ///
    /// A quit request or the end of the audio stops the session before anything else moves.
    ///
    /// # Returns
    ///
    /// `true` once the session has ended, `false` while it is still running.
    pub fn tick(&mut self, now: f64, input: TickInput) -> bool {
        if !self.stage().is_playing() {
            return true;
        }

        if input.quit {
            info!("Exit requested, ending session");
            self.end(EndReason::Quit);
            return true;
        }
        if input.audio_finished {
            info!("Audio finished, ending session");
            self.end(EndReason::AudioFinished);
            return true;
        }

        self.world.insert_resource(TickTime::new(now));
        self.world.resource_mut::<PendingClicks>().0 = input.clicks;

        self.schedule.run(&mut self.world);

        self.world.resource_mut::<Events<NoteJudged>>().update();
        let errors: Vec<GameError> = self.world.resource_mut::<Events<GameError>>().drain().collect();
        for error in errors {
            warn!("{error}");
        }

        let stage = self.stage();
        if let Some(reason) = stage.end_reason() {
            info!(%reason, "Session ended");
        }
        !stage.is_playing()
    }

    fn end(&mut self, reason: EndReason) {
        self.world.resource_mut::<SessionStage>().end(reason);
        debug!(score = self.session().score, "Session stopped");
    }

    pub fn stage(&self) -> SessionStage {
        *self.world.resource::<SessionStage>()
    }

    pub fn session(&self) -> &SessionState {
        self.world.resource::<SessionState>()
    }

    pub fn video(&self) -> &VideoCursor {
        self.world.resource::<VideoCursor>()
    }

    /// Draw intents produced by the latest tick.
    pub fn draw_list(&self) -> &[DrawCommand] {
        self.world.resource::<DrawList>().commands()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_state(self.session(), self.stage().end_reason())
    }
}
