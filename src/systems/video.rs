//! Background video pacing.
//!
//! Frames are decoded up front by the host; the core only moves a cursor over them. The cursor
//! waits until the session is phase-aligned with the track's first beat, then advances one
//! frame per tick. The host runs its loop at the video's frame rate, so one tick is one frame.

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::{Res, ResMut},
};
use tracing::{debug, info};

use crate::beat::BeatTrack;
use crate::config::{FrameOverrunPolicy, SessionConfig};
use crate::constants::DEFAULT_FPS;
use crate::error::{FrameError, GameError};
use crate::systems::{EndReason, SessionStage, SessionState, TickTime};

/// What the host knows about the decoded background video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub frame_count: usize,
    /// Nominal frames per second.
    pub fps: f64,
}

impl VideoInfo {
    pub fn new(frame_count: usize, fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { DEFAULT_FPS };
        Self { frame_count, fps }
    }

    /// A session without a background video.
    pub fn none() -> Self {
        Self::new(0, DEFAULT_FPS)
    }
}

/// Index of the frame to show, once playback has started.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct VideoCursor {
    pub frame_count: usize,
    pub frame: usize,
    pub started: bool,
    /// Set once the cursor has been held on the last frame.
    pub clamped: bool,
}

impl VideoCursor {
    pub fn new(info: VideoInfo) -> Self {
        Self {
            frame_count: info.frame_count,
            frame: 0,
            started: false,
            clamped: false,
        }
    }

    /// The frame to draw this tick, if any.
    pub fn current_frame(&self) -> Option<usize> {
        (self.started && self.frame < self.frame_count).then_some(self.frame)
    }
}

/// Session time after which the first frame is shown.
///
/// Aligns the video with the fractional-second phase of the first onset. A track without
/// beats only uses the offset.
pub fn video_start_time(track: &BeatTrack, phase_offset: f64) -> f64 {
    track.first_onset().map_or(0.0, f64::fract) + phase_offset
}

pub fn video_pacing_system(
    time: Res<TickTime>,
    track: Res<BeatTrack>,
    config: Res<SessionConfig>,
    session: Res<SessionState>,
    mut cursor: ResMut<VideoCursor>,
    mut stage: ResMut<SessionStage>,
    mut errors: EventWriter<GameError>,
) {
    if cursor.frame_count == 0 {
        return;
    }

    if !cursor.started {
        let elapsed = session.elapsed(time.now);
        let start_at = video_start_time(&track, config.phase_offset);
        if elapsed > start_at {
            cursor.started = true;
            info!(elapsed, start_at, frames = cursor.frame_count, "Background video started");
        }
        return;
    }

    let next = cursor.frame + 1;
    if next < cursor.frame_count {
        cursor.frame = next;
        return;
    }

    let overrun = FrameError::Overrun {
        frame: next,
        frame_count: cursor.frame_count,
    };
    match config.overrun_policy {
        FrameOverrunPolicy::Clamp => {
            if !cursor.clamped {
                cursor.clamped = true;
                debug!("Holding the last video frame");
                errors.write(overrun.into());
            }
        }
        FrameOverrunPolicy::Loop => {
            cursor.frame = 0;
            debug!("Looping background video");
        }
        FrameOverrunPolicy::EndSession => {
            errors.write(overrun.into());
            stage.end(EndReason::VideoEnded);
        }
    }
}
