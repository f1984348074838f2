//! Runtime configuration of a play session.

use bevy_ecs::resource::Resource;
use strum_macros::{Display, EnumIter, EnumString};

use crate::beat::AmplitudeMode;
use crate::constants::{spawn, video};
use crate::error::{GameError, GameResult};

/// What the video cursor does when it would step past the last decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FrameOverrunPolicy {
    /// Hold the last frame until the session ends.
    #[default]
    Clamp,
    /// Wrap back to the first frame.
    Loop,
    /// End the session.
    #[strum(serialize = "end", serialize = "endsession")]
    EndSession,
}

/// Tunables of one session. Defaults come from [`crate::constants`].
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Minimum seconds between two spawns.
    pub note_interval: f64,
    /// Beats at or below this amplitude never spawn a note.
    pub amplitude_threshold: f32,
    /// Seconds after an onset at which the beat cursor moves past it.
    pub onset_stale_after: f64,
    /// Pixels added to the maximum note radius by the anti-overlap rule.
    pub placement_margin: f32,
    pub placement_attempts: u32,
    /// Seconds between the fractional phase of the first onset and the first video frame.
    pub phase_offset: f64,
    pub overrun_policy: FrameOverrunPolicy,
    /// How beat amplitudes are measured during extraction.
    pub amplitude_mode: AmplitudeMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            note_interval: spawn::NOTE_INTERVAL,
            amplitude_threshold: spawn::AMPLITUDE_THRESHOLD,
            onset_stale_after: spawn::ONSET_STALE_AFTER,
            placement_margin: spawn::PLACEMENT_MARGIN,
            placement_attempts: spawn::PLACEMENT_ATTEMPTS,
            phase_offset: video::PHASE_OFFSET,
            overrun_policy: FrameOverrunPolicy::default(),
            amplitude_mode: AmplitudeMode::default(),
        }
    }
}

impl SessionConfig {
    /// Rejects values the scheduler cannot run with.
    pub fn validate(&self) -> GameResult<()> {
        if !self.note_interval.is_finite() || self.note_interval < 0.0 {
            return Err(GameError::InvalidArgument(format!(
                "note interval must be a non-negative number of seconds, got {}",
                self.note_interval
            )));
        }
        if !self.onset_stale_after.is_finite() || self.onset_stale_after <= 0.0 {
            return Err(GameError::InvalidArgument(format!(
                "onset staleness must be positive, got {}",
                self.onset_stale_after
            )));
        }
        if !self.phase_offset.is_finite() {
            return Err(GameError::InvalidArgument(format!(
                "phase offset must be finite, got {}",
                self.phase_offset
            )));
        }
        if self.placement_margin < 0.0 {
            return Err(GameError::InvalidArgument(format!(
                "placement margin must not be negative, got {}",
                self.placement_margin
            )));
        }
        if self.placement_attempts == 0 {
            return Err(GameError::InvalidArgument(
                "at least one placement attempt is required".to_string(),
            ));
        }

        Ok(())
    }
}
