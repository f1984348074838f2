//! Command-line arguments of the `beatdrop` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::beat::AmplitudeMode;
use crate::config::{FrameOverrunPolicy, SessionConfig};
use crate::constants::{spawn, video};
use crate::error::GameResult;

/// Click the notes that drop on the beats of a track, over a background video.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "beatdrop", author, version, about, long_about = None)]
pub struct CliArgs {
    /// WAV file to play and analyze
    pub audio: PathBuf,

    /// Directory of background video frames, shown in file name order
    #[arg(required_unless_present = "analyze")]
    pub frames: Option<PathBuf>,

    /// Nominal frame rate of the background video
    #[arg(long, value_name = "N", value_parser = parse_fps)]
    pub fps: Option<f64>,

    /// Minimum seconds between two notes
    #[arg(long = "interval", value_name = "SECONDS", default_value_t = spawn::NOTE_INTERVAL)]
    pub note_interval: f64,

    /// Video phase calibration, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = video::PHASE_OFFSET, allow_negative_numbers = true)]
    pub phase_offset: f64,

    /// How beat loudness is measured: peak or rms
    #[arg(long = "amplitude", value_name = "MODE", default_value_t = AmplitudeMode::default())]
    pub amplitude_mode: AmplitudeMode,

    /// What the video does past its last frame: clamp, loop or end
    #[arg(long = "overrun", value_name = "POLICY", default_value_t = FrameOverrunPolicy::default())]
    pub overrun_policy: FrameOverrunPolicy,

    /// TTF font for the score and badges
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Seed for note placement and particles
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Print the tempo and beat list, then exit
    #[arg(long)]
    pub analyze: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// The session configuration these arguments describe.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidArgument` for values the scheduler cannot run with.
    pub fn session_config(&self) -> GameResult<SessionConfig> {
        let config = SessionConfig {
            note_interval: self.note_interval,
            phase_offset: self.phase_offset,
            amplitude_mode: self.amplitude_mode,
            overrun_policy: self.overrun_policy,
            ..SessionConfig::default()
        };
        config.validate()?;

        Ok(config)
    }
}

fn parse_fps(raw: &str) -> Result<f64, String> {
    let fps: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err(format!("must be positive, got {fps}"));
    }
    Ok(fps)
}
