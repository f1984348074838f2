//! This module contains all the constants used in the game.

use std::time::Duration;

use glam::Vec2;

/// Nominal frame rate used when the background video does not report one.
pub const DEFAULT_FPS: f64 = 30.0;

/// Time budget of a single loop iteration at the given frame rate.
pub fn loop_time(fps: f64) -> Duration {
    Duration::from_nanos((1_000_000_000.0 / fps.max(1.0)) as u64)
}

/// Play field dimensions and layout.
pub mod field {
    use super::Vec2;

    /// The size of the play field (and window), in pixels.
    pub const SIZE: Vec2 = Vec2::new(1280.0, 760.0);

    /// Alpha of the black overlay drawn between the background video and the notes.
    pub const OVERLAY_ALPHA: u8 = 60;

    /// Where the score text is anchored.
    pub const SCORE_TEXT_POSITION: Vec2 = Vec2::new(10.0, 10.0);
}

/// Note geometry and lifecycle timings.
pub mod note {
    /// Radius of a freshly spawned note.
    pub const MIN_RADIUS: f32 = 5.0;
    /// Radius a note grows to; also the radius of its click region.
    pub const MAX_RADIUS: f32 = 30.0;
    /// Normalized growth per second. At 4.0 a note reaches full size after 0.25s.
    pub const GROWTH_RATE: f64 = 4.0;
    /// Normalized growth past which a click is graded excellent.
    pub const EXCELLENT_FRACTION: f64 = 1.2;
    /// Seconds a note may stay unclicked before it is judged a miss.
    pub const LIFE_CYCLE: f64 = 0.6;
    /// Lower bound for each random color channel of a note.
    pub const COLOR_CHANNEL_MIN: u8 = 155;
}

/// The tier badge shown after a note is judged.
pub mod badge {
    /// Seconds over which the badge scales from nothing to full size.
    pub const SCALE_IN: f64 = 0.1;
    /// Seconds the badge stays on screen (fading out) before the note is removed.
    pub const LIFETIME: f64 = 0.4;
}

/// Particle bursts.
pub mod particle {
    /// Particles per burst.
    pub const BURST_COUNT: usize = 8;
    /// Seconds a particle lives.
    pub const LIFETIME: f64 = 0.5;
    /// Pixels per tick, lower bound.
    pub const MIN_SPEED: f32 = 1.0;
    /// Pixels per tick, upper bound.
    pub const MAX_SPEED: f32 = 4.0;
    /// Square size of a particle, in pixels.
    pub const SIZE: f32 = 4.0;
}

/// Scoring weights.
pub mod scoring {
    /// Points awarded for a good click; excellent clicks are worth twice this.
    pub const UNIT: u32 = 50;
}

/// Beat cursor and spawn gating.
pub mod spawn {
    /// Default minimum seconds between two spawns.
    pub const NOTE_INTERVAL: f64 = 0.5;
    /// Beats quieter than this never spawn a note.
    pub const AMPLITUDE_THRESHOLD: f32 = 0.25;
    /// Seconds after an onset at which it is considered passed.
    pub const ONSET_STALE_AFTER: f64 = 0.5;
    /// Extra spacing added to the note radius by the anti-overlap rule.
    pub const PLACEMENT_MARGIN: f32 = 5.0;
    /// Candidate positions tried before a spawn is skipped.
    pub const PLACEMENT_ATTEMPTS: u32 = 32;
}

/// Background video pacing.
pub mod video {
    /// Calibration offset (seconds) between the fractional phase of the first onset and the first video frame.
    pub const PHASE_OFFSET: f64 = 0.6;
}

/// Onset detection parameters.
pub mod analysis {
    /// Samples per analysis frame.
    pub const FRAME_SIZE: usize = 2048;
    /// Samples between the starts of consecutive frames.
    pub const HOP_SIZE: usize = 512;
    /// Standard deviations above the mean an onset strength must reach.
    pub const ADAPTIVE_FACTOR: f32 = 1.0;
    /// Absolute floor for the onset threshold.
    pub const MIN_THRESHOLD: f32 = 1e-4;
    /// Onsets closer than this (seconds) collapse into the strongest one.
    pub const MIN_ONSET_GAP: f64 = 0.25;
}
