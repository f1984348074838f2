//! Beat extraction: turns raw audio samples into a [`BeatTrack`].
//!
//! Extraction runs once per session, before play starts. The scheduler only ever sees the
//! finished track, and walks it with a cursor as the session clock passes each onset.

use bevy_ecs::resource::Resource;
use tracing::{debug, info};

use crate::error::ExtractionError;

pub mod amplitude;
pub mod onset;
pub mod wav;

pub use amplitude::AmplitudeMode;
pub use onset::OnsetDetector;
pub use wav::{load_wav, DecodedAudio};

/// Averages interleaved frames of `channels` samples into a mono signal.
///
/// A trailing partial frame is dropped.
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// A single detected beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Seconds from the start of the track.
    pub time: f64,
    /// Loudness of the segment that starts at this beat, never negative.
    pub amplitude: f32,
}

/// The time-ascending beat sequence of one audio track.
///
/// Onsets and amplitudes are stored as pairs, so there is always exactly one amplitude per onset.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct BeatTrack {
    beats: Vec<Beat>,
}

impl BeatTrack {
    /// Pairs onset times with amplitudes, truncating whichever list is longer.
    ///
    /// Beats are sorted by time; negative amplitudes are clamped to zero.
    pub fn new(onsets: &[f64], amplitudes: &[f32]) -> Self {
        let mut beats: Vec<Beat> = onsets
            .iter()
            .zip(amplitudes)
            .map(|(&time, &amplitude)| Beat {
                time,
                amplitude: amplitude.max(0.0),
            })
            .collect();
        beats.sort_by(|a, b| a.time.total_cmp(&b.time));

        Self { beats }
    }

    /// A track with no beats; a session over it never spawns a note.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Detects onsets in mono `samples` and measures the amplitude between each consecutive pair.
    ///
    /// N onsets produce N-1 amplitudes, so the final onset is dropped.
    ///
    /// # Errors
    ///
    /// Fails on empty input, a zero sample rate, or when fewer than two onsets are found
    /// (the resulting track would be empty). Callers are expected to fall back to
    /// [`BeatTrack::empty`].
    pub fn extract(samples: &[f32], sample_rate: u32, mode: AmplitudeMode) -> Result<Self, ExtractionError> {
        Self::extract_with(&OnsetDetector::default(), samples, sample_rate, mode)
    }

    /// [`BeatTrack::extract`] with a custom onset detector.
    pub fn extract_with(
        detector: &OnsetDetector,
        samples: &[f32],
        sample_rate: u32,
        mode: AmplitudeMode,
    ) -> Result<Self, ExtractionError> {
        if samples.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        if sample_rate == 0 {
            return Err(ExtractionError::InvalidSampleRate(sample_rate));
        }

        let offsets = detector.detect(samples, sample_rate);
        debug!(onsets = offsets.len(), samples = samples.len(), sample_rate, "Onset detection finished");
        if offsets.len() < 2 {
            return Err(ExtractionError::TooFewOnsets(offsets.len()));
        }

        let amplitudes: Vec<f32> = offsets
            .windows(2)
            .map(|pair| mode.measure(&samples[pair[0]..pair[1]]))
            .collect();
        let onsets: Vec<f64> = offsets
            .iter()
            .map(|&offset| offset as f64 / sample_rate as f64)
            .collect();

        let track = Self::new(&onsets, &amplitudes);
        info!(beats = track.len(), tempo = ?track.tempo_bpm(), ?mode, "Beat track extracted");
        Ok(track)
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Beat> {
        self.beats.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beat> {
        self.beats.iter()
    }

    pub fn onset_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.beats.iter().map(|beat| beat.time)
    }

    pub fn amplitudes(&self) -> impl Iterator<Item = f32> + '_ {
        self.beats.iter().map(|beat| beat.amplitude)
    }

    /// Time of the first onset, if any.
    pub fn first_onset(&self) -> Option<f64> {
        self.beats.first().map(|beat| beat.time)
    }

    /// Estimates the tempo from the median spacing between onsets.
    ///
    /// Returns `None` with fewer than two beats.
    pub fn tempo_bpm(&self) -> Option<f64> {
        let mut intervals: Vec<f64> = self
            .beats
            .windows(2)
            .map(|pair| pair[1].time - pair[0].time)
            .filter(|interval| *interval > 0.0)
            .collect();
        if intervals.is_empty() {
            return None;
        }

        intervals.sort_by(f64::total_cmp);
        let mid = intervals.len() / 2;
        let median = if intervals.len() % 2 == 0 {
            (intervals[mid - 1] + intervals[mid]) / 2.0
        } else {
            intervals[mid]
        };

        Some(60.0 / median)
    }
}
