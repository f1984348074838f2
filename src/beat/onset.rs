//! Tempo-independent onset detection.
//!
//! The pipeline runs over the whole track at once:
//!
//! 1. **Energy envelope**: RMS of overlapping frames
//! 2. **Onset strength**: half-wave rectified energy flux between consecutive frames
//! 3. **Adaptive threshold**: `mean + adaptive_factor * std`, floored at `min_threshold`
//! 4. **Candidates**: local maxima of the strength at or above the threshold
//! 5. **Hysteresis**: candidates closer than `min_gap` collapse into the strongest one

use tracing::trace;

use crate::constants::analysis;

/// Finds onsets in a mono signal.
#[derive(Debug, Clone, PartialEq)]
pub struct OnsetDetector {
    pub frame_size: usize,
    pub hop_size: usize,
    pub adaptive_factor: f32,
    pub min_threshold: f32,
    /// Seconds.
    pub min_gap: f64,
}

impl Default for OnsetDetector {
    fn default() -> Self {
        Self {
            frame_size: analysis::FRAME_SIZE,
            hop_size: analysis::HOP_SIZE,
            adaptive_factor: analysis::ADAPTIVE_FACTOR,
            min_threshold: analysis::MIN_THRESHOLD,
            min_gap: analysis::MIN_ONSET_GAP,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    frame: usize,
    strength: f32,
}

impl OnsetDetector {
    /// Returns the sample offsets of every detected onset, ascending.
    pub fn detect(&self, samples: &[f32], sample_rate: u32) -> Vec<usize> {
        let hop = self.hop_size.max(1);
        let frame_size = self.frame_size.max(hop);

        let envelope = self.energy_envelope(samples, frame_size, hop);
        if envelope.is_empty() {
            return Vec::new();
        }

        let strength = Self::onset_strength(&envelope);
        let threshold = self.compute_threshold(&strength);
        let candidates = Self::find_candidates(&strength, threshold);
        trace!(
            frames = envelope.len(),
            threshold,
            candidates = candidates.len(),
            "Onset candidates found"
        );

        let min_gap_frames = ((self.min_gap * sample_rate as f64) / hop as f64).ceil() as usize;
        let accepted = Self::apply_hysteresis(&candidates, min_gap_frames);

        // A flux peak means the newest hop of that frame holds the onset.
        accepted
            .iter()
            .map(|candidate| candidate.frame * hop + frame_size - hop)
            .collect()
    }

    fn energy_envelope(&self, samples: &[f32], frame_size: usize, hop: usize) -> Vec<f32> {
        if samples.len() < frame_size {
            return Vec::new();
        }

        let frame_count = 1 + (samples.len() - frame_size) / hop;
        (0..frame_count)
            .map(|i| {
                let frame = &samples[i * hop..i * hop + frame_size];
                let sum: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
                (sum / frame_size as f64).sqrt() as f32
            })
            .collect()
    }

    /// Frame 0 has no predecessor, so its flux is zero.
    fn onset_strength(envelope: &[f32]) -> Vec<f32> {
        let mut previous = envelope.first().copied().unwrap_or(0.0);
        envelope
            .iter()
            .map(|&energy| {
                let flux = (energy - previous).max(0.0);
                previous = energy;
                flux
            })
            .collect()
    }

    fn compute_threshold(&self, values: &[f32]) -> f32 {
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;

        (mean + self.adaptive_factor * variance.sqrt()).max(self.min_threshold)
    }

    fn find_candidates(values: &[f32], threshold: f32) -> Vec<Candidate> {
        values
            .iter()
            .enumerate()
            .filter(|&(i, &value)| {
                let prev = if i == 0 { 0.0 } else { values[i - 1] };
                let next = values.get(i + 1).copied().unwrap_or(0.0);
                value >= threshold && value > prev && value >= next
            })
            .map(|(frame, &strength)| Candidate { frame, strength })
            .collect()
    }

    fn apply_hysteresis(candidates: &[Candidate], min_gap_frames: usize) -> Vec<Candidate> {
        let mut result: Vec<Candidate> = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match result.last_mut() {
                Some(last) if candidate.frame - last.frame < min_gap_frames => {
                    if candidate.strength > last.strength {
                        *last = *candidate;
                    }
                }
                _ => result.push(*candidate),
            }
        }

        result
    }
}
