use strum_macros::{Display, EnumString};

/// How the loudness of a segment between two onsets is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AmplitudeMode {
    /// Largest absolute sample value.
    #[default]
    Peak,
    /// Root mean square of the samples.
    Rms,
}

impl AmplitudeMode {
    /// Measures a segment of samples. Empty segments measure zero.
    pub fn measure(&self, segment: &[f32]) -> f32 {
        if segment.is_empty() {
            return 0.0;
        }

        match self {
            AmplitudeMode::Peak => segment.iter().fold(0.0f32, |peak, sample| peak.max(sample.abs())),
            AmplitudeMode::Rms => {
                let sum: f64 = segment.iter().map(|&s| (s as f64) * (s as f64)).sum();
                (sum / segment.len() as f64).sqrt() as f32
            }
        }
    }
}
