//! WAV decoding for beat analysis.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use super::downmix;
use crate::error::AssetError;

/// Mono samples in `[-1, 1]` plus their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Loads a WAV file and mixes it down to mono.
///
/// Integer samples are scaled by their bit depth; float samples are taken as they are.
///
/// # Errors
///
/// Returns `AssetError::NotFound` for a missing file and `AssetError::Wav` for anything the
/// reader cannot parse.
pub fn load_wav(path: &Path) -> Result<DecodedAudio, AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.display().to_string()));
    }

    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = (1u64 << spec.bits_per_sample.saturating_sub(1).min(63)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let channels = spec.channels.max(1) as usize;
    debug!(
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        samples = interleaved.len(),
        "Decoded WAV file"
    );
    Ok(DecodedAudio {
        samples: downmix(&interleaved, channels),
        sample_rate: spec.sample_rate,
    })
}
