//! Audio track playback.
use std::path::Path;

use anyhow::{anyhow, Result};
use sdl2::mixer::{self, InitFlag, Music, DEFAULT_FORMAT};
use tracing::{debug, info, warn};

const AUDIO_FREQUENCY: i32 = 44_100;
const AUDIO_CHANNELS: i32 = 2;
const CHUNK_SIZE: i32 = 1024;
const DEFAULT_VOLUME: i32 = 96;

/// Streams the session's audio track through SDL2_mixer.
///
/// If the mixer fails to initialize, playback is disabled and the track never counts as
/// finished; the session then runs until the player quits or the video ends.
pub struct Audio {
    _mixer_context: Option<mixer::Sdl2MixerContext>,
    music: Option<Music<'static>>,
    state: AudioState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AudioState {
    Loaded,
    Playing,
    Stopped,
    Disabled,
}

impl AudioState {
    /// A disabled track has no end to report.
    fn is_finished(self, music_playing: bool) -> bool {
        match self {
            AudioState::Playing => !music_playing,
            AudioState::Stopped => true,
            AudioState::Loaded | AudioState::Disabled => false,
        }
    }
}

impl Audio {
    /// Opens the mixer and loads `path` as music. Never fails; errors disable playback.
    pub fn new(path: &Path) -> Self {
        match Self::try_new(path) {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Failed to initialize audio: {}. Audio will be disabled.", e);
                Self {
                    _mixer_context: None,
                    music: None,
                    state: AudioState::Disabled,
                }
            }
        }
    }

    fn try_new(path: &Path) -> Result<Self> {
        mixer::open_audio(AUDIO_FREQUENCY, DEFAULT_FORMAT, AUDIO_CHANNELS, CHUNK_SIZE)
            .map_err(|e| anyhow!("Failed to open audio: {}", e))?;

        // WAV playback works without any decoder plugin.
        let mixer_context = match mixer::init(InitFlag::OGG | InitFlag::MP3) {
            Ok(context) => Some(context),
            Err(e) => {
                debug!("SDL2_mixer decoders unavailable: {}", e);
                None
            }
        };

        let music = Music::from_file(path).map_err(|e| anyhow!("Failed to load {}: {}", path.display(), e))?;
        Music::set_volume(DEFAULT_VOLUME);
        info!(path = %path.display(), "Audio track loaded");

        Ok(Self {
            _mixer_context: mixer_context,
            music: Some(music),
            state: AudioState::Loaded,
        })
    }

    /// Starts playback once, from the beginning.
    pub fn play(&mut self) {
        if self.state != AudioState::Loaded {
            return;
        }

        if let Some(music) = &self.music {
            match music.play(1) {
                Ok(()) => self.state = AudioState::Playing,
                Err(e) => {
                    warn!("Failed to play audio track: {}", e);
                    self.state = AudioState::Disabled;
                }
            }
        }
    }

    /// Whether the track has played to its end. Always false while audio is disabled.
    pub fn is_finished(&self) -> bool {
        self.state.is_finished(self.state == AudioState::Playing && Music::is_playing())
    }

    /// Halts playback and releases the track.
    pub fn stop(&mut self) {
        if self.state == AudioState::Playing {
            Music::halt();
            debug!("Audio track stopped");
        }
        if self.state != AudioState::Disabled {
            self.state = AudioState::Stopped;
        }
        self.music = None;
    }
}

impl Drop for Audio {
    fn drop(&mut self) {
        self.stop();
        mixer::close_audio();
    }
}
