//! Centralized error types for the game.
//!
//! Every error the scheduler can hit during a session is recoverable: systems report
//! them as `GameError` events, and `Game::tick` drains and logs them. Only the desktop
//! adapter returns errors to its caller, and only while setting up.

use std::io;

use bevy_ecs::event::Event;

/// Main error type for the game.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Beat extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors produced while turning audio samples into a beat track.
///
/// Any of these leaves the session without notes; none of them is fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("No audio samples to analyze")]
    EmptyInput,

    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("Found {0} onsets, at least 2 are needed to measure an amplitude")]
    TooFewOnsets(usize),
}

/// Errors from the anti-overlap note placement.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("No free position found after {attempts} attempts, spawn skipped")]
    Exhausted { attempts: u32 },
}

/// Errors from the background video cursor.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame {frame} requested but only {frame_count} frames are decoded")]
    Overrun { frame: usize, frame_count: usize },
}

#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;
