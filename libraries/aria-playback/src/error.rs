//! Error types for the audio output seam

use thiserror::Error;

/// Errors an audio output device can report back to the engine
///
/// The engine never propagates these to its callers; they are logged and
/// folded into transport state (a rejected `play()` leaves playback paused).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Source could not be fetched or decoded
    #[error("Failed to load audio source: {0}")]
    Load(String),

    /// Device refused to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// No source has been loaded yet
    #[error("No source loaded")]
    NoSource,
}

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;
