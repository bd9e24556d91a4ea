//! Transport commands
//!
//! One variant per UI control. Hosts that receive commands from elsewhere
//! (a remote, a stdin prompt, a media key handler) can forward them with
//! [`crate::PlaybackEngine::dispatch`] instead of matching on them
//! themselves.

use crate::types::Track;

/// A command issued by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Play a single track now (queue becomes just this track)
    PlayTrack(Track),

    /// Replace the queue and start at `start`
    PlayQueue {
        /// New queue contents
        tracks: Vec<Track>,
        /// Entry to start from (clamped)
        start: usize,
    },

    /// Append a track to the queue
    AddToQueue(Track),

    /// Remove a non-active queue entry
    RemoveFromQueue(usize),

    /// Flip between playing and paused
    TogglePlay,

    /// Pause playback
    Pause,

    /// Resume playback
    Resume,

    /// Skip forward
    Next,

    /// Restart or skip back
    Previous,

    /// Move the playhead (seconds)
    Seek(f64),

    /// Set volume (0.0-1.0)
    SetVolume(f32),

    /// Mute, or restore the default level when muted
    ToggleMute,

    /// Flip shuffle
    ToggleShuffle,

    /// Cycle repeat mode
    ToggleRepeat,
}
