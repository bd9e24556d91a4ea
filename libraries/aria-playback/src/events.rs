//! Playback Events
//!
//! Events the engine queues for UI synchronization. The host drains them
//! after each command or device event batch with
//! [`crate::PlaybackEngine::drain_events`].

use crate::types::{EngineStatus, RepeatMode};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Engine status changed (idle, paused, playing)
    StatusChanged {
        /// The new status
        status: EngineStatus,
    },

    /// A track was activated (new track, or repeat-one restart)
    TrackChanged {
        /// ID of the active track
        track_id: String,
        /// Queue position of the active track
        index: usize,
    },

    /// Queue contents were replaced or edited
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Volume changed
    VolumeChanged {
        /// New level (0.0-1.0)
        level: f32,
    },

    /// Shuffle flag flipped
    ShuffleChanged {
        /// New flag
        enabled: bool,
    },

    /// Repeat mode cycled
    RepeatChanged {
        /// New mode
        mode: RepeatMode,
    },

    /// A play was reported for the active track
    PlayReported {
        /// ID of the reported track
        track_id: String,
    },
}
