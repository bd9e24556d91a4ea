//! Core types for playback management

use serde::{Deserialize, Deserializer, Serialize};

/// Volume restored by the mute toggle, and the initial volume
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Track information as handed over by the catalog
///
/// Field names follow the catalog's JSON so a song record can be
/// deserialized straight into a `Track`. The engine only ever holds copies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: String,

    /// Track title
    pub title: String,

    /// Identifier of the artist (may be empty for imported tracks)
    #[serde(default)]
    pub artist_id: String,

    /// Artist display name
    pub artist_name: String,

    /// Album reference (optional)
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_id: Option<String>,

    /// Album display name (optional)
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_name: Option<String>,

    /// Cover art location
    #[serde(rename = "coverURL", default)]
    pub cover_url: String,

    /// Audio source location handed to the output device
    #[serde(rename = "audioURL")]
    pub audio_url: String,

    /// Where the track came from
    #[serde(rename = "source", default)]
    pub provenance: TrackProvenance,

    /// Duration in whole seconds as stored by the catalog
    #[serde(default)]
    pub duration: u32,

    /// Cumulative play count at fetch time
    #[serde(default)]
    pub play_count: u64,

    /// Genre tag
    #[serde(default)]
    pub genre: String,
}

/// Provenance tag of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackProvenance {
    /// Uploaded by an artist
    Upload,

    /// Imported from Jamendo
    Jamendo,

    /// Imported from the Free Music Archive
    Fma,

    /// Imported from the Internet Archive
    Ia,

    /// Spotify preview
    Spotify,

    /// Anything the catalog adds later
    #[default]
    #[serde(other)]
    Unknown,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Loop the entire queue
    All,

    /// Loop the current track on natural completion
    One,
}

impl RepeatMode {
    /// Next mode in the off -> all -> one -> off cycle
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Coarse engine status derived from the transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    /// No current track
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,
}

/// Snapshot of the transport state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransportState {
    /// Cursor into the queue
    pub index: Option<usize>,

    /// Whether playback is active
    pub playing: bool,

    /// Shuffle flag
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,

    /// Volume level (0.0-1.0)
    pub volume: f32,

    /// Elapsed seconds in the current track
    pub progress: f64,

    /// Duration reported by the device, 0 until known
    pub duration: f64,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 0.7)
    pub initial_volume: f32,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat mode (default: off)
    pub repeat: RepeatMode,

    /// `previous` restarts the current track past this many seconds (default: 3)
    pub restart_threshold_secs: f64,

    /// Progress at which a play is reported (default: 5)
    pub play_report_threshold_secs: f64,

    /// Volume the mute toggle restores from 0 (default: 0.7)
    pub mute_restore_volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: RepeatMode::Off,
            restart_threshold_secs: 3.0,
            play_report_threshold_secs: 5.0,
            mute_restore_volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackConfig {
    /// Clamp every field into its valid range
    ///
    /// Non-finite values fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let volume = |v: f32, fallback: f32| {
            if v.is_finite() {
                v.clamp(0.0, 1.0)
            } else {
                fallback
            }
        };
        let seconds = |s: f64, fallback: f64| {
            if s.is_finite() {
                s.max(0.0)
            } else {
                fallback
            }
        };

        Self {
            initial_volume: volume(self.initial_volume, defaults.initial_volume),
            shuffle: self.shuffle,
            repeat: self.repeat,
            restart_threshold_secs: seconds(
                self.restart_threshold_secs,
                defaults.restart_threshold_secs,
            ),
            play_report_threshold_secs: seconds(
                self.play_report_threshold_secs,
                defaults.play_report_threshold_secs,
            ),
            mute_restore_volume: volume(self.mute_restore_volume, defaults.mute_restore_volume),
        }
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.initial_volume, 0.7);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.restart_threshold_secs, 3.0);
        assert_eq!(config.play_report_threshold_secs, 5.0);
        assert_eq!(config.mute_restore_volume, 0.7);
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let config = PlaybackConfig {
            initial_volume: 1.7,
            mute_restore_volume: f32::NAN,
            restart_threshold_secs: -2.0,
            play_report_threshold_secs: f64::INFINITY,
            ..PlaybackConfig::default()
        }
        .sanitized();

        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.mute_restore_volume, 0.7);
        assert_eq!(config.restart_threshold_secs, 0.0);
        assert_eq!(config.play_report_threshold_secs, 5.0);
    }

    #[test]
    fn repeat_cycle_returns_to_off() {
        let mode = RepeatMode::Off.cycled();
        assert_eq!(mode, RepeatMode::All);
        let mode = mode.cycled();
        assert_eq!(mode, RepeatMode::One);
        assert_eq!(mode.cycled(), RepeatMode::Off);
    }

    #[test]
    fn track_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "s1",
            "title": "Night Drive",
            "artistId": "a1",
            "artistName": "Neon",
            "albumId": "",
            "albumName": "Streets",
            "coverURL": "https://cdn.example.com/c.jpg",
            "audioURL": "https://cdn.example.com/s1.mp3",
            "source": "jamendo",
            "duration": 214,
            "playCount": 12,
            "genre": "synthwave",
            "status": "approved"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id, "s1");
        assert_eq!(track.artist_name, "Neon");
        assert_eq!(track.album_id, None);
        assert_eq!(track.album_name.as_deref(), Some("Streets"));
        assert_eq!(track.audio_url, "https://cdn.example.com/s1.mp3");
        assert_eq!(track.provenance, TrackProvenance::Jamendo);
        assert_eq!(track.duration, 214);
        assert_eq!(track.play_count, 12);
    }

    #[test]
    fn unknown_provenance_maps_to_unknown() {
        let json = r#"{"id":"x","title":"t","artistName":"a","audioURL":"u","source":"soundcloud"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.provenance, TrackProvenance::Unknown);
        assert_eq!(track.duration, 0);
    }
}
