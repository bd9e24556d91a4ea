//! Types for catalog API requests and responses.

use aria_playback::Track;
use serde::{Deserialize, Serialize};

/// Default catalog endpoint for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Configuration for connecting to the catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL including the API prefix (e.g., "https://music.example.com/api")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl CatalogConfig {
    /// Create a config for the given base URL with default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("Aria/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// =============================================================================
// Response envelope
// =============================================================================

/// Envelope every catalog response is wrapped in.
///
/// Success carries `data` (or only a `message`), failure carries `error`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// Best human-readable description of a failed response.
    pub fn failure_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Playlist Types
// =============================================================================

/// A playlist with its resolved songs, ready to be queued.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Songs in playlist order; entries the catalog could not resolve are skipped
    pub songs: Vec<Track>,
}

/// Playlist record as stored by the catalog.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistRecord {
    pub id: String,
    pub name: String,
}

/// `data` payload of `GET /playlists/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    pub playlist: PlaylistRecord,
    pub songs: Option<Vec<Track>>,
}

impl From<PlaylistResponse> for Playlist {
    fn from(response: PlaylistResponse) -> Self {
        Self {
            id: response.playlist.id,
            name: response.playlist.name,
            songs: response.songs.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_catalog() {
        let config = CatalogConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("Aria/"));
    }

    #[test]
    fn envelope_prefers_error_over_message() {
        let envelope: Envelope<()> =
            serde_json::from_str(r#"{"success":false,"error":"Song not found","message":"x"}"#)
                .unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.failure_message(), Some("Song not found"));

        let envelope: Envelope<()> =
            serde_json::from_str(r#"{"success":true,"message":"Play recorded"}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn playlist_with_null_songs_is_empty() {
        let response: PlaylistResponse = serde_json::from_str(
            r#"{"playlist":{"id":"p1","name":"Road","songIds":["s1"]},"songs":null}"#,
        )
        .unwrap();
        let playlist = Playlist::from(response);
        assert_eq!(playlist.id, "p1");
        assert_eq!(playlist.name, "Road");
        assert!(playlist.songs.is_empty());
    }
}
