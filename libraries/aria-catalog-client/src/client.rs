//! Catalog HTTP client.

use crate::auth::TokenProvider;
use crate::error::{CatalogError, Result};
use crate::types::{CatalogConfig, Envelope, Playlist, PlaylistResponse};
use aria_playback::Track;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the catalog service.
///
/// Cheap to clone; clones share the connection pool and token provider.
///
/// # Example
///
/// ```ignore
/// use aria_catalog_client::{CatalogClient, CatalogConfig, StaticToken};
/// use std::sync::Arc;
///
/// let tokens = Arc::new(StaticToken::new(Some("id-token".into())));
/// let client = CatalogClient::new(CatalogConfig::new("https://music.example.com/api"), tokens)?;
///
/// let playlist = client.get_playlist("road-trip").await?;
/// println!("{} songs in {}", playlist.songs.len(), playlist.name);
///
/// client.record_play(&playlist.songs[0].id).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent)
            .build()
            .map_err(CatalogError::Request)?;

        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    /// Get the normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Record one play of a song.
    ///
    /// `POST /songs/{id}/play`
    pub async fn record_play(&self, song_id: &str) -> Result<()> {
        let url = self.endpoint(&["songs", song_id, "play"])?;
        debug!(url = %url, song_id = %song_id, "Recording play");

        let response = self.send(self.request(Method::POST, url).await).await?;
        let _: Option<IgnoredAny> = parse_envelope(response).await?;

        info!(song_id = %song_id, "Play recorded");
        Ok(())
    }

    /// Fetch a single song.
    ///
    /// `GET /songs/{id}`
    pub async fn get_song(&self, song_id: &str) -> Result<Track> {
        let url = self.endpoint(&["songs", song_id])?;
        debug!(url = %url, "Fetching song");

        let response = self.send(self.request(Method::GET, url).await).await?;
        parse_envelope::<Track>(response)
            .await?
            .ok_or_else(|| CatalogError::ParseError("Song response has no data".to_string()))
    }

    /// Fetch a playlist together with its songs.
    ///
    /// `GET /playlists/{id}`
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let url = self.endpoint(&["playlists", playlist_id])?;
        debug!(url = %url, "Fetching playlist");

        let response = self.send(self.request(Method::GET, url).await).await?;
        let playlist: Playlist = parse_envelope::<PlaylistResponse>(response)
            .await?
            .ok_or_else(|| CatalogError::ParseError("Playlist response has no data".to_string()))?
            .into();

        info!(
            playlist_id = %playlist.id,
            songs = playlist.songs.len(),
            "Fetched playlist"
        );
        Ok(playlist)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.tokens.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CatalogError::Unreachable(e.to_string())
            } else {
                CatalogError::Request(e)
            }
        })
    }
}

/// Validate and normalize a catalog base URL.
fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    let url = Url::parse(trimmed).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(CatalogError::InvalidUrl("URL has no host".into()));
    }
    Ok(url)
}

/// Map status codes and unwrap the catalog envelope.
async fn parse_envelope<T: DeserializeOwned>(response: Response) -> Result<Option<T>> {
    let status = response.status();
    let body = response.text().await.map_err(CatalogError::Request)?;

    if status == StatusCode::UNAUTHORIZED {
        warn!("Catalog rejected credentials");
        return Err(CatalogError::AuthRequired);
    }

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope<IgnoredAny>>(&body)
            .ok()
            .and_then(|e| e.failure_message().map(str::to_string))
            .unwrap_or(body);

        if status == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(message));
        }
        return Err(CatalogError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)
        .map_err(|e| CatalogError::ParseError(format!("Failed to parse response: {}", e)))?;

    if !envelope.success {
        let message = envelope
            .failure_message()
            .unwrap_or("request failed")
            .to_string();
        return Err(CatalogError::ServerError {
            status: status.as_u16(),
            message,
        });
    }

    Ok(envelope.data)
}
