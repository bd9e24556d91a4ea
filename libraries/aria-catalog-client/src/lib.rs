//! Aria Catalog Client
//!
//! HTTP client library for the Aria catalog service.
//!
//! # Features
//!
//! - **Songs**: fetch a song record ready to be queued
//! - **Playlists**: fetch a playlist with its resolved songs
//! - **Play counts**: record plays, and a [`CatalogPlayReporter`] that plugs
//!   into the playback engine
//!
//! # Example
//!
//! ```ignore
//! use aria_catalog_client::{CatalogClient, CatalogConfig, CatalogPlayReporter, StaticToken};
//! use aria_playback::PlaybackEngine;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens = Arc::new(StaticToken::new(std::env::var("ARIA_TOKEN").ok()));
//!     let client = CatalogClient::new(CatalogConfig::default(), tokens)?;
//!
//!     let playlist = client.get_playlist("road-trip").await?;
//!
//!     let reporter = CatalogPlayReporter::new(client, tokio::runtime::Handle::current());
//!     let mut engine = PlaybackEngine::default().with_reporter(Box::new(reporter));
//!     engine.play_queue(playlist.songs, 0);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod reporter;
mod types;

// Re-export main types
pub use auth::{StaticToken, TokenProvider};
pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use reporter::CatalogPlayReporter;
pub use types::{CatalogConfig, Playlist, DEFAULT_BASE_URL};
