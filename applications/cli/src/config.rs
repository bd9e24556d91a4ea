//! Player configuration
use aria_catalog_client::{CatalogConfig, DEFAULT_BASE_URL};
use aria_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "aria.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub catalog: CatalogSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Send play counts to the catalog
    pub report_plays: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Virtual clock resolution in milliseconds
    pub tick_ms: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: 30,
            report_plays: true,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { tick_ms: 250 }
    }
}

impl CatalogSettings {
    /// Client settings for the catalog connection
    pub fn client_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            ..CatalogConfig::default()
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `aria.toml` is read if present.
    /// Environment variables prefixed `ARIA_` override the file, with `__`
    /// separating sections (`ARIA_PLAYBACK__SHUFFLE=true`).
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(path, None)
    }

    /// Like [`load`](Self::load), but falls back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match Self::load(path).and_then(|c| c.validate().map(|()| c)) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Invalid configuration, using defaults");
                Self::default()
            }
        }
    }

    fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        // Load from config file
        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with ARIA_)
        settings = settings.add_source(
            config::Environment::with_prefix("ARIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        settings.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.output.tick_ms == 0 {
            return Err(config::ConfigError::Message(
                "output.tick_ms must be >= 1".to_string(),
            ));
        }
        if self.catalog.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "catalog.base_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
