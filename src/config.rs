use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::AppError;

/// Runtime configuration.
///
/// Resolved from defaults, then `folio.toml` (or an explicit file), then
/// `FOLIO_*` environment variables, e.g. `FOLIO_MONGODB_URI`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub listen_addr: String,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    /// Search is disabled when unset.
    #[serde(default)]
    pub meili_url: Option<String>,
    #[serde(default)]
    pub meili_api_key: Option<String>,
    /// Seed demo tags and content on startup.
    pub demo_mode: bool,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("folio").required(false),
        };

        Self::from_builder(
            Self::defaults()?
                .add_source(file)
                .add_source(Environment::with_prefix("FOLIO")),
        )
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, AppError> {
        Config::builder()
            .set_default("listen_addr", "127.0.0.1:3000")
            .and_then(|b| b.set_default("mongodb_uri", "mongodb://localhost:27017"))
            .and_then(|b| b.set_default("mongodb_database", "folio"))
            .and_then(|b| b.set_default("demo_mode", false))
            .map_err(|e| AppError::Config(e.to_string()))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, AppError> {
        builder
            .build()
            .and_then(|config| config.try_deserialize::<AppConfig>())
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// The Meilisearch URL, if search is configured.
    pub fn search_url(&self) -> Option<&str> {
        self.meili_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}
