//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! server, storage, and image sections. Every section defaults sensibly so a
//! completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Environment variable overriding the allowed CORS origin.
pub const FRONT_URL_ENV: &str = "FRONT_URL";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub images: ImageConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a JSON file. Fails if the file is missing or
    /// malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Validation(format!("cannot read config file {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&contents)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from the process environment (`FRONT_URL`).
    pub fn apply_env(&mut self) {
        self.apply_front_url(std::env::var(FRONT_URL_ENV).ok());
    }

    fn apply_front_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.is_empty()) {
            self.server.front_url = url;
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.server.front_url.is_empty() {
            warnings.push("server.front_url is empty; CORS requests will be rejected".into());
        }

        let default_image = &self.images.default_image;
        if !default_image.ends_with(".jpg") && !default_image.ends_with(".jpeg") {
            warnings.push(format!(
                "images.default_image '{}' is not a .jpg/.jpeg file",
                self.images.default_image
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by the CORS layer.
    pub front_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 9000,
            front_url: "http://localhost:3000".into(),
        }
    }
}

/// Which item store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// A single JSON array file, rewritten on every insert.
    #[default]
    Json,
    /// A SQLite database.
    Sqlite,
}

/// How categories are stored by the SQLite backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryLayout {
    /// `items.category_id` references a separate `categories` table.
    #[default]
    Normalized,
    /// `items.category` holds the category name inline.
    Denormalized,
}

impl CategoryLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryLayout::Normalized => "normalized",
            CategoryLayout::Denormalized => "denormalized",
        }
    }
}

/// Item store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub items_json_path: PathBuf,
    pub db_path: PathBuf,
    pub category_layout: CategoryLayout,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            items_json_path: PathBuf::from("db/items.json"),
            db_path: PathBuf::from("db/mercari.sqlite3"),
            category_layout: CategoryLayout::default(),
        }
    }
}

/// Image storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub dir: PathBuf,
    /// Placeholder served when a requested image does not exist.
    pub default_image: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("images"),
            default_image: "default.jpg".into(),
        }
    }
}
