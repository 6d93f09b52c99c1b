//! Store configuration.
//!
//! [`StoreConfig`] is deserialized from JSON. Every field defaults sensibly
//! so a completely empty `{}` file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Name of the schema model shipped with this build.
pub const DEFAULT_MODEL: &str = "FeedStore";

/// Configuration for opening a feed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file location. `:memory:` opens a private in-memory database.
    pub path: PathBuf,
    /// Name of the schema model to resolve at open time.
    pub model: String,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("feedstore.db"),
            model: DEFAULT_MODEL.to_string(),
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    /// Config for a store at `path` with all other settings defaulted.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Deserialize a `StoreConfig` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from the JSON file at `path`.
    ///
    /// An unreadable file is an [`Error::Io`], malformed contents an
    /// [`Error::Validation`]. Callers without a config file should use
    /// [`StoreConfig::default`] instead.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            Error::Validation(format!("config parse error in {}: {e}", path.display()))
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Whether this config points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}
