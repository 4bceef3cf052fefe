//! Transport configuration.
//!
//! Endpoint configuration for the HTTP API and the push channel, loaded
//! from `~/.config/taskwire/config.toml` when present, with environment
//! variable overrides (`TASKWIRE_API_URL`, `TASKWIRE_PUSH_URL`) taking
//! precedence over both file and defaults.

use crate::paths::TaskwirePaths;
use serde::{Deserialize, Serialize};
use std::fs;
use taskwire_core::error::Result;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_PUSH_URL: &str = "ws://localhost:5000/ws";

/// Where the client connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Base URL of the HTTP API
    pub api_base_url: String,
    /// URL of the websocket push endpoint
    pub push_url: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            push_url: DEFAULT_PUSH_URL.to_string(),
        }
    }
}

impl TransportConfig {
    /// Loads configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&TaskwirePaths::new())
    }

    /// Loads configuration rooted at the given paths.
    ///
    /// A missing file yields the defaults; a present but unparseable
    /// file is an error (a misconfigured endpoint should not silently
    /// fall back to localhost).
    pub fn load_from(paths: &TaskwirePaths) -> Result<Self> {
        let path = paths.config_file()?;
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("TASKWIRE_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(url) = std::env::var("TASKWIRE_PUSH_URL") {
            config.push_url = url;
        }

        Ok(config)
    }
}
