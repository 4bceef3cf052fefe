//! Unified path management for taskwire's local files.
//!
//! All persisted client state lives under one app directory:
//!
//! ```text
//! ~/.config/taskwire/          # Config directory (platform-specific)
//! ├── config.toml              # Transport configuration
//! └── session.json             # Persisted credential token + identity
//! ```

use std::path::PathBuf;
use taskwire_core::error::{Result, TaskwireError};

/// Resolves the locations of taskwire's local files.
///
/// A base override is used by tests to point at a temp directory; the
/// default resolves the platform config directory.
#[derive(Debug, Clone, Default)]
pub struct TaskwirePaths {
    base: Option<PathBuf>,
}

impl TaskwirePaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `base` instead of the platform config directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// The taskwire config directory, e.g. `~/.config/taskwire/`.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join("taskwire"))
            .ok_or_else(|| TaskwireError::config("Cannot find home directory"))
    }

    /// Path of the persisted session file.
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("session.json"))
    }

    /// Path of the transport configuration file.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }
}
