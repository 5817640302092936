//! Configuration file resolution and TOML loading
//!
//! Resolution follows a fixed priority order:
//! 1. Explicit path supplied by the host (highest priority)
//! 2. Environment variable
//! 3. `<user config dir>/stacker/config.toml`
//! 4. No file: compiled defaults

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "STACKER_CONFIG";

/// Logging section shared by every Stacker config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. "info" or "stacker_session=debug"
    pub level: String,
    /// Include the event target (module path) in each line
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

/// Resolve which config file (if any) should be loaded
///
/// Returns `None` when no candidate exists; callers fall back to defaults.
/// An explicit path or environment path is returned even if it does not exist
/// so that [`load_toml`] can warn about it.
pub fn resolve_config_path(explicit: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: explicit path
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    // Priority 2: environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    let user_config = default_config_path()?;
    if user_config.exists() {
        return Some(user_config);
    }

    None
}

/// Platform location of the user's config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stacker").join("config.toml"))
}

/// Load a TOML file into `T`
///
/// A missing file is not an error: a warning is logged and `T::default()`
/// is returned. A file that exists but fails to read or parse is an error.
pub fn load_toml<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        debug!("No config file found, using compiled defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using compiled defaults");
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;

    let parsed = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    debug!(path = %path.display(), "Config file loaded");
    Ok(parsed)
}
