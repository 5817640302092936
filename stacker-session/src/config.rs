//! Session configuration
//!
//! Loaded from the `[session]` table of the Stacker TOML file (see
//! `stacker_common::config` for file resolution). Every field has a compiled
//! default, so an absent file or table is valid.

use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use stacker_common::config::{load_toml, resolve_config_path, LoggingConfig, CONFIG_ENV_VAR};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Shortest trim span the selector accepts; config may raise it, never lower it
pub const MIN_TRIM_SPAN_SECS: f64 = 10.0;

/// Fewest bound inputs a stack can be processed with
pub const MIN_INPUTS: usize = 2;

/// Top-level config file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackerConfig {
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

impl StackerConfig {
    /// Resolve, load and validate the config file
    pub fn load(explicit: Option<&Path>) -> SessionResult<Self> {
        let path = resolve_config_path(explicit, CONFIG_ENV_VAR);
        let config: StackerConfig = load_toml(path.as_deref())?;
        config.session.validate()?;

        info!(
            min_inputs = config.session.min_inputs,
            min_span_secs = config.session.trim.min_span_secs,
            columns = config.session.grid.columns,
            "Session configuration loaded"
        );
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Bound inputs required before processing is enabled
    pub min_inputs: usize,
    pub trim: TrimConfig,
    pub grid: GridConfig,
    /// Extensions offered by the file picker's "Video" filter
    pub video_extensions: Vec<String>,
    /// Probe calls running longer than this resolve as FAILED
    pub probe_timeout_secs: Option<u64>,
    /// Buffered session events before slow subscribers start lagging
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_inputs: MIN_INPUTS,
            trim: TrimConfig::default(),
            grid: GridConfig::default(),
            video_extensions: [
                "mp4", "mov", "mkv", "avi", "webm", "m4v", "flv", "wmv", "mpg", "mpeg", "ts",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            probe_timeout_secs: None,
            event_capacity: 100,
        }
    }
}

impl SessionConfig {
    /// Reject values below the design floors
    pub fn validate(&self) -> SessionResult<()> {
        if self.min_inputs < MIN_INPUTS {
            return Err(SessionError::Config(format!(
                "min_inputs must be at least {}, got {}",
                MIN_INPUTS, self.min_inputs
            )));
        }
        if self.trim.min_span_secs.is_nan() || self.trim.min_span_secs < MIN_TRIM_SPAN_SECS {
            return Err(SessionError::Config(format!(
                "trim.min_span_secs must be at least {}, got {}",
                MIN_TRIM_SPAN_SECS, self.trim.min_span_secs
            )));
        }
        if self.trim.step_secs.is_nan() || self.trim.step_secs <= 0.0 {
            return Err(SessionError::Config("trim.step_secs must be positive".to_string()));
        }
        if self.grid.columns == 0 {
            return Err(SessionError::Config("grid.columns must be positive".to_string()));
        }
        if self.probe_timeout_secs == Some(0) {
            return Err(SessionError::Config(
                "probe_timeout_secs must be positive when set".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(SessionError::Config("event_capacity must be positive".to_string()));
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    pub min_span_secs: f64,
    /// Slider step offered to the view; validation does not snap to it
    pub step_secs: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_span_secs: MIN_TRIM_SPAN_SECS,
            step_secs: 5.0,
        }
    }
}

/// How the grid widget packs tiles after a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compaction {
    /// Move tiles up and left into free space, reordering if needed
    Compact,
    /// Move tiles up only, preserving order
    List,
}

/// Fixed grid widget configuration, handed to the widget once at init
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u32,
    pub float: bool,
    pub disable_resize: bool,
    /// Selector of the drag handle inside each tile
    pub handle: String,
    pub compaction: Compaction,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            float: false,
            disable_resize: true,
            handle: ".drag-header".to_string(),
            compaction: Compaction::Compact,
        }
    }
}
