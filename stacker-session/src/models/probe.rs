//! Probe workflow state and results
//!
//! Per-item state machine:
//! UNBOUND → PROBING → SUCCEEDED | FAILED, with any re-upload returning to PROBING.

use serde::{Deserialize, Serialize};
use stacker_common::human_time::format_duration;

/// Outcome status shared by probe and process results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failed,
}

/// Media metadata returned by a successful probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub filename: String,
    /// Seconds, fractional
    pub duration: f64,
    pub width: u32,
    pub height: u32,
}

impl Metadata {
    /// `KEY: value` lines for the metadata hover card
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("FILENAME: {}", self.filename),
            format!("DURATION: {}", format_duration(self.duration)),
            format!("WIDTH: {}", self.width),
            format!("HEIGHT: {}", self.height),
        ]
    }

    /// A duration a trim range can be built on
    pub fn has_playable_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

/// Outcome of probing a bound source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: Status,
    pub message: String,
    /// Present only when `status` is `Success`
    pub probed: Option<Metadata>,
}

impl ProbeResult {
    pub fn success(metadata: Metadata) -> Self {
        Self {
            status: Status::Success,
            message: format!("Probed {}", metadata.filename),
            probed: Some(metadata),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: message.into(),
            probed: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }
}

/// Where an item is in the probe workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeState {
    /// No source bound yet
    Unbound,
    /// Source bound, probe call outstanding
    Probing,
    /// Last probe for the current binding succeeded
    Succeeded,
    /// Last probe for the current binding failed
    Failed,
}

/// What happened to a probe response when it arrived
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// Response matched the current binding and was stored
    Applied(ProbeResult),
    /// A newer upload, a removal or a reset superseded this call
    Superseded,
}

impl ProbeOutcome {
    pub fn result(&self) -> Option<&ProbeResult> {
        match self {
            ProbeOutcome::Applied(result) => Some(result),
            ProbeOutcome::Superseded => None,
        }
    }
}
