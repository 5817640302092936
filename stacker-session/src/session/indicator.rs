//! View-facing status derived from session state

use crate::models::{ProbeState, ProcessResult, Status};
use crate::services::{Eligibility, ItemEntry};
use serde::Serialize;

/// Label shown on the process button when nothing else applies
pub const IDLE_LABEL: &str = "Process the stack";

/// State of the process button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "UPPERCASE")]
pub enum ProcessIndicator {
    Idle,
    /// A submission is awaiting the picker or the engine
    Loading,
    /// Preconditions not met; carries the reason
    Disabled(String),
    Succeeded(String),
    Failed(String),
}

impl ProcessIndicator {
    /// Loading wins over a disabled reason, which wins over the last result
    pub fn resolve(loading: bool, eligibility: &Eligibility, last: Option<&ProcessResult>) -> Self {
        if loading {
            return ProcessIndicator::Loading;
        }
        if let Some(reason) = eligibility.reason() {
            return ProcessIndicator::Disabled(reason);
        }
        match last {
            Some(result) if result.status == Status::Success => {
                ProcessIndicator::Succeeded(result.message.clone())
            }
            Some(result) => ProcessIndicator::Failed(result.message.clone()),
            None => ProcessIndicator::Idle,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProcessIndicator::Idle => IDLE_LABEL,
            ProcessIndicator::Loading => "Processing...",
            ProcessIndicator::Disabled(message)
            | ProcessIndicator::Succeeded(message)
            | ProcessIndicator::Failed(message) => message,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, ProcessIndicator::Loading | ProcessIndicator::Disabled(_))
    }
}

/// Probe indicator of one tile; `message` feeds the hover text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemStatus {
    pub state: ProbeState,
    pub message: Option<String>,
}

impl ItemStatus {
    pub fn from_entry(entry: &ItemEntry) -> Self {
        Self {
            state: entry.state(),
            message: entry.probe().map(|p| p.message.clone()),
        }
    }
}
