//! Outbound processing request and its result

use super::item::ItemId;
use super::layout::Positions;
use super::probe::{Metadata, Status};
use super::trim::TrimRange;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source file bound to an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceBinding {
    pub id: ItemId,
    pub path: PathBuf,
}

/// Fully assembled request for the processing engine
///
/// Built fresh on every submission from the then-current session state and
/// never stored between submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub positions: Positions,
    pub sources: Vec<SourceBinding>,
    pub trims: Vec<TrimRange>,
    pub probes: Vec<Metadata>,
    #[serde(rename = "output")]
    pub output_directory: PathBuf,
}

impl Job {
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.sources.iter().map(|s| s.id).collect()
    }

    /// Argument object for the host shell's command invocation
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Last-known outcome of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    pub status: Status,
    pub message: String,
}

impl ProcessResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
