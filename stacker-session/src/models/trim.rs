//! Per-item trim range

use super::item::ItemId;
use serde::{Deserialize, Serialize};
use stacker_common::human_time::format_range;

/// Selected `(from, to)` sub-interval of a source, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRange {
    pub id: ItemId,
    pub from: f64,
    pub to: f64,
}

impl TrimRange {
    pub fn new(id: ItemId, from: f64, to: f64) -> Self {
        Self { id, from, to }
    }

    /// Full-length range installed after a successful probe
    pub fn full(id: ItemId, duration: f64) -> Self {
        Self::new(id, 0.0, duration)
    }

    pub fn span(&self) -> f64 {
        self.to - self.from
    }

    /// `HH:MM:SS - HH:MM:SS` label for the tile
    pub fn label(&self) -> String {
        format_range(self.from, self.to)
    }
}
