//! Grid positions as reported by the grid widget

use super::item::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rectangle the grid widget assigned to an item, in grid cells
///
/// Opaque to the session except for correlating it back to an item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub x: u32,
    pub y: u32,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
}

/// Point-in-time position snapshot keyed by item id
pub type Positions = BTreeMap<ItemId, LayoutPosition>;
