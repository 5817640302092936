//! Grid layout adapter
//!
//! The grid widget keeps its own imperative spatial model. The adapter keeps
//! the widget's element set equal to the registry's id set by rebuilding it
//! inside one batch after every membership change, then compacting.

use crate::config::{Compaction, GridConfig};
use crate::models::{ItemId, Positions};
use tracing::debug;

/// Spatial grid widget capability
///
/// Rendering and drag/resize mechanics live behind this trait. All calls are
/// synchronous; the widget is never awaited.
pub trait GridWidget {
    fn init(&mut self, config: &GridConfig);

    fn begin_batch(&mut self);

    fn remove_all(&mut self);

    /// Place one element tagged with `id`
    fn add_element(&mut self, id: ItemId);

    fn end_batch(&mut self);

    fn compact(&mut self, mode: Compaction);

    /// Current rectangle of every tracked element
    fn snapshot(&self) -> Positions;
}

pub struct GridLayout {
    widget: Box<dyn GridWidget>,
    config: GridConfig,
    initialized: bool,
    placed: Vec<ItemId>,
}

impl GridLayout {
    pub fn new(widget: Box<dyn GridWidget>, config: GridConfig) -> Self {
        Self {
            widget,
            config,
            initialized: false,
            placed: Vec::new(),
        }
    }

    /// Initialize the widget on first use; later calls do nothing
    pub fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.widget.init(&self.config);
        self.initialized = true;
        debug!(columns = self.config.columns, "Grid widget initialized");
    }

    /// Clear and rebuild the widget's elements from `ids`
    pub fn sync(&mut self, ids: &[ItemId]) {
        self.ensure_initialized();

        self.widget.begin_batch();
        self.widget.remove_all();
        for id in ids {
            self.widget.add_element(*id);
        }
        self.widget.end_batch();
        self.widget.compact(self.config.compaction);

        self.placed = ids.to_vec();
        debug!(elements = ids.len(), "Grid synchronized");
    }

    /// Position snapshot restricted to the ids placed by the last sync
    pub fn snapshot(&self) -> Positions {
        let mut positions = self.widget.snapshot();
        positions.retain(|id, _| self.placed.contains(id));
        positions
    }

    pub fn placed_ids(&self) -> &[ItemId] {
        &self.placed
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }
}
