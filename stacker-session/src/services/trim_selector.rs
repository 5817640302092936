//! Trim range selection
//!
//! A range exists only for items whose current probe succeeded. The selector
//! installs the full-length default and validates updates; it never deletes.
//! Clearing happens with the item record (re-upload, removal, reset).

use crate::config::TrimConfig;
use crate::error::{SessionError, SessionResult};
use crate::models::{ItemId, TrimRange};
use crate::services::registry::ItemRegistry;

#[derive(Debug, Clone)]
pub struct TrimSelector {
    min_span: f64,
    step: f64,
}

impl TrimSelector {
    pub fn new(config: &TrimConfig) -> Self {
        Self {
            min_span: config.min_span_secs,
            step: config.step_secs,
        }
    }

    pub fn min_span(&self) -> f64 {
        self.min_span
    }

    /// Slider step for the view
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Install `(0, duration)` for a successfully probed item
    ///
    /// Returns `None` if the item has no successful probe.
    pub fn install_default(&self, registry: &mut ItemRegistry, id: ItemId) -> Option<TrimRange> {
        let entry = registry.entry_mut(id)?;
        let duration = entry.probe.as_ref()?.probed.as_ref()?.duration;

        let range = TrimRange::full(id, duration);
        entry.trim = Some(range);
        Some(range)
    }

    /// Check `from`/`to` against the probed duration and the minimum span
    pub fn validate(&self, id: ItemId, from: f64, to: f64, duration: f64) -> SessionResult<()> {
        let reject = |reason: &str| SessionError::RangeRejected {
            id,
            from,
            to,
            reason: reason.to_string(),
        };

        if !from.is_finite() || !to.is_finite() {
            return Err(reject("bounds must be finite"));
        }
        if from < 0.0 {
            return Err(reject("start is before 0"));
        }
        if to > duration {
            return Err(reject("end is past the source duration"));
        }
        if from >= to {
            return Err(reject("start must precede end"));
        }
        if to - from < self.min_span {
            return Err(reject(&format!("span is below the {}s minimum", self.min_span)));
        }
        Ok(())
    }

    /// Overwrite the stored range; on rejection nothing changes
    pub fn update(
        &self,
        registry: &mut ItemRegistry,
        id: ItemId,
        from: f64,
        to: f64,
    ) -> SessionResult<TrimRange> {
        let entry = registry.entry_mut(id).ok_or(SessionError::UnknownItem(id))?;

        let duration = match (&entry.probe, &entry.trim) {
            (Some(probe), Some(_)) => probe
                .probed
                .as_ref()
                .map(|m| m.duration)
                .ok_or(SessionError::NotProbed(id))?,
            _ => return Err(SessionError::NotProbed(id)),
        };

        self.validate(id, from, to, duration)?;

        let range = TrimRange::new(id, from, to);
        entry.trim = Some(range);
        Ok(range)
    }
}
