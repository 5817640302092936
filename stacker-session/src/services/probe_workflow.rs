//! Probe workflow
//!
//! An upload is split around the engine call:
//! 1. [`ProbeWorkflow::begin`] binds the path, bumps the item's generation and
//!    clears the previous probe and trim, all before anything is awaited.
//! 2. The caller awaits the engine.
//! 3. [`ProbeWorkflow::complete`] stores the classified result only if the
//!    item still exists and its generation and binding still match the ticket.

use crate::error::{SessionError, SessionResult};
use crate::models::{ItemId, Metadata, ProbeOutcome, ProbeResult};
use crate::services::registry::ItemRegistry;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Correlation token for one probe call
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTicket {
    pub id: ItemId,
    pub generation: u64,
    pub path: PathBuf,
}

pub struct ProbeWorkflow;

impl ProbeWorkflow {
    /// Bind `path` to the item and move it to PROBING
    ///
    /// Overwrites any previous binding in place.
    pub fn begin(registry: &mut ItemRegistry, id: ItemId, path: PathBuf) -> SessionResult<ProbeTicket> {
        let entry = registry.entry_mut(id).ok_or(SessionError::UnknownItem(id))?;

        entry.clear_derived();
        entry.generation += 1;
        entry.probing = true;
        entry.item.source = Some(path.clone());

        debug!(item_id = %id, generation = entry.generation, path = %path.display(), "Probe issued");

        Ok(ProbeTicket {
            id,
            generation: entry.generation,
            path,
        })
    }

    /// Apply an engine response for `ticket`, or discard it if superseded
    pub fn complete(
        registry: &mut ItemRegistry,
        ticket: &ProbeTicket,
        response: anyhow::Result<Metadata>,
    ) -> ProbeOutcome {
        let Some(entry) = registry.entry_mut(ticket.id) else {
            debug!(item_id = %ticket.id, "Probe response for removed item discarded");
            return ProbeOutcome::Superseded;
        };

        let current_binding = entry.item.source.as_deref() == Some(ticket.path.as_path());
        if entry.generation != ticket.generation || !current_binding {
            debug!(
                item_id = %ticket.id,
                ticket_generation = ticket.generation,
                current_generation = entry.generation,
                "Stale probe response discarded"
            );
            return ProbeOutcome::Superseded;
        }

        let result = Self::classify(response);
        if result.is_failed() {
            warn!(item_id = %ticket.id, path = %ticket.path.display(), message = %result.message, "Probe failed");
        }

        entry.probing = false;
        entry.probe = Some(result.clone());
        ProbeOutcome::Applied(result)
    }

    /// Turn an engine response into a stored result
    pub fn classify(response: anyhow::Result<Metadata>) -> ProbeResult {
        match response {
            Ok(metadata) if metadata.has_playable_duration() => ProbeResult::success(metadata),
            Ok(metadata) => ProbeResult::failed(format!(
                "{} has no playable duration",
                metadata.filename
            )),
            Err(e) => ProbeResult::failed(format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeState;

    fn metadata(duration: f64) -> Metadata {
        Metadata {
            filename: "clip.mov".to_string(),
            duration,
            width: 1280,
            height: 720,
        }
    }

    #[test]
    fn test_begin_unknown_item() {
        let mut registry = ItemRegistry::new();
        let result = ProbeWorkflow::begin(&mut registry, ItemId::new(4), PathBuf::from("/a.mov"));
        assert!(matches!(result, Err(SessionError::UnknownItem(_))));
    }

    #[test]
    fn test_begin_then_complete_success() {
        let mut registry = ItemRegistry::new();
        let id = registry.add();

        let ticket = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/a.mov")).unwrap();
        assert_eq!(registry.entry(id).unwrap().state(), ProbeState::Probing);

        let outcome = ProbeWorkflow::complete(&mut registry, &ticket, Ok(metadata(30.0)));
        assert!(matches!(outcome, ProbeOutcome::Applied(ref r) if r.is_success()));
        assert_eq!(registry.entry(id).unwrap().state(), ProbeState::Succeeded);
    }

    #[test]
    fn test_engine_error_becomes_failed() {
        let mut registry = ItemRegistry::new();
        let id = registry.add();
        let ticket = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/bad.mov")).unwrap();

        let outcome = ProbeWorkflow::complete(
            &mut registry,
            &ticket,
            Err(anyhow::anyhow!("moov atom not found")),
        );

        let result = outcome.result().unwrap();
        assert!(result.is_failed());
        assert_eq!(result.message, "moov atom not found");
        assert_eq!(registry.entry(id).unwrap().state(), ProbeState::Failed);
    }

    #[test]
    fn test_zero_duration_becomes_failed() {
        let result = ProbeWorkflow::classify(Ok(metadata(0.0)));
        assert!(result.is_failed());
        assert!(result.message.contains("no playable duration"));
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut registry = ItemRegistry::new();
        let id = registry.add();

        let old = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/a.mov")).unwrap();
        let new = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/b.mov")).unwrap();
        assert!(new.generation > old.generation);

        let applied = ProbeWorkflow::complete(&mut registry, &new, Ok(metadata(60.0)));
        assert!(matches!(applied, ProbeOutcome::Applied(_)));

        let stale = ProbeWorkflow::complete(&mut registry, &old, Ok(metadata(30.0)));
        assert_eq!(stale, ProbeOutcome::Superseded);

        let probed = registry.entry(id).unwrap().probe().unwrap().probed.clone().unwrap();
        assert_eq!(probed.duration, 60.0);
    }

    #[test]
    fn test_same_path_reupload_still_discards_older_call() {
        let mut registry = ItemRegistry::new();
        let id = registry.add();

        let old = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/a.mov")).unwrap();
        let _new = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/a.mov")).unwrap();

        let stale = ProbeWorkflow::complete(&mut registry, &old, Ok(metadata(30.0)));
        assert_eq!(stale, ProbeOutcome::Superseded);
        assert_eq!(registry.entry(id).unwrap().state(), ProbeState::Probing);
    }

    #[test]
    fn test_removed_item_discarded() {
        let mut registry = ItemRegistry::new();
        let id = registry.add();
        let ticket = ProbeWorkflow::begin(&mut registry, id, PathBuf::from("/a.mov")).unwrap();
        registry.remove(id);

        let outcome = ProbeWorkflow::complete(&mut registry, &ticket, Ok(metadata(30.0)));
        assert_eq!(outcome, ProbeOutcome::Superseded);
        assert!(registry.probes().is_empty());
    }
}
