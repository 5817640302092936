//! Job submission controller
//!
//! Decides whether the stack may be processed and assembles the [`Job`] from
//! a position snapshot and the registry. Awaiting the picker and the engine
//! is left to the orchestrator.

use crate::models::{ItemId, Job, Positions, SourceBinding};
use crate::services::registry::ItemRegistry;
use serde::Serialize;
use std::path::PathBuf;

/// Readiness of the stack for processing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Eligibility {
    Ready,
    /// Fewer bound items than required
    TooFewInputs { bound: usize, required: usize },
    /// At least one item has a FAILED probe
    FailedProbes { ids: Vec<ItemId> },
    /// At least one probe has not resolved yet
    ProbesPending { ids: Vec<ItemId> },
}

impl Eligibility {
    pub fn is_ready(&self) -> bool {
        matches!(self, Eligibility::Ready)
    }

    /// Message shown on the disabled process button
    pub fn reason(&self) -> Option<String> {
        match self {
            Eligibility::Ready => None,
            Eligibility::TooFewInputs { bound, required } => Some(format!(
                "A minimum {} inputs is required for processing ({} selected)",
                required, bound
            )),
            Eligibility::FailedProbes { ids } => Some(format!(
                "Can't process stack with failed probes (item {}), clear them first!",
                join_ids(ids)
            )),
            Eligibility::ProbesPending { ids } => Some(format!(
                "Waiting for probes to finish (item {})",
                join_ids(ids)
            )),
        }
    }
}

fn join_ids(ids: &[ItemId]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone)]
pub struct JobController {
    min_inputs: usize,
}

impl JobController {
    pub fn new(min_inputs: usize) -> Self {
        Self { min_inputs }
    }

    pub fn min_inputs(&self) -> usize {
        self.min_inputs
    }

    /// Readiness of every registered item
    pub fn eligibility(&self, registry: &ItemRegistry) -> Eligibility {
        self.eligibility_for(registry, &registry.ids())
    }

    /// Readiness restricted to `ids`; ids no longer registered are ignored
    ///
    /// Checked in order: too few inputs, failed probes, pending probes.
    pub fn eligibility_for(&self, registry: &ItemRegistry, ids: &[ItemId]) -> Eligibility {
        let entries: Vec<_> = ids
            .iter()
            .filter_map(|id| registry.entry(*id))
            .filter(|e| e.item().is_bound())
            .collect();

        if entries.len() < self.min_inputs {
            return Eligibility::TooFewInputs {
                bound: entries.len(),
                required: self.min_inputs,
            };
        }

        let failed: Vec<ItemId> = entries
            .iter()
            .filter(|e| e.probe().is_some_and(|p| p.is_failed()))
            .map(|e| e.item().id)
            .collect();
        if !failed.is_empty() {
            return Eligibility::FailedProbes { ids: failed };
        }

        let pending: Vec<ItemId> = entries
            .iter()
            .filter(|e| e.probe().is_none())
            .map(|e| e.item().id)
            .collect();
        if !pending.is_empty() {
            return Eligibility::ProbesPending { ids: pending };
        }

        Eligibility::Ready
    }

    /// Build a job from the ids in `positions` that are still registered and bound
    ///
    /// Items added after the snapshot was taken are not part of it and so
    /// never reach the job.
    pub fn assemble(&self, registry: &ItemRegistry, positions: &Positions, output: PathBuf) -> Job {
        let mut job = Job {
            positions: Positions::new(),
            sources: Vec::new(),
            trims: Vec::new(),
            probes: Vec::new(),
            output_directory: output,
        };

        for (id, position) in positions {
            let Some(entry) = registry.entry(*id) else {
                continue;
            };
            let Some(path) = entry.source() else {
                continue;
            };

            job.positions.insert(*id, *position);
            job.sources.push(SourceBinding {
                id: *id,
                path: path.to_path_buf(),
            });
            if let Some(trim) = entry.trim() {
                job.trims.push(*trim);
            }
            if let Some(metadata) = entry.probe().filter(|p| p.is_success()).and_then(|p| p.probed.clone()) {
                job.probes.push(metadata);
            }
        }

        job
    }
}
