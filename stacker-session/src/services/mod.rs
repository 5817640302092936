//! Session services and external capability traits
//!
//! The registry and the workflows below operate on state owned by the
//! [`crate::SessionOrchestrator`]; the capability traits describe the
//! collaborators the host application injects.

pub mod engine;
pub mod grid;
pub mod job_controller;
pub mod picker;
pub mod probe_workflow;
pub mod registry;
pub mod trim_selector;

pub use engine::MediaEngine;
pub use grid::{GridLayout, GridWidget};
pub use job_controller::{Eligibility, JobController};
pub use picker::{FileFilter, FilePicker, FileSelection};
pub use probe_workflow::{ProbeTicket, ProbeWorkflow};
pub use registry::{ItemEntry, ItemRegistry};
pub use trim_selector::TrimSelector;
