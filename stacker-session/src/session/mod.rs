//! Session orchestration and view-facing status

pub mod indicator;
pub mod orchestrator;

pub use indicator::{ItemStatus, ProcessIndicator};
pub use orchestrator::SessionOrchestrator;
