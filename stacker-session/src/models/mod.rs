//! Data models for stacker-session

pub mod item;
pub mod job;
pub mod layout;
pub mod probe;
pub mod trim;

pub use item::{Item, ItemId};
pub use job::{Job, ProcessResult, SourceBinding};
pub use layout::{LayoutPosition, Positions};
pub use probe::{Metadata, ProbeOutcome, ProbeResult, ProbeState, Status};
pub use trim::TrimRange;
