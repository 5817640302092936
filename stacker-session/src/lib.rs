//! stacker-session library interface
//!
//! Client-side session logic for the video stacker: tiles on a free-form
//! grid, one source file per tile, probed metadata, per-tile trim ranges and
//! submission of the composed arrangement to an external processing engine.
//!
//! The view layer owns one [`SessionOrchestrator`] and drives it from user
//! actions. External collaborators (media engine, file picker, grid widget)
//! are injected through the traits in [`services`].

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod services;
pub mod session;

pub use crate::config::{SessionConfig, StackerConfig};
pub use crate::error::{SessionError, SessionResult};
pub use crate::events::SessionEvent;
pub use crate::session::{ItemStatus, ProcessIndicator, SessionOrchestrator};
