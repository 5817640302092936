//! Error types for stacker-session
//!
//! These are local rejections: the operation made no state change and no
//! engine call. Failures reported by external collaborators never surface
//! here; they become FAILED probe or process results instead.

use crate::models::ItemId;
use thiserror::Error;

/// Session operation error
#[derive(Debug, Error)]
pub enum SessionError {
    /// Item id is not (or no longer) registered
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// File picker returned several paths where one was expected
    #[error("Multiple files selected, a single file is required")]
    MultipleSelection,

    /// Trim requested for an item without a successful probe
    #[error("Item {0} has no successful probe")]
    NotProbed(ItemId),

    /// Trim range failed validation
    #[error("Trim range {from:.2}..{to:.2} rejected for item {id}: {reason}")]
    RangeRejected {
        id: ItemId,
        from: f64,
        to: f64,
        reason: String,
    },

    /// Submission preconditions not met
    #[error("Submission blocked: {0}")]
    SubmissionBlocked(String),

    /// A submission is already awaiting the engine
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// stacker-common error
    #[error("Common error: {0}")]
    Common(#[from] stacker_common::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
