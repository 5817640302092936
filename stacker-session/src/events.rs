//! Session events for the view layer
//!
//! Every state-changing session operation emits one of these on a
//! `tokio::sync::broadcast` channel. Sending with no subscribers is fine;
//! the view may subscribe late or not at all.

use crate::models::{ItemId, Status};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by [`crate::SessionOrchestrator`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    ItemAdded {
        session_id: Uuid,
        item_id: ItemId,
        timestamp: DateTime<Utc>,
    },

    ItemRemoved {
        session_id: Uuid,
        item_id: ItemId,
        timestamp: DateTime<Utc>,
    },

    /// All items, probes and trims cleared
    SessionReset {
        session_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    ProbeStarted {
        session_id: Uuid,
        item_id: ItemId,
        path: PathBuf,
        generation: u64,
        timestamp: DateTime<Utc>,
    },

    ProbeCompleted {
        session_id: Uuid,
        item_id: ItemId,
        status: Status,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A probe response arrived after its binding was superseded
    ProbeDiscarded {
        session_id: Uuid,
        item_id: ItemId,
        generation: u64,
        timestamp: DateTime<Utc>,
    },

    TrimUpdated {
        session_id: Uuid,
        item_id: ItemId,
        from: f64,
        to: f64,
        timestamp: DateTime<Utc>,
    },

    ProcessStarted {
        session_id: Uuid,
        item_count: usize,
        output: PathBuf,
        timestamp: DateTime<Utc>,
    },

    ProcessCompleted {
        session_id: Uuid,
        status: Status,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::ItemAdded { session_id, .. }
            | SessionEvent::ItemRemoved { session_id, .. }
            | SessionEvent::SessionReset { session_id, .. }
            | SessionEvent::ProbeStarted { session_id, .. }
            | SessionEvent::ProbeCompleted { session_id, .. }
            | SessionEvent::ProbeDiscarded { session_id, .. }
            | SessionEvent::TrimUpdated { session_id, .. }
            | SessionEvent::ProcessStarted { session_id, .. }
            | SessionEvent::ProcessCompleted { session_id, .. } => *session_id,
        }
    }
}

/// Thin wrapper around the broadcast sender
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Send to current subscribers; no subscribers is not an error
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}
