//! Shared utilities for stacker-session integration tests

#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod log_capture;

pub use fakes::{FakePicker, MemoryGrid, ScriptedEngine};
pub use log_capture::{capture_logs, LogCapture};

use stacker_session::models::ItemId;
use stacker_session::services::{FilePicker, MediaEngine};
use stacker_session::{SessionConfig, SessionOrchestrator};
use std::path::PathBuf;
use std::rc::Rc;

/// A session wired to fakes the test can inspect
pub struct Fixture {
    pub session: SessionOrchestrator,
    pub engine: Rc<ScriptedEngine>,
    pub picker: Rc<FakePicker>,
    pub grid: MemoryGrid,
}

pub fn fixture() -> Fixture {
    fixture_with(SessionConfig::default())
}

pub fn fixture_with(config: SessionConfig) -> Fixture {
    let engine = ScriptedEngine::new();
    let picker = FakePicker::new();
    let grid = MemoryGrid::new();

    let session = SessionOrchestrator::new(
        config,
        engine.clone() as Rc<dyn MediaEngine>,
        picker.clone() as Rc<dyn FilePicker>,
        Box::new(grid.clone()),
    )
    .expect("default config is valid");

    Fixture {
        session,
        engine,
        picker,
        grid,
    }
}

impl Fixture {
    /// Add an item and upload `path`, scripted to probe as `duration` seconds
    pub async fn add_video(&self, path: &str, duration: f64) -> ItemId {
        self.engine.with_video(path, duration);
        let id = self.session.add_item();
        self.session
            .upload(id, PathBuf::from(path))
            .await
            .expect("item exists");
        id
    }
}

/// Yield to the other branches of a `join!` until `condition` holds
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
