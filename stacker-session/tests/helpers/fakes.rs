//! In-memory stand-ins for the external collaborators
//!
//! All fakes use `Rc`/`RefCell` like the session itself. Gates are
//! `tokio::sync::Notify` handles: a gated call suspends until the test calls
//! `notify_one()`, which lets a test interleave other operations.

use async_trait::async_trait;
use stacker_session::config::{Compaction, GridConfig};
use stacker_session::models::{ItemId, Job, LayoutPosition, Metadata, Positions};
use stacker_session::services::{FileFilter, FilePicker, FileSelection, GridWidget, MediaEngine};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::sync::Notify;

// ============================================================================
// Media engine
// ============================================================================

#[derive(Default)]
struct EngineScript {
    probes: HashMap<PathBuf, Result<Metadata, String>>,
    probe_gates: HashMap<PathBuf, Rc<Notify>>,
    process_reply: Option<Result<String, String>>,
    process_gate: Option<Rc<Notify>>,
    probe_calls: Vec<PathBuf>,
    jobs: Vec<Job>,
}

/// Engine answering from a per-path script
#[derive(Default)]
pub struct ScriptedEngine {
    script: RefCell<EngineScript>,
}

impl ScriptedEngine {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Probe of `path` succeeds with `duration` seconds of 1920x1080 video
    pub fn with_video(&self, path: &str, duration: f64) -> &Self {
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.script.borrow_mut().probes.insert(
            PathBuf::from(path),
            Ok(Metadata {
                filename,
                duration,
                width: 1920,
                height: 1080,
            }),
        );
        self
    }

    /// Probe of `path` fails with `message`
    pub fn with_probe_error(&self, path: &str, message: &str) -> &Self {
        self.script
            .borrow_mut()
            .probes
            .insert(PathBuf::from(path), Err(message.to_string()));
        self
    }

    /// Next probe of `path` waits for the returned gate
    pub fn gate_probe(&self, path: &str) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.script
            .borrow_mut()
            .probe_gates
            .insert(PathBuf::from(path), gate.clone());
        gate
    }

    /// Next process call waits for the returned gate
    pub fn gate_process(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.script.borrow_mut().process_gate = Some(gate.clone());
        gate
    }

    pub fn fail_process(&self, message: &str) {
        self.script.borrow_mut().process_reply = Some(Err(message.to_string()));
    }

    pub fn probe_calls(&self) -> Vec<PathBuf> {
        self.script.borrow().probe_calls.clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.script.borrow().jobs.clone()
    }
}

#[async_trait(?Send)]
impl MediaEngine for ScriptedEngine {
    async fn probe(&self, path: &Path) -> anyhow::Result<Metadata> {
        let gate = {
            let mut script = self.script.borrow_mut();
            script.probe_calls.push(path.to_path_buf());
            script.probe_gates.remove(path)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.script.borrow().probes.get(path) {
            Some(Ok(metadata)) => Ok(metadata.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Err(anyhow::anyhow!("{}: No such file or directory", path.display())),
        }
    }

    async fn process(&self, job: &Job) -> anyhow::Result<String> {
        let gate = {
            let mut script = self.script.borrow_mut();
            script.jobs.push(job.clone());
            script.process_gate.take()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.script.borrow().process_reply.clone() {
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            Some(Ok(message)) => Ok(message),
            None => Ok(format!(
                "Stack of {} written to {}",
                job.sources.len(),
                job.output_directory.display()
            )),
        }
    }
}

// ============================================================================
// File picker
// ============================================================================

/// Picker replaying queued selections
///
/// File dialogs default to cancelled, directory dialogs to `/out`.
#[derive(Default)]
pub struct FakePicker {
    files: RefCell<VecDeque<FileSelection>>,
    directories: RefCell<VecDeque<FileSelection>>,
    directory_gate: RefCell<Option<Rc<Notify>>>,
    filters_seen: RefCell<Vec<Vec<FileFilter>>>,
}

impl FakePicker {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn queue_file(&self, selection: FileSelection) {
        self.files.borrow_mut().push_back(selection);
    }

    pub fn queue_directory(&self, selection: FileSelection) {
        self.directories.borrow_mut().push_back(selection);
    }

    /// Next directory dialog waits for the returned gate
    pub fn gate_directory(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.directory_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    pub fn filters_seen(&self) -> Vec<Vec<FileFilter>> {
        self.filters_seen.borrow().clone()
    }
}

#[async_trait(?Send)]
impl FilePicker for FakePicker {
    async fn choose_file(&self, filters: &[FileFilter]) -> FileSelection {
        self.filters_seen.borrow_mut().push(filters.to_vec());
        self.files
            .borrow_mut()
            .pop_front()
            .unwrap_or(FileSelection::Cancelled)
    }

    async fn choose_directory(&self) -> FileSelection {
        let gate = self.directory_gate.borrow_mut().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.directories
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| FileSelection::Single(PathBuf::from("/out")))
    }
}

// ============================================================================
// Grid widget
// ============================================================================

#[derive(Debug, Default)]
pub struct GridModel {
    pub columns: u32,
    pub init_calls: usize,
    pub in_batch: bool,
    pub calls: Vec<String>,
    pub elements: Vec<ItemId>,
}

/// Grid placing elements row-major in 1x1 cells
///
/// Clones share one model so the test can inspect what the session did.
#[derive(Clone, Default)]
pub struct MemoryGrid {
    model: Rc<RefCell<GridModel>>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> Vec<ItemId> {
        self.model.borrow().elements.clone()
    }

    pub fn init_calls(&self) -> usize {
        self.model.borrow().init_calls
    }

    pub fn calls(&self) -> Vec<String> {
        self.model.borrow().calls.clone()
    }
}

impl GridWidget for MemoryGrid {
    fn init(&mut self, config: &GridConfig) {
        let mut model = self.model.borrow_mut();
        model.columns = config.columns;
        model.init_calls += 1;
        model.calls.push("init".to_string());
    }

    fn begin_batch(&mut self) {
        let mut model = self.model.borrow_mut();
        model.in_batch = true;
        model.calls.push("begin".to_string());
    }

    fn remove_all(&mut self) {
        let mut model = self.model.borrow_mut();
        assert!(model.in_batch, "remove_all outside a batch");
        model.elements.clear();
        model.calls.push("remove_all".to_string());
    }

    fn add_element(&mut self, id: ItemId) {
        let mut model = self.model.borrow_mut();
        assert!(model.in_batch, "add_element outside a batch");
        model.elements.push(id);
        model.calls.push(format!("add:{}", id));
    }

    fn end_batch(&mut self) {
        let mut model = self.model.borrow_mut();
        model.in_batch = false;
        model.calls.push("end".to_string());
    }

    fn compact(&mut self, mode: Compaction) {
        self.model.borrow_mut().calls.push(format!("compact:{:?}", mode));
    }

    fn snapshot(&self) -> Positions {
        let model = self.model.borrow();
        let columns = model.columns.max(1);
        model
            .elements
            .iter()
            .enumerate()
            .map(|(i, id)| {
                let i = i as u32;
                (
                    *id,
                    LayoutPosition {
                        x: i % columns,
                        y: i / columns,
                        width: 1,
                        height: 1,
                    },
                )
            })
            .collect()
    }
}
