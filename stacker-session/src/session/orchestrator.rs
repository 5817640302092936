//! Session orchestrator
//!
//! Owns every piece of per-item state and is the only place that mutates it.
//! The view layer holds a cloneable handle and calls into it from user
//! actions; operations may interleave at their await points.
//!
//! All state lives behind `RefCell`s on a single thread. A borrow is never
//! held across an `.await`: each operation reads or mutates in a synchronous
//! block, releases it, and only then suspends.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::events::{EventBus, SessionEvent};
use crate::models::{
    Item, ItemId, Metadata, Positions, ProbeOutcome, ProbeResult, ProbeState, ProcessResult, TrimRange,
};
use crate::services::{
    Eligibility, FileFilter, FilePicker, FileSelection, GridLayout, GridWidget, ItemRegistry, JobController,
    MediaEngine, ProbeWorkflow, TrimSelector,
};
use crate::session::indicator::{ItemStatus, ProcessIndicator};
use chrono::Utc;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct SessionState {
    registry: ItemRegistry,
    /// Retained for display until the next submission, add or reset
    last_result: Option<ProcessResult>,
    /// True from the directory prompt until the engine call returns
    loading: bool,
}

struct Inner {
    session_id: Uuid,
    config: SessionConfig,
    state: RefCell<SessionState>,
    grid: RefCell<GridLayout>,
    engine: Rc<dyn MediaEngine>,
    picker: Rc<dyn FilePicker>,
    events: EventBus,
    trims: TrimSelector,
    jobs: JobController,
}

/// Clears the loading flag on every exit path of a submission, including a
/// dropped future
struct LoadingGuard<'a> {
    inner: &'a Inner,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.state.try_borrow_mut() {
            state.loading = false;
        }
    }
}

/// Handle to one stacking session
#[derive(Clone)]
pub struct SessionOrchestrator {
    inner: Rc<Inner>,
}

impl SessionOrchestrator {
    /// Create a session and initialize the grid widget
    ///
    /// # Arguments
    /// * `config` - Validated before use
    /// * `engine` - Probing/processing engine
    /// * `picker` - Native file dialogs
    /// * `widget` - Grid widget; initialized here, exactly once
    pub fn new(
        config: SessionConfig,
        engine: Rc<dyn MediaEngine>,
        picker: Rc<dyn FilePicker>,
        widget: Box<dyn GridWidget>,
    ) -> SessionResult<Self> {
        config.validate()?;

        let session_id = Uuid::new_v4();
        let mut grid = GridLayout::new(widget, config.grid.clone());
        grid.ensure_initialized();

        info!(
            session_id = %session_id,
            min_inputs = config.min_inputs,
            min_span_secs = config.trim.min_span_secs,
            "Stack session created"
        );

        let inner = Inner {
            session_id,
            events: EventBus::new(config.event_capacity),
            trims: TrimSelector::new(&config.trim),
            jobs: JobController::new(config.min_inputs),
            state: RefCell::new(SessionState::default()),
            grid: RefCell::new(grid),
            engine,
            picker,
            config,
        };

        Ok(Self { inner: Rc::new(inner) })
    }

    // ============================================================================
    // Item registry
    // ============================================================================

    /// Append a new unbound item and place it on the grid
    pub fn add_item(&self) -> ItemId {
        let (id, ids) = {
            let mut state = self.inner.state.borrow_mut();
            let id = state.registry.add();
            state.last_result = None;
            (id, state.registry.ids())
        };
        self.sync_grid(&ids);

        debug!(session_id = %self.inner.session_id, item_id = %id, "Item added");
        self.inner.events.emit(SessionEvent::ItemAdded {
            session_id: self.inner.session_id,
            item_id: id,
            timestamp: Utc::now(),
        });
        id
    }

    /// Remove an item with its probe result and trim range
    ///
    /// Returns `false` and changes nothing for an unknown id.
    pub fn remove_item(&self, id: ItemId) -> bool {
        let ids = {
            let mut state = self.inner.state.borrow_mut();
            if !state.registry.remove(id) {
                return false;
            }
            state.last_result = None;
            state.registry.ids()
        };
        self.sync_grid(&ids);

        debug!(session_id = %self.inner.session_id, item_id = %id, "Item removed");
        self.inner.events.emit(SessionEvent::ItemRemoved {
            session_id: self.inner.session_id,
            item_id: id,
            timestamp: Utc::now(),
        });
        true
    }

    /// Drop every item, probe, trim and the last process result
    ///
    /// Ids keep counting from where they were. An in-flight submission is not
    /// cancelled; its result is still stored when it returns.
    pub fn reset(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.registry.reset();
            state.last_result = None;
        }
        self.sync_grid(&[]);

        info!(session_id = %self.inner.session_id, "Session reset");
        self.inner.events.emit(SessionEvent::SessionReset {
            session_id: self.inner.session_id,
            timestamp: Utc::now(),
        });
    }

    fn sync_grid(&self, ids: &[ItemId]) {
        self.inner.grid.borrow_mut().sync(ids);
    }

    // ============================================================================
    // Probe workflow
    // ============================================================================

    /// Bind `path` to the item and probe it
    ///
    /// The previous probe result and trim range are cleared before the engine
    /// is called. Engine failures become a FAILED result, never an `Err`.
    pub async fn upload(&self, id: ItemId, path: PathBuf) -> SessionResult<ProbeOutcome> {
        let ticket = {
            let mut state = self.inner.state.borrow_mut();
            ProbeWorkflow::begin(&mut state.registry, id, path)?
        };

        info!(
            session_id = %self.inner.session_id,
            item_id = %id,
            path = %ticket.path.display(),
            "Probing source"
        );
        self.inner.events.emit(SessionEvent::ProbeStarted {
            session_id: self.inner.session_id,
            item_id: id,
            path: ticket.path.clone(),
            generation: ticket.generation,
            timestamp: Utc::now(),
        });

        let response = self.run_probe(&ticket.path).await;

        let outcome = {
            let mut state = self.inner.state.borrow_mut();
            let outcome = ProbeWorkflow::complete(&mut state.registry, &ticket, response);
            if matches!(&outcome, ProbeOutcome::Applied(result) if result.is_success()) {
                self.inner.trims.install_default(&mut state.registry, id);
            }
            outcome
        };

        match &outcome {
            ProbeOutcome::Applied(result) => {
                self.inner.events.emit(SessionEvent::ProbeCompleted {
                    session_id: self.inner.session_id,
                    item_id: id,
                    status: result.status,
                    message: result.message.clone(),
                    timestamp: Utc::now(),
                });
            }
            ProbeOutcome::Superseded => {
                self.inner.events.emit(SessionEvent::ProbeDiscarded {
                    session_id: self.inner.session_id,
                    item_id: id,
                    generation: ticket.generation,
                    timestamp: Utc::now(),
                });
            }
        }

        Ok(outcome)
    }

    async fn run_probe(&self, path: &Path) -> anyhow::Result<Metadata> {
        let probe = self.inner.engine.probe(path);
        match self.inner.config.probe_timeout() {
            Some(limit) => match tokio::time::timeout(limit, probe).await {
                Ok(response) => response,
                Err(_) => Err(anyhow::anyhow!("Probe timed out after {}s", limit.as_secs())),
            },
            None => probe.await,
        }
    }

    /// Ask the picker for one video file and upload it
    ///
    /// # Returns
    /// * `Ok(None)` - Dialog cancelled; nothing changed
    /// * `Ok(Some(outcome))` - File uploaded
    /// * `Err(MultipleSelection)` - Several files chosen; nothing changed
    pub async fn choose_and_upload(&self, id: ItemId) -> SessionResult<Option<ProbeOutcome>> {
        if !self.inner.state.borrow().registry.contains(id) {
            return Err(SessionError::UnknownItem(id));
        }

        let filters = [FileFilter::new("Video", &self.inner.config.video_extensions)];
        match self.inner.picker.choose_file(&filters).await {
            FileSelection::Cancelled => {
                debug!(session_id = %self.inner.session_id, item_id = %id, "File selection cancelled");
                Ok(None)
            }
            FileSelection::Multiple(paths) => {
                warn!(
                    session_id = %self.inner.session_id,
                    item_id = %id,
                    selected = paths.len(),
                    "Multiple files selected for a single tile"
                );
                Err(SessionError::MultipleSelection)
            }
            FileSelection::Single(path) => self.upload(id, path).await.map(Some),
        }
    }

    // ============================================================================
    // Trim ranges
    // ============================================================================

    /// Replace the item's trim range; a rejected range leaves the old one
    pub fn update_range(&self, id: ItemId, from: f64, to: f64) -> SessionResult<TrimRange> {
        let result = {
            let mut state = self.inner.state.borrow_mut();
            self.inner.trims.update(&mut state.registry, id, from, to)
        };

        match &result {
            Ok(range) => {
                self.inner.events.emit(SessionEvent::TrimUpdated {
                    session_id: self.inner.session_id,
                    item_id: id,
                    from: range.from,
                    to: range.to,
                    timestamp: Utc::now(),
                });
            }
            Err(e) => {
                debug!(session_id = %self.inner.session_id, item_id = %id, error = %e, "Trim update rejected");
            }
        }
        result
    }

    pub fn trim_selector(&self) -> &TrimSelector {
        &self.inner.trims
    }

    // ============================================================================
    // Submission
    // ============================================================================

    /// Readiness of the current stack
    pub fn eligibility(&self) -> Eligibility {
        self.inner.jobs.eligibility(&self.inner.state.borrow().registry)
    }

    /// Process the stack
    ///
    /// The position snapshot is taken before the first await, so items added
    /// while the dialog or the engine is pending are not part of this job.
    ///
    /// # Returns
    /// * `Ok(result)` - Stored as the last result; FAILED covers dialog
    ///   cancellation, multi-selection and engine errors
    /// * `Err(SubmissionBlocked)` - Preconditions not met; nothing changed
    /// * `Err(SubmissionInFlight)` - Another submission is still loading
    pub async fn submit(&self) -> SessionResult<ProcessResult> {
        // Phase 1: synchronous checks and snapshot
        let positions = {
            let mut state = self.inner.state.borrow_mut();
            if state.loading {
                return Err(SessionError::SubmissionInFlight);
            }
            if let Some(reason) = self.inner.jobs.eligibility(&state.registry).reason() {
                debug!(session_id = %self.inner.session_id, reason = %reason, "Submission blocked");
                return Err(SessionError::SubmissionBlocked(reason));
            }
            state.loading = true;
            self.inner.grid.borrow().snapshot()
        };
        let guard = LoadingGuard { inner: &self.inner };

        // Phase 2: output prompt, job assembly, engine call
        let result = self.run_submission(positions).await;
        drop(guard);

        // Phase 3: record
        self.inner.state.borrow_mut().last_result = Some(result.clone());

        if result.is_success() {
            info!(session_id = %self.inner.session_id, message = %result.message, "Stack processed");
        } else {
            warn!(session_id = %self.inner.session_id, message = %result.message, "Stack processing failed");
        }
        self.inner.events.emit(SessionEvent::ProcessCompleted {
            session_id: self.inner.session_id,
            status: result.status,
            message: result.message.clone(),
            timestamp: Utc::now(),
        });

        Ok(result)
    }

    async fn run_submission(&self, positions: Positions) -> ProcessResult {
        if positions.is_empty() {
            return ProcessResult::failed("No layout found");
        }

        let output = match self.inner.picker.choose_directory().await {
            FileSelection::Single(path) => path,
            FileSelection::Multiple(_) => return ProcessResult::failed("Multiple outputs selected"),
            FileSelection::Cancelled => return ProcessResult::failed("No output directory selected"),
        };

        let job = {
            let state = self.inner.state.borrow();
            let ids: Vec<ItemId> = positions.keys().copied().collect();
            if let Some(reason) = self.inner.jobs.eligibility_for(&state.registry, &ids).reason() {
                return ProcessResult::failed(format!("Stack changed while choosing output: {}", reason));
            }
            self.inner.jobs.assemble(&state.registry, &positions, output)
        };

        info!(
            session_id = %self.inner.session_id,
            sources = job.sources.len(),
            output = %job.output_directory.display(),
            "Submitting stack"
        );
        self.inner.events.emit(SessionEvent::ProcessStarted {
            session_id: self.inner.session_id,
            item_count: job.sources.len(),
            output: job.output_directory.clone(),
            timestamp: Utc::now(),
        });

        match self.inner.engine.process(&job).await {
            Ok(message) => ProcessResult::success(message),
            Err(e) => ProcessResult::failed(format!("{:#}", e)),
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn session_id(&self) -> Uuid {
        self.inner.session_id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn items(&self) -> Vec<Item> {
        self.inner.state.borrow().registry.items()
    }

    pub fn item_count(&self) -> usize {
        self.inner.state.borrow().registry.len()
    }

    pub fn probe_result(&self, id: ItemId) -> Option<ProbeResult> {
        self.inner
            .state
            .borrow()
            .registry
            .entry(id)
            .and_then(|e| e.probe().cloned())
    }

    pub fn probes(&self) -> BTreeMap<ItemId, ProbeResult> {
        self.inner.state.borrow().registry.probes()
    }

    pub fn trim_range(&self, id: ItemId) -> Option<TrimRange> {
        self.inner
            .state
            .borrow()
            .registry
            .entry(id)
            .and_then(|e| e.trim().copied())
    }

    pub fn trims(&self) -> BTreeMap<ItemId, TrimRange> {
        self.inner.state.borrow().registry.trims()
    }

    pub fn probe_state(&self, id: ItemId) -> Option<ProbeState> {
        self.inner.state.borrow().registry.entry(id).map(|e| e.state())
    }

    pub fn item_status(&self, id: ItemId) -> Option<ItemStatus> {
        self.inner.state.borrow().registry.entry(id).map(ItemStatus::from_entry)
    }

    pub fn last_result(&self) -> Option<ProcessResult> {
        self.inner.state.borrow().last_result.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn process_indicator(&self) -> ProcessIndicator {
        let state = self.inner.state.borrow();
        let eligibility = self.inner.jobs.eligibility(&state.registry);
        ProcessIndicator::resolve(state.loading, &eligibility, state.last_result.as_ref())
    }

    /// Current grid positions of the registered items
    pub fn layout_snapshot(&self) -> Positions {
        self.inner.grid.borrow().snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }
}
