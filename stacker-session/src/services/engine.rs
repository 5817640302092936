//! Media engine capability
//!
//! The native probing/processing engine is opaque to the session. Hosts
//! implement this trait over whatever transport they use (command
//! invocation, subprocess, in-process library).

use crate::models::{Job, Metadata};
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Request/response interface to the media engine
///
/// Futures are not required to be `Send`: the session runs on a single
/// cooperative thread.
#[async_trait(?Send)]
pub trait MediaEngine {
    /// Extract metadata from a source file
    ///
    /// # Returns
    /// * `Ok(Metadata)` - Probe succeeded
    /// * `Err(_)` - Probe failed; the error text becomes the item's FAILED message
    async fn probe(&self, path: &Path) -> Result<Metadata>;

    /// Run the stacking job
    ///
    /// # Returns
    /// * `Ok(message)` - Processing succeeded; message shown to the user
    /// * `Err(_)` - Processing failed; the error text is shown verbatim
    async fn process(&self, job: &Job) -> Result<String>;
}
