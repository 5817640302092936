//! File picker capability

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the native dialog returned
#[derive(Debug, Clone, PartialEq)]
pub enum FileSelection {
    Cancelled,
    Single(PathBuf),
    /// Never valid for this workflow; rejected by the session
    Multiple(Vec<PathBuf>),
}

impl FileSelection {
    /// Classify a raw list of paths from a dialog
    pub fn from_paths(mut paths: Vec<PathBuf>) -> Self {
        match paths.len() {
            0 => FileSelection::Cancelled,
            1 => FileSelection::Single(paths.remove(0)),
            _ => FileSelection::Multiple(paths),
        }
    }
}

/// Named extension filter shown by the dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[String]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.to_vec(),
        }
    }
}

/// Native open-file / choose-directory dialogs
#[async_trait(?Send)]
pub trait FilePicker {
    async fn choose_file(&self, filters: &[FileFilter]) -> FileSelection;

    async fn choose_directory(&self) -> FileSelection;
}
