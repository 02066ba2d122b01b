//! Shared test support utilities for gherkin-autocomplete-server tests.
//!
//! This module provides common infrastructure for both unit and integration
//! tests, including:
//! - Temporary workspace construction with feature files on disk
//! - A status sink that records delivered messages for assertion
//! - A builder producing an [`IndexCoordinator`] over the workspace

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tempfile::TempDir;

use crate::indexing::{BuildSources, IndexCoordinator, StatusSink};

/// Status sink that records every message for later assertion.
#[derive(Debug, Default)]
pub struct RecordingStatusSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingStatusSink {
    /// Create an empty recording sink behind an [`Arc`] for sharing with a
    /// coordinator.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages delivered so far, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StatusSink for RecordingStatusSink {
    fn status(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_owned());
    }
}

/// Write a feature file at `relative` under `dir`, creating parents.
///
/// # Panics
///
/// Panics if a directory or the file cannot be created.
#[expect(clippy::expect_used, reason = "test helper uses expect for clarity")]
pub fn write_feature_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create feature dir");
    }
    std::fs::write(&path, content).expect("write feature file");
    path
}

/// A feature document source rendered from step names.
///
/// Produces one `Scenario` with one `Given` line per step, which is the
/// minimal document shape the extractor accepts.
#[must_use]
pub fn feature_source(title: &str, steps: &[&str]) -> String {
    let body: String = steps
        .iter()
        .map(|step| format!("    Given {step}\n"))
        .collect();
    format!("Feature: {title}\n  Scenario: main\n{body}")
}

/// Built test workspace: a temp directory of feature files plus a
/// coordinator indexing it.
pub struct FeatureWorkspace {
    /// Temporary directory serving as the workspace root.
    pub dir: TempDir,
    /// Coordinator over the workspace (and any library roots).
    pub coordinator: IndexCoordinator,
    /// Sink recording status messages emitted by builds.
    pub status: Arc<RecordingStatusSink>,
}

/// Builder for a temporary feature workspace under test.
///
/// Files are written to disk up front; the returned coordinator has not
/// been built, so tests control exactly when the first build runs.
pub struct FeatureWorkspaceBuilder {
    dir: TempDir,
    library_roots: Vec<PathBuf>,
    max_workspace_files: usize,
}

impl FeatureWorkspaceBuilder {
    /// Create a builder with a fresh temporary workspace root.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[expect(clippy::expect_used, reason = "builder panics on temp dir failure")]
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
            library_roots: Vec::new(),
            max_workspace_files: 1000,
        }
    }

    /// Write a feature file with the given step names into the workspace.
    #[must_use]
    pub fn with_feature(self, relative: &str, steps: &[&str]) -> Self {
        write_feature_file(self.dir.path(), relative, &feature_source(relative, steps));
        self
    }

    /// Write a feature file with raw content into the workspace.
    #[must_use]
    pub fn with_raw_feature(self, relative: &str, content: &str) -> Self {
        write_feature_file(self.dir.path(), relative, content);
        self
    }

    /// Register an additional library root to scan.
    #[must_use]
    pub fn with_library_root(mut self, root: PathBuf) -> Self {
        self.library_roots.push(root);
        self
    }

    /// Cap the number of files collected from the workspace root.
    #[must_use]
    pub fn with_max_workspace_files(mut self, max: usize) -> Self {
        self.max_workspace_files = max;
        self
    }

    /// Build the workspace and its (not yet built) coordinator.
    #[must_use]
    pub fn build(self) -> FeatureWorkspace {
        let status = RecordingStatusSink::shared();
        let sources = BuildSources {
            workspace_root: Some(self.dir.path().to_path_buf()),
            library_roots: self.library_roots,
            max_workspace_files: self.max_workspace_files,
        };
        let coordinator = IndexCoordinator::new(sources, Arc::clone(&status) as Arc<dyn StatusSink>);
        FeatureWorkspace {
            dir: self.dir,
            coordinator,
            status,
        }
    }
}

impl Default for FeatureWorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
