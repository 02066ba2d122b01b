//! Build orchestration for the shared step index.
//!
//! [`IndexCoordinator`] is a cheaply cloneable handle around the shared
//! [`StepIndex`]. A full rebuild marks the index ready, swaps in fresh
//! collections, and spawns one task for the bounded workspace scan plus one
//! per configured library root; each task appends the records it extracts.
//! A supervisor awaits the whole task set and then emits a status message
//! through the configured [`StatusSink`].
//!
//! Queries that find the index unbuilt trigger a rebuild as a side effect
//! and return the degraded default for that call; the caller re-queries on
//! the next keystroke. There is no cancellation: a triggered build runs to
//! completion for every discovered file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::discovery::{expand_library_root, find_feature_files};
use crate::query::LookupOptions;

use super::{LanguageRecord, StepIndex, StepRecord, extract_feature_file};

/// Fire-and-forget sink for build status messages.
pub trait StatusSink: Send + Sync {
    /// Deliver one status line to the user.
    fn status(&self, message: &str);
}

/// Status sink that writes to the log instead of a client.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusSink;

impl StatusSink for LogStatusSink {
    fn status(&self, message: &str) {
        info!("{message}");
    }
}

/// The document roots a full rebuild scans.
#[derive(Debug, Clone, Default)]
pub struct BuildSources {
    /// Primary workspace root, scanned recursively up to the file cap.
    pub workspace_root: Option<PathBuf>,
    /// Additional library roots, each expanded via glob independently.
    pub library_roots: Vec<PathBuf>,
    /// Cap on the number of files collected from the workspace root.
    pub max_workspace_files: usize,
}

/// Cloneable handle owning the shared index and its build configuration.
#[derive(Clone)]
pub struct IndexCoordinator {
    index: Arc<Mutex<StepIndex>>,
    sources: Arc<BuildSources>,
    status: Arc<dyn StatusSink>,
}

impl std::fmt::Debug for IndexCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCoordinator")
            .field("sources", &self.sources)
            .finish_non_exhaustive()
    }
}

impl IndexCoordinator {
    /// Create a coordinator over a fresh, unbuilt index.
    #[must_use]
    pub fn new(sources: BuildSources, status: Arc<dyn StatusSink>) -> Self {
        Self {
            index: Arc::new(Mutex::new(StepIndex::new())),
            sources: Arc::new(sources),
            status,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StepIndex> {
        // A poisoned index only means a task panicked mid-append; the
        // records already inserted are still usable.
        self.index.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the index ready and rebuild it in the background.
    ///
    /// Requires a running tokio runtime; outside one the trigger is logged
    /// and dropped, leaving the index empty but ready.
    pub fn trigger_full_rebuild(&self) {
        self.lock().begin_rebuild();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let coordinator = self.clone();
                handle.spawn(async move {
                    coordinator.scan_sources().await;
                });
            }
            Err(_) => {
                warn!("no async runtime available; step cache rebuild not scheduled");
            }
        }
    }

    /// Rebuild the index and wait for every source to finish.
    ///
    /// Equivalent to [`Self::trigger_full_rebuild`] but awaitable; used
    /// where completion must be observed (tests, explicit rebuild
    /// requests).
    pub async fn rebuild(&self) {
        self.lock().begin_rebuild();
        self.scan_sources().await;
    }

    async fn scan_sources(&self) {
        let mut tasks = JoinSet::new();

        if let Some(root) = self.sources.workspace_root.clone() {
            let coordinator = self.clone();
            let limit = self.sources.max_workspace_files;
            tasks.spawn(async move {
                coordinator.scan_workspace(&root, limit);
            });
        }

        for root in self.sources.library_roots.clone() {
            let coordinator = self.clone();
            tasks.spawn(async move {
                coordinator.scan_library(&root);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "index build task failed");
            }
        }

        let index = self.lock();
        debug!(
            steps = index.step_count(),
            documents = index.language_count(),
            "step cache rebuild complete"
        );
        drop(index);
        self.status.status("Feature step cache built");
    }

    fn scan_workspace(&self, root: &Path, limit: usize) {
        let files = find_feature_files(root, limit);
        debug!(
            root = %root.display(),
            count = files.len(),
            "indexing workspace feature files"
        );
        self.index_files(&files);
    }

    fn scan_library(&self, root: &Path) {
        match expand_library_root(root) {
            Ok(files) => {
                debug!(
                    root = %root.display(),
                    count = files.len(),
                    "indexing feature library"
                );
                self.index_files(&files);
            }
            Err(err) => {
                warn!(root = %root.display(), error = %err, "skipping feature library root");
            }
        }
    }

    fn index_files(&self, files: &[PathBuf]) {
        for file in files {
            match extract_feature_file(file) {
                Ok(document) => {
                    self.lock().insert_document(document);
                }
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "failed to index feature file");
                }
            }
        }
    }

    /// Remove and re-extract the records of a single changed document.
    ///
    /// Records belonging to other files are untouched. Ignored when the
    /// index has never been built; the pending first build will pick the
    /// file up.
    pub fn notify_file_changed(&self, path: &Path) {
        {
            let mut index = self.lock();
            if !index.is_ready() {
                debug!(path = %path.display(), "ignoring change before first build");
                return;
            }
            index.remove_document(path);
        }
        match extract_feature_file(path) {
            Ok(document) => {
                let mut index = self.lock();
                index.insert_document(document);
                debug!(path = %path.display(), steps = index.step_count(), "re-indexed feature file");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to re-index feature file");
            }
        }
    }

    /// Case-insensitive prefix lookup, sorted ascending by step name.
    ///
    /// An unbuilt index triggers a rebuild and yields an empty result for
    /// this call.
    #[must_use]
    pub fn lookup(&self, word: &str, options: LookupOptions) -> Vec<StepRecord> {
        let outcome = self.lock().lookup(word, options);
        outcome.ready_or_else(|| {
            self.trigger_full_rebuild();
            Vec::new()
        })
    }

    /// Multi-token fuzzy lookup, sorted ascending by step name.
    ///
    /// An unbuilt index triggers a rebuild and yields an empty result for
    /// this call.
    #[must_use]
    pub fn fuzzy_lookup(&self, phrase: &str) -> Vec<StepRecord> {
        let outcome = self.lock().fuzzy_lookup(phrase);
        outcome.ready_or_else(|| {
            self.trigger_full_rebuild();
            Vec::new()
        })
    }

    /// Language record for a document.
    ///
    /// An unbuilt index triggers a rebuild and yields the default record
    /// for this call.
    #[must_use]
    pub fn language_of(&self, path: &Path) -> LanguageRecord {
        let outcome = self.lock().language_of(path);
        outcome.ready_or_else(|| {
            self.trigger_full_rebuild();
            LanguageRecord::fallback(path)
        })
    }

    /// Number of step records currently indexed.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.lock().step_count()
    }

    /// Number of documents currently indexed.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.lock().language_count()
    }
}
