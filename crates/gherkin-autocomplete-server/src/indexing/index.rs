//! The in-memory step index and its readiness lifecycle.
//!
//! [`StepIndex`] owns the step and language record stores plus a `ready`
//! flag. The flag is raised when a build is *triggered*, not when it
//! completes: a query racing an in-flight build legitimately observes
//! partial or empty results, and the next query sees more. Reads on an
//! index whose build has never been triggered return a first-class
//! [`QueryOutcome::Pending`] rather than an indistinguishable empty
//! sequence, so callers can kick off a build and degrade explicitly.

use std::path::Path;

use tracing::warn;

use crate::query::{LookupOptions, StepQuery};
use crate::store::{RecordStore, sort_by_field};

use super::{ExtractedDocument, LanguageRecord, StepRecord};

/// Result of a query against the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<T> {
    /// The index has never been built; the caller should trigger a build
    /// and fall back to a default value for this call.
    Pending,
    /// The index has been built (possibly still filling) and produced a
    /// result.
    Ready(T),
}

impl<T> QueryOutcome<T> {
    /// Whether the index had not been built when the query ran.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Unwrap the result, substituting `default` when pending.
    #[must_use]
    pub fn ready_or(self, default: T) -> T {
        match self {
            Self::Pending => default,
            Self::Ready(value) => value,
        }
    }

    /// Unwrap the result, computing the fallback when pending.
    ///
    /// The fallback runs only in the pending case, so it may carry side
    /// effects such as triggering a build.
    #[must_use]
    pub fn ready_or_else(self, fallback: impl FnOnce() -> T) -> T {
        match self {
            Self::Pending => fallback(),
            Self::Ready(value) => value,
        }
    }
}

/// The aggregate of all step and language records currently held.
///
/// Created empty at process start and populated by the first triggered
/// build; individual documents are removed and re-inserted on change
/// notifications. The index exclusively owns its records: all reads return
/// clones.
#[derive(Debug, Default)]
pub struct StepIndex {
    steps: RecordStore<StepRecord>,
    languages: RecordStore<LanguageRecord>,
    ready: bool,
}

impl StepIndex {
    /// Create an empty, not-yet-built index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a build has been triggered for this index.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Mark the index as built and swap in fresh empty collections.
    ///
    /// Called at the start of a full rebuild; records are appended as
    /// documents are processed.
    pub fn begin_rebuild(&mut self) {
        self.ready = true;
        self.steps = RecordStore::new();
        self.languages = RecordStore::new();
    }

    /// Insert the records extracted from one document.
    pub fn insert_document(&mut self, document: ExtractedDocument) {
        for step in document.steps {
            self.steps.insert(step);
        }
        self.languages.insert(document.language);
    }

    /// Remove every record contributed by the given document.
    ///
    /// Records belonging to other documents are untouched.
    pub fn remove_document(&mut self, path: &Path) {
        self.steps.remove_where(|record| record.filename == path);
        self.languages.remove_where(|record| record.name == path);
    }

    /// Prefix lookup over step names, sorted ascending by name.
    #[must_use]
    pub fn lookup(&self, word: &str, options: LookupOptions) -> QueryOutcome<Vec<StepRecord>> {
        if !self.ready {
            return QueryOutcome::Pending;
        }
        QueryOutcome::Ready(self.run(&StepQuery::prefix(word, options)))
    }

    /// Multi-token AND-of-substrings lookup, sorted ascending by name.
    #[must_use]
    pub fn fuzzy_lookup(&self, phrase: &str) -> QueryOutcome<Vec<StepRecord>> {
        if !self.ready {
            return QueryOutcome::Pending;
        }
        QueryOutcome::Ready(self.run(&StepQuery::contains_all(phrase)))
    }

    /// Language record for the given document.
    ///
    /// A built index that knows nothing about the file reports the default
    /// language rather than failing; availability beats precision here.
    #[must_use]
    pub fn language_of(&self, path: &Path) -> QueryOutcome<LanguageRecord> {
        if !self.ready {
            return QueryOutcome::Pending;
        }
        let record = self
            .languages
            .find_first(|record| record.name == path)
            .unwrap_or_else(|| LanguageRecord::fallback(path));
        QueryOutcome::Ready(record)
    }

    fn run(&self, query: &StepQuery) -> Vec<StepRecord> {
        let compiled = match query.compile() {
            Ok(compiled) => compiled,
            Err(err) => {
                warn!(error = %err, "failed to compile step query");
                return Vec::new();
            }
        };
        let matches = self.steps.find(|record| compiled.matches(&record.name));
        sort_by_field(matches, |record| &record.name)
    }

    /// Number of step records currently held.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of language records currently held.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.languages.len()
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    clippy::indexing_slicing,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use crate::indexing::extract_feature_source;
    use std::path::PathBuf;

    fn document(path: &str, steps: &[&str]) -> ExtractedDocument {
        let body: String = steps
            .iter()
            .map(|step| format!("    Given {step}\n"))
            .collect();
        let source = format!("Feature: f\n  Scenario: s\n{body}");
        extract_feature_source(PathBuf::from(path), &source).expect("fixture should extract")
    }

    fn built_index() -> StepIndex {
        let mut index = StepIndex::new();
        index.begin_rebuild();
        index
    }

    #[test]
    fn queries_on_unbuilt_index_are_pending() {
        let index = StepIndex::new();
        assert!(index.lookup("x", LookupOptions::default()).is_pending());
        assert!(index.fuzzy_lookup("x").is_pending());
        assert!(index.language_of(Path::new("/a.feature")).is_pending());
    }

    #[test]
    fn begin_rebuild_marks_ready_and_clears_records() {
        let mut index = built_index();
        index.insert_document(document("/a.feature", &["a user exists"]));
        index.begin_rebuild();

        assert!(index.is_ready());
        assert_eq!(index.step_count(), 0);
        assert_eq!(index.language_count(), 0);
    }

    #[test]
    fn lookup_returns_records_sorted_by_name() {
        let mut index = built_index();
        index.insert_document(document(
            "/a.feature",
            &["zebra crossing", "Apple stand", "mango tree"],
        ));

        let records = index
            .lookup(
                "",
                LookupOptions {
                    match_from_start: false,
                    match_to_end: true,
                },
            )
            .ready_or(Vec::new());

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Apple stand", "mango tree", "zebra crossing"]);
    }

    #[test]
    fn duplicate_names_across_files_are_all_returned() {
        let mut index = built_index();
        index.insert_document(document("/a.feature", &["a user exists"]));
        index.insert_document(document("/b.feature", &["a user exists"]));

        let records = index
            .lookup("a user", LookupOptions::default())
            .ready_or(Vec::new());
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn remove_document_leaves_other_files_untouched() {
        let mut index = built_index();
        index.insert_document(document("/a.feature", &["from a", "also from a"]));
        index.insert_document(document("/b.feature", &["from b"]));

        index.remove_document(Path::new("/a.feature"));

        assert_eq!(index.step_count(), 1);
        assert_eq!(index.language_count(), 1);
        let language = index
            .language_of(Path::new("/b.feature"))
            .ready_or(LanguageRecord::fallback("/b.feature"));
        assert_eq!(language.name, PathBuf::from("/b.feature"));
    }

    #[test]
    fn language_of_unknown_file_falls_back_to_default() {
        let index = built_index();
        let record = index
            .language_of(Path::new("/unknown.feature"))
            .ready_or(LanguageRecord::fallback("/other"));
        assert_eq!(record.language, "en");
        assert_eq!(record.name, PathBuf::from("/unknown.feature"));
    }

    #[test]
    fn invalid_query_degrades_to_empty_result() {
        let mut index = built_index();
        index.insert_document(document("/a.feature", &["a user exists"]));

        let records = index
            .lookup("a(", LookupOptions::default())
            .ready_or(vec![document("/x.feature", &["sentinel"]).steps[0].clone()]);
        assert!(records.is_empty());
    }
}
