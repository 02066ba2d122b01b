//! The step index: record types, extraction, and lifecycle.
//!
//! One `.feature` document contributes zero or more [`StepRecord`]s (one per
//! step line, across the background, scenarios, and rules) and at most one
//! [`LanguageRecord`] carrying the language declared in the document header.
//! Extraction failures are per-file and recoverable: a document that cannot
//! be parsed simply contributes nothing.
//!
//! The index itself lives in [`StepIndex`] and is orchestrated by
//! [`IndexCoordinator`], which owns the full-rebuild and per-file refresh
//! paths.

use std::path::PathBuf;

mod coordinator;
mod extract;
mod index;

pub use coordinator::{BuildSources, IndexCoordinator, LogStatusSink, StatusSink};
pub use extract::{ExtractedDocument, extract_feature_file, extract_feature_source};
pub use index::{QueryOutcome, StepIndex};

/// Language code reported for a document before the index has been built.
pub const DEFAULT_LANGUAGE: &str = "en";

/// One indexed step declaration.
///
/// `name` is the lookup key and is not deduplicated: several documents may
/// declare the same step text, and queries return all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// The step text, used as the lookup key.
    pub name: String,
    /// Human-readable text; equals `name` for plain step declarations.
    pub description: String,
    /// Absolute path of the originating document.
    pub filename: PathBuf,
    /// 1-based source line of the step, as reported by the parser.
    pub line: u32,
    /// Last source line of the step; equals `line` for single-line steps.
    pub end_line: u32,
    /// Presentation tag; opaque to the index.
    pub kind: StepKind,
}

/// Classification tag attached to a step record for presentation.
///
/// The index never inspects this; it is mapped to an editor completion-item
/// kind at the LSP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepKind {
    /// A step declaration found in a feature document.
    #[default]
    Declaration,
}

/// The declared language of one parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRecord {
    /// The document's filename, used as the lookup key by convention.
    pub name: PathBuf,
    /// ISO-like short language code from the document header.
    pub language: String,
}

impl LanguageRecord {
    /// The default record returned for a file the index knows nothing about.
    #[must_use]
    pub fn fallback(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Errors that can occur while extracting records from a feature document.
///
/// All variants are per-file and recoverable: callers log them and move on
/// to the next document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Failed to read the source `.feature` file.
    #[error("failed to read feature file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the `.feature` file with the Gherkin parser.
    #[error("failed to parse feature file: {0}")]
    Parse(#[from] gherkin::ParseError),
    /// The document header declared a language the parser does not know.
    #[error("unsupported feature language '{code}'")]
    UnsupportedLanguage {
        /// The declared language code.
        code: String,
    },
}
