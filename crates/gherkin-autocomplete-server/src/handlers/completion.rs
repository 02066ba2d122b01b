//! Completion handler for step suggestions.
//!
//! The handler re-reads the document from disk, resolves the
//! possibly-dotted identifier around the cursor, and queries the step
//! index: an anchored prefix lookup first, then a multi-token fuzzy
//! lookup when the prefix yields nothing.

use async_lsp::ResponseError;
use lsp_types::{
    CompletionItem, CompletionItemKind, CompletionParams, CompletionResponse, Position,
};
use tracing::debug;

use crate::indexing::{StepKind, StepRecord, extract_feature_source};
use crate::query::LookupOptions;
use crate::resolve::{fully_qualified, word_range_at};
use crate::server::ServerState;
use crate::util::{line_at, utf16_col_to_char_index};

use super::lifecycle::url_to_path;

/// Handle `textDocument/completion` requests.
///
/// Suggestions come from the shared step index; when the index has not
/// been built yet the first request comes back empty and triggers the
/// build. A cursor on no word yields every indexed step, which is the
/// useful behaviour immediately after a step keyword.
///
/// # Errors
///
/// Currently always returns `Ok`; unreadable documents and non-file URIs
/// degrade to no suggestions.
pub fn handle_completion(
    state: &mut ServerState,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>, ResponseError> {
    let Some(index) = state.index() else {
        debug!("completion requested before initialisation");
        return Ok(None);
    };

    let uri = params.text_document_position.text_document.uri;
    let Some(path) = url_to_path(&uri) else {
        debug!(%uri, "ignoring completion for non-file URI");
        return Ok(None);
    };
    let Ok(source) = std::fs::read_to_string(&path) else {
        debug!(path = %path.display(), "cannot read document for completion");
        return Ok(None);
    };

    let word = word_at_position(&source, params.text_document_position.position);

    let mut records = index.lookup(&word, LookupOptions::default());
    merge_local_records(&mut records, &path, &source, &word);
    if records.is_empty() && !word.is_empty() {
        records = index.fuzzy_lookup(&word);
    }

    if records.is_empty() {
        return Ok(None);
    }
    let items = records.iter().map(completion_item).collect();
    Ok(Some(CompletionResponse::Array(items)))
}

/// Resolve the qualified identifier at an LSP position, or an empty
/// string when the cursor touches no word.
fn word_at_position(source: &str, position: Position) -> String {
    let line_index = usize::try_from(position.line).unwrap_or(usize::MAX);
    let Some(line) = line_at(source, line_index) else {
        return String::new();
    };
    let character = utf16_col_to_char_index(line, position.character);
    word_range_at(line, character).map_or_else(String::new, |range| fully_qualified(line, range))
}

/// Merge suggestions extracted from the current document's source.
///
/// The shared index lags behind the buffer being edited (and may not be
/// built at all yet), so the document's own steps are queried directly
/// and appended where the index did not already supply them. A document
/// that fails to parse contributes nothing.
fn merge_local_records(
    records: &mut Vec<StepRecord>,
    path: &std::path::Path,
    source: &str,
    word: &str,
) {
    let Ok(document) = extract_feature_source(path.to_path_buf(), source) else {
        debug!(path = %path.display(), "current document unparsable; no local suggestions");
        return;
    };
    for record in document.lookup(word, LookupOptions::default()) {
        if !records.contains(&record) {
            records.push(record);
        }
    }
}

fn completion_item(record: &StepRecord) -> CompletionItem {
    let kind = match record.kind {
        StepKind::Declaration => CompletionItemKind::MODULE,
    };
    CompletionItem {
        label: record.name.clone(),
        kind: Some(kind),
        detail: Some(format!("{}:{}", record.filename.display(), record.line)),
        ..CompletionItem::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given a user exists\n", 0, 10, "user")]
    #[case("When system.login succeeds\n", 0, 9, "system.login")]
    #[case("Given \n", 0, 6, "")]
    #[case("only one line\n", 5, 0, "")]
    fn word_at_position_resolves_qualified_names(
        #[case] source: &str,
        #[case] line: u32,
        #[case] character: u32,
        #[case] expected: &str,
    ) {
        let word = word_at_position(source, Position { line, character });
        assert_eq!(word, expected);
    }

    #[test]
    fn completion_item_carries_location_detail() {
        let record = StepRecord {
            name: "a user exists".to_string(),
            description: "a user exists".to_string(),
            filename: "/tmp/login.feature".into(),
            line: 4,
            end_line: 4,
            kind: StepKind::Declaration,
        };

        let item = completion_item(&record);

        assert_eq!(item.label, "a user exists");
        assert_eq!(item.kind, Some(CompletionItemKind::MODULE));
        assert_eq!(item.detail.as_deref(), Some("/tmp/login.feature:4"));
    }
}
