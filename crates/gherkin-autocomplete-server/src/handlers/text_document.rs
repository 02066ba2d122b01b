//! Text document and step cache notification handlers.
//!
//! Saves of `.feature` files refresh that file's records in the step
//! index; other file types are ignored. The custom rebuild notification
//! discards the whole index and rebuilds it from every configured source.

use lsp_types::DidSaveTextDocumentParams;
use tracing::debug;

use crate::server::ServerState;

/// Handle `textDocument/didSave` notifications.
///
/// When the saved document is a `.feature` file, its records are removed
/// from the index and re-extracted from disk. Other documents are
/// ignored. Saves before the first build are dropped; the pending build
/// picks the file up.
pub fn handle_did_save_text_document(state: &mut ServerState, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri;
    let Ok(path) = uri.to_file_path() else {
        debug!(%uri, "ignoring didSave for non-file URI");
        return;
    };
    if !is_feature_file_path(&path) {
        return;
    }
    let Some(index) = state.index() else {
        debug!(path = %path.display(), "ignoring didSave before initialisation");
        return;
    };
    index.notify_file_changed(&path);
}

/// Handle `gherkin/rebuildStepCache` notifications.
///
/// Discards the current index contents and schedules a full rebuild over
/// the workspace and configured feature libraries.
pub fn handle_rebuild_step_cache(state: &mut ServerState, (): ()) {
    let Some(index) = state.index() else {
        debug!("ignoring rebuild request before initialisation");
        return;
    };
    debug!("rebuilding step cache on client request");
    index.trigger_full_rebuild();
}

fn is_feature_file_path(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("feature"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::Path;

    #[rstest]
    #[case("/tmp/login.feature", true)]
    #[case("/tmp/LOGIN.FEATURE", true)]
    #[case("/tmp/login.rs", false)]
    #[case("/tmp/feature", false)]
    fn feature_file_detection(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(is_feature_file_path(Path::new(path)), expected);
    }
}
