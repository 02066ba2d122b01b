//! Handler for the `gherkin/languageInfo` extension request.

use async_lsp::ResponseError;
use tracing::debug;

use crate::error::ServerError;
use crate::protocol::{LanguageInfoParams, LanguageInfoResult};
use crate::server::ServerState;

use super::lifecycle::{response_error, url_to_path};

/// Handle `gherkin/languageInfo` requests.
///
/// Reports the dialect the index recorded for a document. Documents the
/// index has never seen report the default dialect; a not-yet-built index
/// does the same and triggers the build.
///
/// # Errors
///
/// Returns a `ResponseError` when the server has not been initialised or
/// the URI is not a file path.
pub fn handle_language_info(
    state: &mut ServerState,
    params: LanguageInfoParams,
) -> Result<LanguageInfoResult, ResponseError> {
    let Some(index) = state.index() else {
        return Err(response_error(
            &ServerError::NotInitialised,
            async_lsp::ErrorCode::SERVER_NOT_INITIALIZED,
        ));
    };

    let uri = params.text_document.uri;
    let Some(path) = url_to_path(&uri) else {
        return Err(ResponseError::new(
            async_lsp::ErrorCode::INVALID_PARAMS,
            format!("not a file URI: {uri}"),
        ));
    };

    let record = index.language_of(&path);
    debug!(path = %path.display(), language = %record.language, "resolved document language");
    Ok(LanguageInfoResult {
        language: record.language,
        name: record.name.display().to_string(),
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use lsp_types::{TextDocumentIdentifier, Url};
    use rstest::{fixture, rstest};

    #[fixture]
    fn create_test_state() -> ServerState {
        ServerState::new(ServerConfig::default())
    }

    fn params_for(uri: &str) -> LanguageInfoParams {
        LanguageInfoParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).expect("valid URI"),
            },
        }
    }

    #[rstest]
    fn rejects_requests_before_initialisation(mut create_test_state: ServerState) {
        let result = handle_language_info(
            &mut create_test_state,
            params_for("file:///tmp/login.feature"),
        );

        assert!(result.is_err());
    }

    #[rstest]
    fn rejects_non_file_uris(mut create_test_state: ServerState) {
        use crate::indexing::{BuildSources, IndexCoordinator, LogStatusSink};
        use std::sync::Arc;

        create_test_state.set_index(IndexCoordinator::new(
            BuildSources::default(),
            Arc::new(LogStatusSink),
        ));

        let result = handle_language_info(
            &mut create_test_state,
            params_for("https://example.com/login.feature"),
        );

        assert!(result.is_err());
    }
}
