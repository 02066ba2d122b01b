//! Custom protocol extensions beyond the standard LSP surface.
//!
//! Two extension methods are exposed: a notification that forces a full
//! step cache rebuild, and a request reporting the Gherkin dialect the
//! index recorded for a document.

use lsp_types::TextDocumentIdentifier;
use serde::{Deserialize, Serialize};

/// `gherkin/rebuildStepCache` notification.
///
/// Sent by the client to discard and rebuild the step index, for example
/// after bulk file operations outside the editor.
#[derive(Debug)]
pub enum RebuildStepCache {}

impl lsp_types::notification::Notification for RebuildStepCache {
    type Params = ();

    const METHOD: &'static str = "gherkin/rebuildStepCache";
}

/// Parameters for the [`LanguageInfo`] request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfoParams {
    /// The document whose dialect is being queried.
    pub text_document: TextDocumentIdentifier,
}

/// Result of the [`LanguageInfo`] request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfoResult {
    /// ISO 639-1 code of the document's Gherkin dialect.
    pub language: String,
    /// Path of the document the record describes.
    pub name: String,
}

/// `gherkin/languageInfo` request.
///
/// Reports the Gherkin dialect recorded for a document during indexing.
/// Unknown documents report the default dialect.
#[derive(Debug)]
pub enum LanguageInfo {}

impl lsp_types::request::Request for LanguageInfo {
    type Params = LanguageInfoParams;
    type Result = LanguageInfoResult;

    const METHOD: &'static str = "gherkin/languageInfo";
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use lsp_types::Url;

    #[test]
    fn language_info_params_use_camel_case() {
        let params = LanguageInfoParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse("file:///tmp/login.feature").expect("valid URI"),
            },
        };

        let json = serde_json::to_value(&params).expect("params should serialise");

        assert!(json.get("textDocument").is_some());
    }

    #[test]
    fn language_info_result_round_trips() {
        let result = LanguageInfoResult {
            language: "fr".to_string(),
            name: "/tmp/connexion.feature".to_string(),
        };

        let json = serde_json::to_value(&result).expect("result should serialise");
        let back: LanguageInfoResult =
            serde_json::from_value(json).expect("result should deserialise");

        assert_eq!(back, result);
    }
}
