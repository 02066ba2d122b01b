//! Behavioural tests for completion and language-info requests.
//!
//! These tests drive the LSP handlers end-to-end over real files in a
//! temporary workspace.

#![expect(
    clippy::expect_used,
    reason = "behavioural tests use explicit panics for clarity"
)]

use lsp_types::{
    CompletionParams, CompletionResponse, PartialResultParams, Position, TextDocumentIdentifier,
    TextDocumentPositionParams, Url, WorkDoneProgressParams,
};

use gherkin_autocomplete_server::config::ServerConfig;
use gherkin_autocomplete_server::handlers::{handle_completion, handle_language_info};
use gherkin_autocomplete_server::protocol::LanguageInfoParams;
use gherkin_autocomplete_server::server::ServerState;
use gherkin_autocomplete_server::test_support::{FeatureWorkspace, FeatureWorkspaceBuilder};

fn make_params(uri: Url, line: u32, character: u32) -> CompletionParams {
    CompletionParams {
        text_document_position: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri },
            position: Position::new(line, character),
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
        partial_result_params: PartialResultParams::default(),
        context: None,
    }
}

async fn built_state(workspace: &FeatureWorkspace) -> ServerState {
    workspace.coordinator.rebuild().await;
    let mut state = ServerState::new(ServerConfig::default());
    state.set_index(workspace.coordinator.clone());
    state
}

fn labels(response: Option<CompletionResponse>) -> Vec<String> {
    match response {
        Some(CompletionResponse::Array(items)) => {
            items.into_iter().map(|item| item.label).collect()
        }
        Some(CompletionResponse::List(list)) => {
            list.items.into_iter().map(|item| item.label).collect()
        }
        None => Vec::new(),
    }
}

#[tokio::test]
async fn completion_suggests_steps_matching_the_typed_prefix() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature(
            "login.feature",
            &["a registered user", "a registered admin", "the dashboard loads"],
        )
        .build();
    let mut state = built_state(&workspace).await;

    // Line 2 of the generated document reads "    Given a registered user".
    let path = workspace.dir.path().join("login.feature");
    let uri = Url::from_file_path(&path).expect("file URI");
    let result = handle_completion(&mut state, make_params(uri, 2, 11))
        .expect("completion should succeed");

    // The cursor sits on "a"; both "a ..." steps match, the third does not.
    let mut names = labels(result);
    names.sort();
    assert_eq!(
        names,
        vec![
            "a registered admin".to_string(),
            "a registered user".to_string(),
        ]
    );
}

#[tokio::test]
async fn completion_falls_back_to_fuzzy_matching() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature(
            "login.feature",
            &["a registered user", "the dashboard loads"],
        )
        .with_raw_feature(
            "draft.feature",
            "Feature: draft\n  Scenario: s\n    When searching by user\n",
        )
        .build();
    let mut state = built_state(&workspace).await;

    // "user" is not a prefix of any step name, so the fuzzy pass serves it.
    let path = workspace.dir.path().join("draft.feature");
    let uri = Url::from_file_path(&path).expect("file URI");
    let result = handle_completion(&mut state, make_params(uri, 2, 26))
        .expect("completion should succeed");

    let names = labels(result);
    assert!(names.contains(&"a registered user".to_string()));
    assert!(!names.contains(&"the dashboard loads".to_string()));
}

#[tokio::test]
async fn completion_serves_the_current_document_before_the_first_build() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature(
            "login.feature",
            &["a registered user", "the dashboard loads"],
        )
        .build();
    // No rebuild: the shared index has never been built.
    let mut state = ServerState::new(ServerConfig::default());
    state.set_index(workspace.coordinator.clone());

    let path = workspace.dir.path().join("login.feature");
    let uri = Url::from_file_path(&path).expect("file URI");
    let result = handle_completion(&mut state, make_params(uri, 2, 11))
        .expect("completion should succeed");

    // The document's own steps answer even though the index is pending.
    assert_eq!(labels(result), vec!["a registered user".to_string()]);
}

#[tokio::test]
async fn completion_deduplicates_local_and_indexed_records() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("login.feature", &["a registered user"])
        .build();
    let mut state = built_state(&workspace).await;

    let path = workspace.dir.path().join("login.feature");
    let uri = Url::from_file_path(&path).expect("file URI");
    let result = handle_completion(&mut state, make_params(uri, 2, 11))
        .expect("completion should succeed");

    // The record is both indexed and locally extracted; it appears once.
    assert_eq!(labels(result), vec!["a registered user".to_string()]);
}

#[tokio::test]
async fn completion_without_an_index_yields_nothing() {
    let mut state = ServerState::new(ServerConfig::default());

    let uri = Url::parse("file:///tmp/absent.feature").expect("valid URI");
    let result =
        handle_completion(&mut state, make_params(uri, 0, 0)).expect("completion should succeed");

    assert!(result.is_none());
}

#[tokio::test]
async fn language_info_reports_the_declared_dialect() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_raw_feature(
            "connexion.feature",
            "# language: fr\nFonctionnalité: connexion\n  Scénario: s\n    Soit un utilisateur\n",
        )
        .build();
    let mut state = built_state(&workspace).await;

    let path = workspace.dir.path().join("connexion.feature");
    let params = LanguageInfoParams {
        text_document: TextDocumentIdentifier {
            uri: Url::from_file_path(&path).expect("file URI"),
        },
    };
    let result = handle_language_info(&mut state, params).expect("request should succeed");

    assert_eq!(result.language, "fr");
    assert_eq!(result.name, path.display().to_string());
}

#[tokio::test]
async fn language_info_defaults_for_unknown_documents() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("known.feature", &["a step"])
        .build();
    let mut state = built_state(&workspace).await;

    let path = workspace.dir.path().join("never-indexed.feature");
    let params = LanguageInfoParams {
        text_document: TextDocumentIdentifier {
            uri: Url::from_file_path(&path).expect("file URI"),
        },
    };
    let result = handle_language_info(&mut state, params).expect("request should succeed");

    assert_eq!(result.language, "en");
}
