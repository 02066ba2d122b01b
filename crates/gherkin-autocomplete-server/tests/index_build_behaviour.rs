//! Behavioural tests for full step cache builds.
//!
//! These tests drive an [`IndexCoordinator`] over temporary workspaces and
//! feature libraries and verify what a completed build contains.

use std::path::PathBuf;

use gherkin_autocomplete_server::query::LookupOptions;
use gherkin_autocomplete_server::test_support::{
    FeatureWorkspaceBuilder, feature_source, write_feature_file,
};
use tempfile::TempDir;

#[tokio::test]
async fn full_build_indexes_every_workspace_feature_file() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("auth/login.feature", &["a registered user", "a password"])
        .with_feature("billing/invoice.feature", &["an unpaid invoice"])
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(workspace.coordinator.step_count(), 3);
    assert_eq!(workspace.coordinator.document_count(), 2);
}

#[tokio::test]
#[expect(
    clippy::expect_used,
    reason = "behavioural tests use explicit panics for clarity"
)]
async fn library_roots_contribute_records_alongside_the_workspace() {
    let library = TempDir::new().expect("temp dir");
    write_feature_file(
        library.path(),
        "shared/common.feature",
        &feature_source("common", &["a shared fixture"]),
    );

    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("local.feature", &["a local step"])
        .with_library_root(library.path().to_path_buf())
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(workspace.coordinator.step_count(), 2);
    assert_eq!(workspace.coordinator.document_count(), 2);
}

#[tokio::test]
async fn completed_build_reports_status_once() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("one.feature", &["a step"])
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(
        workspace.status.messages(),
        vec!["Feature step cache built".to_string()]
    );
}

#[tokio::test]
async fn broken_library_root_is_skipped_without_failing_the_build() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("kept.feature", &["a surviving step"])
        .with_library_root(PathBuf::from("/nonexistent/broken["))
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(workspace.coordinator.step_count(), 1);
    assert_eq!(
        workspace.status.messages(),
        vec!["Feature step cache built".to_string()]
    );
}

#[tokio::test]
async fn unparsable_documents_are_skipped() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("good.feature", &["a good step"])
        .with_raw_feature("broken.feature", "not gherkin at all\n")
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(workspace.coordinator.step_count(), 1);
    assert_eq!(workspace.coordinator.document_count(), 1);
}

#[tokio::test]
async fn workspace_scan_respects_the_file_cap() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("a.feature", &["step one"])
        .with_feature("b.feature", &["step two"])
        .with_feature("c.feature", &["step three"])
        .with_max_workspace_files(2)
        .build();

    workspace.coordinator.rebuild().await;

    assert_eq!(workspace.coordinator.document_count(), 2);
}

#[tokio::test]
async fn lookup_results_are_sorted_case_insensitively() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature(
            "sorted.feature",
            &["zebra crossing appears", "Apple stand appears", "mango tree appears"],
        )
        .build();

    workspace.coordinator.rebuild().await;

    let options = LookupOptions {
        match_from_start: false,
        match_to_end: true,
    };
    let names: Vec<String> = workspace
        .coordinator
        .lookup("appears", options)
        .into_iter()
        .map(|record| record.name)
        .collect();

    assert_eq!(
        names,
        vec![
            "Apple stand appears".to_string(),
            "mango tree appears".to_string(),
            "zebra crossing appears".to_string(),
        ]
    );
}
