//! Behavioural tests for single-document index updates.
//!
//! A save notification replaces exactly one document's records; every
//! other document keeps its records untouched.

use gherkin_autocomplete_server::query::LookupOptions;
use gherkin_autocomplete_server::test_support::{
    FeatureWorkspaceBuilder, feature_source, write_feature_file,
};

#[tokio::test]
async fn changed_file_records_are_replaced() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("changing.feature", &["an old step", "another old step"])
        .with_feature("stable.feature", &["a stable step"])
        .build();
    workspace.coordinator.rebuild().await;
    assert_eq!(workspace.coordinator.step_count(), 3);

    let changed = write_feature_file(
        workspace.dir.path(),
        "changing.feature",
        &feature_source("changing", &["a brand new step"]),
    );
    workspace.coordinator.notify_file_changed(&changed);

    assert_eq!(workspace.coordinator.step_count(), 2);
    let names: Vec<String> = workspace
        .coordinator
        .lookup("a brand new step", LookupOptions::default())
        .into_iter()
        .map(|record| record.name)
        .collect();
    assert_eq!(names, vec!["a brand new step".to_string()]);
}

#[tokio::test]
async fn untouched_files_keep_their_records() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("changing.feature", &["an old step"])
        .with_feature("stable.feature", &["a stable step"])
        .build();
    workspace.coordinator.rebuild().await;

    let changed = write_feature_file(
        workspace.dir.path(),
        "changing.feature",
        &feature_source("changing", &["a brand new step"]),
    );
    workspace.coordinator.notify_file_changed(&changed);

    let stable = workspace
        .coordinator
        .lookup("a stable step", LookupOptions::default());
    assert_eq!(stable.len(), 1);
}

#[tokio::test]
async fn deleted_file_loses_its_records() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("doomed.feature", &["a doomed step"])
        .with_feature("stable.feature", &["a stable step"])
        .build();
    workspace.coordinator.rebuild().await;
    assert_eq!(workspace.coordinator.step_count(), 2);

    let doomed = workspace.dir.path().join("doomed.feature");
    std::fs::remove_file(&doomed).ok();
    workspace.coordinator.notify_file_changed(&doomed);

    assert_eq!(workspace.coordinator.step_count(), 1);
}

#[tokio::test]
async fn unparsable_save_removes_stale_records() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("changing.feature", &["an old step"])
        .build();
    workspace.coordinator.rebuild().await;

    let changed = write_feature_file(workspace.dir.path(), "changing.feature", "not gherkin\n");
    workspace.coordinator.notify_file_changed(&changed);

    assert_eq!(workspace.coordinator.step_count(), 0);
}

#[test]
fn change_notifications_before_the_first_build_are_ignored() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("early.feature", &["a step"])
        .build();

    let path = workspace.dir.path().join("early.feature");
    workspace.coordinator.notify_file_changed(&path);

    // Nothing was indexed and the index is still unbuilt.
    assert_eq!(workspace.coordinator.step_count(), 0);
    assert!(workspace.status.messages().is_empty());
}
