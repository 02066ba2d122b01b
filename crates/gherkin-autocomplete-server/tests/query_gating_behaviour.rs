//! Behavioural tests for queries racing the first cache build.
//!
//! A query against a never-built index returns a degraded default for
//! that call and triggers the build as a side effect; later queries see
//! real results.

use gherkin_autocomplete_server::indexing::DEFAULT_LANGUAGE;
use gherkin_autocomplete_server::query::LookupOptions;
use gherkin_autocomplete_server::test_support::FeatureWorkspaceBuilder;

#[tokio::test]
async fn first_lookup_on_unbuilt_index_is_empty() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("login.feature", &["a registered user"])
        .build();

    let records = workspace
        .coordinator
        .lookup("a registered user", LookupOptions::default());

    assert!(records.is_empty());
}

#[tokio::test]
async fn language_query_on_unbuilt_index_reports_default_dialect() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_raw_feature(
            "connexion.feature",
            "# language: fr\nFonctionnalité: connexion\n  Scénario: s\n    Soit un utilisateur\n",
        )
        .build();
    let path = workspace.dir.path().join("connexion.feature");

    let record = workspace.coordinator.language_of(&path);

    assert_eq!(record.language, DEFAULT_LANGUAGE);
    assert_eq!(record.name, path);
}

#[tokio::test]
async fn completed_build_serves_real_results() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_raw_feature(
            "connexion.feature",
            "# language: fr\nFonctionnalité: connexion\n  Scénario: s\n    Soit un utilisateur\n",
        )
        .with_feature("login.feature", &["a registered user"])
        .build();
    let path = workspace.dir.path().join("connexion.feature");

    workspace.coordinator.rebuild().await;

    let record = workspace.coordinator.language_of(&path);
    assert_eq!(record.language, "fr");

    let records = workspace
        .coordinator
        .lookup("a registered", LookupOptions::default());
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn fuzzy_lookup_requires_every_token() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature(
            "login.feature",
            &[
                "a registered user logs in",
                "a registered admin logs in",
                "a guest browses anonymously",
            ],
        )
        .build();
    workspace.coordinator.rebuild().await;

    let names: Vec<String> = workspace
        .coordinator
        .fuzzy_lookup("logs registered")
        .into_iter()
        .map(|record| record.name)
        .collect();

    assert_eq!(
        names,
        vec![
            "a registered admin logs in".to_string(),
            "a registered user logs in".to_string(),
        ]
    );
}

#[tokio::test]
async fn prefix_lookup_is_case_insensitive() {
    let workspace = FeatureWorkspaceBuilder::new()
        .with_feature("login.feature", &["A Registered User"])
        .build();
    workspace.coordinator.rebuild().await;

    let records = workspace
        .coordinator
        .lookup("a registered", LookupOptions::default());

    assert_eq!(records.len(), 1);
}
