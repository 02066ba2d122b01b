//! Record extraction from Gherkin `.feature` documents.
//!
//! Extraction converts one document into its step and language records,
//! keeping the record shapes decoupled from the parser's tree. The parser
//! itself is the `gherkin` crate; its failures are typed and stay scoped to
//! the single document being processed.

use std::path::{Path, PathBuf};

use gherkin::GherkinEnv;
use tracing::warn;

use crate::query::{LookupOptions, StepQuery};

use super::{DEFAULT_LANGUAGE, ExtractError, LanguageRecord, StepKind, StepRecord};

/// The records contributed by one successfully parsed document.
///
/// A document with a language header but no scenario groups is valid: it
/// yields the language record and an empty step set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// One record per step line found in the document.
    pub steps: Vec<StepRecord>,
    /// The document's declared (or defaulted) language.
    pub language: LanguageRecord,
}

impl ExtractedDocument {
    /// Prefix lookup scoped to this document's steps only.
    ///
    /// Unlike the shared index, results keep declaration order rather
    /// than being sorted: the document being edited is small and its
    /// steps read best in source order. Used by completion so the
    /// current document contributes suggestions before the global build
    /// has caught up.
    #[must_use]
    pub fn lookup(&self, word: &str, options: LookupOptions) -> Vec<StepRecord> {
        let compiled = match StepQuery::prefix(word, options).compile() {
            Ok(compiled) => compiled,
            Err(err) => {
                warn!(error = %err, "failed to compile local step query");
                return Vec::new();
            }
        };
        self.steps
            .iter()
            .filter(|step| compiled.matches(&step.name))
            .cloned()
            .collect()
    }
}

/// Parse a `.feature` file from disk and extract its records.
///
/// # Errors
///
/// Returns an error when the file cannot be read, declares an unsupported
/// language, or cannot be parsed as valid Gherkin.
pub fn extract_feature_file(path: &Path) -> Result<ExtractedDocument, ExtractError> {
    let text = std::fs::read_to_string(path)?;
    extract_feature_source(path.to_path_buf(), &text)
}

/// Extract records from in-memory feature text.
///
/// The text is normalised to end with a newline, matching how the `gherkin`
/// parser processes its input.
///
/// # Errors
///
/// Returns an error when the text declares an unsupported language or
/// cannot be parsed as valid Gherkin.
pub fn extract_feature_source(
    path: PathBuf,
    source: &str,
) -> Result<ExtractedDocument, ExtractError> {
    let mut text = source.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    let code = declared_language(&text).unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let env = GherkinEnv::new(&code)
        .map_err(|_| ExtractError::UnsupportedLanguage { code: code.clone() })?;
    let feature = gherkin::Feature::parse(&text, env)?;

    let language = LanguageRecord {
        name: path.clone(),
        language: code,
    };

    let mut steps = Vec::new();
    if let Some(background) = feature.background.as_ref() {
        collect_steps(&path, &background.steps, &mut steps);
    }
    for scenario in &feature.scenarios {
        collect_steps(&path, &scenario.steps, &mut steps);
    }
    for rule in &feature.rules {
        if let Some(background) = rule.background.as_ref() {
            collect_steps(&path, &background.steps, &mut steps);
        }
        for scenario in &rule.scenarios {
            collect_steps(&path, &scenario.steps, &mut steps);
        }
    }

    Ok(ExtractedDocument { steps, language })
}

fn collect_steps(path: &Path, steps: &[gherkin::Step], records: &mut Vec<StepRecord>) {
    for step in steps {
        let line = u32::try_from(step.position.line).unwrap_or(0);
        records.push(StepRecord {
            name: step.value.clone(),
            description: step.value.clone(),
            filename: path.to_path_buf(),
            line,
            end_line: line,
            kind: StepKind::Declaration,
        });
    }
}

/// Read the `# language: xx` directive from the document header, if any.
///
/// Only comment lines before the first content line are considered.
fn declared_language(source: &str) -> Option<String> {
    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(comment) = trimmed.strip_prefix('#') else {
            break;
        };
        if let Some(code) = comment.trim_start().strip_prefix("language:") {
            return Some(code.trim().to_string());
        }
    }
    None
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    clippy::indexing_slicing,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract(source: &str) -> ExtractedDocument {
        extract_feature_source(PathBuf::from("/tmp/test.feature"), source)
            .expect("extraction should succeed")
    }

    #[test]
    fn extracts_one_record_per_step_with_matching_lines() {
        let source = concat!(
            "Feature: accounts\n",
            "  Scenario: login\n",
            "    Given a registered user\n",
            "    When the user logs in\n",
            "    Then the dashboard is shown\n",
        );

        let document = extract(source);

        assert_eq!(document.steps.len(), 3);
        assert_eq!(document.steps[0].name, "a registered user");
        assert_eq!(document.steps[0].description, "a registered user");
        assert_eq!(document.steps[0].line, 3);
        assert_eq!(document.steps[0].end_line, document.steps[0].line);
        assert_eq!(document.steps[1].line, 4);
        assert_eq!(document.steps[2].line, 5);
        assert_eq!(document.language.language, "en");
    }

    #[test]
    fn collects_background_and_rule_steps() {
        let source = concat!(
            "Feature: accounts\n",
            "  Background:\n",
            "    Given a clean database\n",
            "  Rule: limits\n",
            "    Scenario: cap\n",
            "      Given a full quota\n",
            "  Scenario: login\n",
            "    Given a registered user\n",
        );

        let document = extract(source);

        let names: Vec<_> = document.steps.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"a clean database"));
        assert!(names.contains(&"a full quota"));
        assert!(names.contains(&"a registered user"));
    }

    #[test]
    fn reads_declared_language_from_header() {
        let source = concat!(
            "# language: fr\n",
            "Fonctionnalité: comptes\n",
            "  Scénario: connexion\n",
            "    Soit un utilisateur inscrit\n",
        );

        let document = extract(source);

        assert_eq!(document.language.language, "fr");
        assert_eq!(document.steps.len(), 1);
        assert_eq!(document.steps[0].name, "un utilisateur inscrit");
    }

    #[test]
    fn document_without_scenarios_still_emits_language_record() {
        let document = extract("Feature: empty\n");

        assert!(document.steps.is_empty());
        assert_eq!(document.language.language, "en");
        assert_eq!(
            document.language.name,
            PathBuf::from("/tmp/test.feature")
        );
    }

    #[test]
    fn unsupported_language_is_a_typed_failure() {
        let source = "# language: zz-unknown\nFeature: x\n";
        let result = extract_feature_source(PathBuf::from("/tmp/bad.feature"), source);

        assert!(matches!(
            result,
            Err(ExtractError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn malformed_document_is_a_parse_failure() {
        let result =
            extract_feature_source(PathBuf::from("/tmp/bad.feature"), "not a feature at all");

        assert!(matches!(result, Err(ExtractError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let result = extract_feature_file(Path::new("/nonexistent/missing.feature"));

        assert!(matches!(result, Err(ExtractError::Read(_))));
    }

    #[test]
    fn local_lookup_filters_by_prefix_in_declaration_order() {
        let source = concat!(
            "Feature: accounts\n",
            "  Scenario: login\n",
            "    Given a zebra appears\n",
            "    Given a user exists\n",
            "    Given the user logs in\n",
            "    Given A user logs out\n",
        );

        let document = extract(source);
        let names: Vec<_> = document
            .lookup("a user", LookupOptions::default())
            .into_iter()
            .map(|record| record.name)
            .collect();

        // Case-insensitive, unsorted: declaration order is preserved.
        assert_eq!(names, vec!["a user exists", "A user logs out"]);
    }

    #[test]
    fn local_lookup_with_unbalanced_pattern_degrades_to_empty() {
        let document = extract("Feature: f\n  Scenario: s\n    Given a user exists\n");

        assert!(document.lookup("a(", LookupOptions::default()).is_empty());
    }

    #[rstest]
    #[case("# language: fr\nFeature: x\n", Some("fr"))]
    #[case("#language:de\nFeature: x\n", Some("de"))]
    #[case("# a comment\n# language: pt\nFeature: x\n", Some("pt"))]
    #[case("Feature: x\n# language: fr\n", None)]
    #[case("Feature: x\n", None)]
    fn declared_language_scans_header_comments_only(
        #[case] source: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(declared_language(source).as_deref(), expected);
    }
}
