//! Typed query builder for step lookups.
//!
//! Queries over the step index come in two shapes: an anchored prefix/suffix
//! match, and a multi-token "all substrings present" match. Both are
//! case-insensitive and are compiled into `regex` matchers before being run
//! against record names. Building queries as explicit variants (rather than
//! concatenating pattern strings) keeps anchoring decisions in one place.
//!
//! Regex metacharacters in the query word are deliberately not escaped: the
//! raw word is handed to the regex engine, and a word that fails to compile
//! degrades to an empty result at the call site.

use regex::{Regex, RegexBuilder};

/// Anchoring options for a prefix lookup.
///
/// The defaults describe a "starts-with, open-ended" match: anchored at the
/// start of the name, unanchored at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// Anchor the match to the start of the record name.
    pub match_from_start: bool,
    /// Allow the match to end anywhere; when false, the word must reach the
    /// end of the record name.
    pub match_to_end: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            match_from_start: true,
            match_to_end: true,
        }
    }
}

/// A step lookup expressed as a typed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepQuery {
    /// Match the word at the start (and optionally up to the end) of a name.
    Prefix {
        /// The word to match.
        word: String,
        /// Anchoring options.
        options: LookupOptions,
    },
    /// Match names containing every whitespace-separated token of the
    /// phrase, in any order.
    ContainsAll {
        /// The raw phrase; tokens are split on whitespace.
        phrase: String,
    },
}

impl StepQuery {
    /// Build a prefix query for a word with the given anchoring options.
    #[must_use]
    pub fn prefix(word: impl Into<String>, options: LookupOptions) -> Self {
        Self::Prefix {
            word: word.into(),
            options,
        }
    }

    /// Build an AND-of-substrings query for a whitespace-separated phrase.
    #[must_use]
    pub fn contains_all(phrase: impl Into<String>) -> Self {
        Self::ContainsAll {
            phrase: phrase.into(),
        }
    }

    /// Compile the query into case-insensitive matchers.
    ///
    /// # Errors
    ///
    /// Returns the underlying `regex` error when the query word contains a
    /// pattern the engine rejects. The word is used verbatim; callers decide
    /// how a failed compilation degrades.
    pub fn compile(&self) -> Result<CompiledQuery, regex::Error> {
        match self {
            Self::Prefix { word, options } => {
                let anchor = if options.match_from_start { "^" } else { "" };
                let tail = if options.match_to_end { "" } else { "$" };
                let matcher = case_insensitive(&format!("{anchor}{word}{tail}"))?;
                Ok(CompiledQuery {
                    matchers: vec![matcher],
                })
            }
            Self::ContainsAll { phrase } => {
                let matchers = phrase
                    .split_whitespace()
                    .map(case_insensitive)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledQuery { matchers })
            }
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A compiled query: a conjunction of matchers that must all hit.
///
/// A prefix query compiles to a single matcher; an AND-of-substrings query
/// compiles to one matcher per token. An empty conjunction (blank phrase)
/// matches every name.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    matchers: Vec<Regex>,
}

impl CompiledQuery {
    /// Whether every matcher in the conjunction matches the name.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.matchers.iter().all(|matcher| matcher.is_match(name))
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile(query: &StepQuery) -> CompiledQuery {
        query.compile().expect("query should compile")
    }

    #[rstest]
    #[case("Given a user", true)]
    #[case("given a user", true)]
    #[case("I am given something", false)]
    fn prefix_anchors_at_start_case_insensitively(#[case] name: &str, #[case] hit: bool) {
        let query = StepQuery::prefix("Given", LookupOptions::default());
        assert_eq!(compile(&query).matches(name), hit);
    }

    #[test]
    fn prefix_without_start_anchor_matches_anywhere() {
        let options = LookupOptions {
            match_from_start: false,
            match_to_end: true,
        };
        let query = StepQuery::prefix("given", options);
        assert!(compile(&query).matches("I am given something"));
    }

    #[test]
    fn prefix_with_end_anchor_requires_suffix_match() {
        let options = LookupOptions {
            match_from_start: false,
            match_to_end: false,
        };
        let query = StepQuery::prefix("logout", options);
        let compiled = compile(&query);
        assert!(compiled.matches("user can logout"));
        assert!(!compiled.matches("logout is disabled"));
    }

    #[test]
    fn contains_all_requires_every_token() {
        let query = StepQuery::contains_all("user login");
        let compiled = compile(&query);
        assert!(compiled.matches("a registered user can login"));
        assert!(!compiled.matches("user can logout"));
    }

    #[test]
    fn contains_all_ignores_token_order() {
        let query = StepQuery::contains_all("login user");
        assert!(compile(&query).matches("a registered user can login"));
    }

    #[test]
    fn blank_phrase_matches_everything() {
        let query = StepQuery::contains_all("   ");
        assert!(compile(&query).matches("anything at all"));
    }

    #[test]
    fn metacharacters_are_passed_through_unescaped() {
        // "a." matches "ab" because the dot stays a wildcard.
        let options = LookupOptions {
            match_from_start: true,
            match_to_end: true,
        };
        let query = StepQuery::prefix("a.", options);
        assert!(compile(&query).matches("ab then more"));
    }

    #[test]
    fn unbalanced_pattern_fails_to_compile() {
        let query = StepQuery::prefix("a(", LookupOptions::default());
        assert!(query.compile().is_err());
    }
}
