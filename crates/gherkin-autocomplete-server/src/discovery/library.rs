//! Glob expansion of configured feature-library roots.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while expanding one library root.
///
/// Recoverable at the build level: the failing root is skipped and other
/// roots are still processed.
#[derive(Debug, Error)]
pub enum LibraryRootError {
    /// The root produced an invalid glob pattern.
    #[error("invalid feature glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    /// A matched entry could not be read during expansion.
    #[error("failed to read feature library entry: {0}")]
    Read(#[from] glob::GlobError),
}

/// Expand one library root into the feature files beneath it.
///
/// The root is expanded as `<root>/**/*.feature`. A root that does not
/// exist simply matches nothing.
///
/// # Errors
///
/// Returns an error when the pattern is invalid or a matched entry cannot
/// be read; callers skip the root and continue with the remaining roots.
pub fn expand_library_root(root: &Path) -> Result<Vec<PathBuf>, LibraryRootError> {
    let pattern = format!("{}/**/*.feature", root.display());
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn expands_nested_feature_files() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let nested = dir.path().join("suite").join("auth");
        fs::create_dir_all(&nested).expect("failed to create dirs");
        fs::write(nested.join("login.feature"), "Feature: login\n")
            .expect("failed to write feature");
        fs::write(dir.path().join("readme.md"), "x").expect("failed to write file");

        let files = expand_library_root(dir.path()).expect("expansion should succeed");

        assert_eq!(files.len(), 1);
        assert!(
            files
                .first()
                .expect("one file")
                .ends_with("suite/auth/login.feature")
        );
    }

    #[test]
    fn missing_root_matches_nothing() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let missing = dir.path().join("absent");

        let files = expand_library_root(&missing).expect("expansion should succeed");

        assert!(files.is_empty());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = expand_library_root(Path::new("/tmp/broken["));

        assert!(matches!(result, Err(LibraryRootError::Pattern(_))));
    }
}
