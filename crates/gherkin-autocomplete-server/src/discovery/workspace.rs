//! Bounded recursive scan of the workspace root.

use std::path::{Path, PathBuf};

/// Find `.feature` files under a root directory, up to `limit` files.
///
/// The extension check is case-insensitive. Unreadable directories are
/// silently skipped; discovery is best-effort and a partial scan simply
/// contributes fewer documents.
#[must_use]
pub fn find_feature_files(root: &Path, limit: usize) -> Vec<PathBuf> {
    let mut features = Vec::new();
    collect_feature_files_recursive(root, limit, &mut features);
    features
}

fn collect_feature_files_recursive(dir: &Path, limit: usize, features: &mut Vec<PathBuf>) {
    if features.len() >= limit {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        if features.len() >= limit {
            return;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_feature_files_recursive(&path, limit, features);
        } else if is_feature_path(&path) {
            features.push(path);
        }
    }
}

fn is_feature_path(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("feature"))
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn write_feature(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create feature dir");
        }
        fs::write(&path, "Feature: test\n").expect("failed to write feature file");
    }

    #[rstest]
    #[case("top.feature")]
    #[case("nested/deeper/child.feature")]
    #[case("UPPER.FEATURE")]
    fn finds_feature_files_at_any_depth(#[case] relative: &str) {
        let dir = TempDir::new().expect("failed to create temp dir");
        write_feature(dir.path(), relative);

        let features = find_feature_files(dir.path(), 100);

        assert_eq!(features.len(), 1);
    }

    #[test]
    fn ignores_non_feature_files() {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(dir.path().join("notes.txt"), "x").expect("failed to write file");

        assert!(find_feature_files(dir.path(), 100).is_empty());
    }

    #[test]
    fn respects_the_file_cap() {
        let dir = TempDir::new().expect("failed to create temp dir");
        for i in 0..5 {
            write_feature(dir.path(), &format!("f{i}.feature"));
        }

        let features = find_feature_files(dir.path(), 3);

        assert_eq!(features.len(), 3);
    }

    #[test]
    fn missing_root_yields_empty_scan() {
        let dir = TempDir::new().expect("failed to create temp dir");
        let missing = dir.path().join("absent");

        assert!(find_feature_files(&missing, 100).is_empty());
    }
}
