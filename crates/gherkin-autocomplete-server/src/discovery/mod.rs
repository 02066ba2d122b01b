//! Feature document discovery.
//!
//! Two enumeration paths feed a full index rebuild: a bounded recursive
//! scan of the primary workspace root, and a glob expansion per configured
//! feature-library root. Each library root is processed independently; a
//! failure skips that root only.

mod library;
mod workspace;

pub use library::{LibraryRootError, expand_library_root};
pub use workspace::find_feature_files;
