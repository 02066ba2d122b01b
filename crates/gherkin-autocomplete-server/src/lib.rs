//! Language Server Protocol implementation for Gherkin step autocomplete.
//!
//! This crate provides an LSP server that maintains a searchable in-memory
//! index of step declarations extracted from Gherkin `.feature` files, and
//! serves completion lookups against it.
//!
//! # Overview
//!
//! The server communicates via JSON-RPC over stdin/stdout and supports:
//!
//! - Workspace and feature-library discovery of `.feature` documents
//! - An incrementally refreshed step index (full rebuild plus per-file
//!   updates on save)
//! - Case-insensitive prefix, suffix, and multi-token fuzzy lookups
//! - Resolution of dotted qualified names around the cursor
//!
//! # Configuration
//!
//! The server can be configured via environment variables:
//!
//! - `GHERKIN_AUTOCOMPLETE_LSP_LOG_LEVEL`: Log verbosity (trace, debug,
//!   info, warn, error)
//! - `GHERKIN_AUTOCOMPLETE_LSP_FEATURE_LIBRARIES`: Extra feature-library
//!   roots, separated with the platform path separator
//! - `GHERKIN_AUTOCOMPLETE_LSP_MAX_FILES`: Cap on workspace scans
//!
//! # Example
//!
//! ```ignore
//! use gherkin_autocomplete_server::config::ServerConfig;
//! use gherkin_autocomplete_server::server::ServerState;
//!
//! let config = ServerConfig::from_env()?;
//! let state = ServerState::new(config);
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod indexing;
pub mod logging;
pub mod protocol;
pub mod query;
pub mod resolve;
pub mod server;
pub mod store;
pub mod util;

/// Test support utilities for unit and integration tests.
///
/// This module is hidden from documentation as it's intended for internal
/// test use only.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;
