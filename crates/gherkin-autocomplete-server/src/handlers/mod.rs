//! LSP request and notification handlers.
//!
//! Handlers cover the lifecycle protocol (`initialize`, `initialized`,
//! `shutdown`), completion, save notifications, and the custom step-cache
//! and language-info extension methods.

mod completion;
mod language;
mod lifecycle;
mod text_document;

pub use completion::handle_completion;
pub use language::handle_language_info;
pub use lifecycle::{handle_initialise, handle_initialised, handle_shutdown};
pub use text_document::{handle_did_save_text_document, handle_rebuild_step_cache};
