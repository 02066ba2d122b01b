//! Core language server state and capability construction.
//!
//! This module defines the central state shared across all LSP handlers,
//! the server capabilities advertised to the client, and the status sink
//! that surfaces build progress as client messages.

use std::sync::Arc;

use async_lsp::ClientSocket;
use async_lsp::lsp_types::notification;
use lsp_types::{
    ClientCapabilities, CompletionOptions, MessageType, SaveOptions, ServerCapabilities,
    ShowMessageParams, TextDocumentSyncCapability, TextDocumentSyncKind, TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions, WorkspaceFolder,
};
use tracing::warn;

use crate::config::ServerConfig;
use crate::indexing::{IndexCoordinator, StatusSink};

/// Central state shared across all LSP handlers.
///
/// This struct holds the in-memory state of the language server, including
/// the step index coordinator and the client connection. It is passed to
/// handlers via the async-lsp router.
pub struct ServerState {
    /// Client capabilities received during initialisation.
    client_capabilities: Option<ClientCapabilities>,
    /// Workspace folders from the client.
    workspace_folders: Vec<WorkspaceFolder>,
    /// Whether the server has been initialised.
    initialised: bool,
    /// Configuration loaded from environment and command line.
    config: ServerConfig,
    /// Socket for server-initiated messages to the client.
    client: Option<ClientSocket>,
    /// Step index coordinator, created during `initialize`.
    index: Option<IndexCoordinator>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("initialised", &self.initialised)
            .field("config", &self.config)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Create a new server state with the given configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use gherkin_autocomplete_server::config::ServerConfig;
    /// use gherkin_autocomplete_server::server::ServerState;
    ///
    /// let state = ServerState::new(ServerConfig::default());
    /// assert!(!state.is_initialised());
    /// ```
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            client_capabilities: None,
            workspace_folders: Vec::new(),
            initialised: false,
            config,
            client: None,
            index: None,
        }
    }

    /// Store client capabilities received during initialisation.
    pub fn set_client_capabilities(&mut self, capabilities: ClientCapabilities) {
        self.client_capabilities = Some(capabilities);
    }

    /// Access the stored client capabilities, if any.
    #[must_use]
    pub fn client_capabilities(&self) -> Option<&ClientCapabilities> {
        self.client_capabilities.as_ref()
    }

    /// Store workspace folders provided by the client.
    pub fn set_workspace_folders(&mut self, folders: Vec<WorkspaceFolder>) {
        self.workspace_folders = folders;
    }

    /// Access the workspace folders provided by the client.
    #[must_use]
    pub fn workspace_folders(&self) -> &[WorkspaceFolder] {
        &self.workspace_folders
    }

    /// Store the client socket for server-initiated messages.
    pub fn set_client(&mut self, client: ClientSocket) {
        self.client = Some(client);
    }

    /// Access the client socket, if connected.
    #[must_use]
    pub fn client(&self) -> Option<&ClientSocket> {
        self.client.as_ref()
    }

    /// Store the step index coordinator built during initialisation.
    pub fn set_index(&mut self, index: IndexCoordinator) {
        self.index = Some(index);
    }

    /// Access the step index coordinator, if initialised.
    #[must_use]
    pub fn index(&self) -> Option<&IndexCoordinator> {
        self.index.as_ref()
    }

    /// Access the current server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Mark the server as initialised.
    pub fn mark_initialised(&mut self) {
        self.initialised = true;
    }

    /// Check if the server is initialised.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}

/// Build the server capabilities to advertise to the client.
///
/// The server offers completion and asks for save notifications only; it
/// re-reads documents from disk, so incremental content sync is
/// unnecessary.
#[must_use]
pub fn build_server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        completion_provider: Some(CompletionOptions::default()),
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: None,
                change: Some(TextDocumentSyncKind::NONE),
                will_save: None,
                will_save_wait_until: None,
                save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                    include_text: Some(false),
                })),
            },
        )),
        ..ServerCapabilities::default()
    }
}

/// Status sink delivering build progress as `window/showMessage`
/// notifications.
#[derive(Debug, Clone)]
pub struct ClientStatusSink {
    client: ClientSocket,
}

impl ClientStatusSink {
    /// Wrap a client socket as a status sink.
    #[must_use]
    pub fn new(client: ClientSocket) -> Arc<Self> {
        Arc::new(Self { client })
    }
}

impl StatusSink for ClientStatusSink {
    fn status(&self, message: &str) {
        let params = ShowMessageParams {
            typ: MessageType::INFO,
            message: message.to_owned(),
        };
        if let Err(err) = self.client.notify::<notification::ShowMessage>(params) {
            warn!(error = %err, "failed to deliver status message to client");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_not_initialised() {
        let state = ServerState::new(ServerConfig::default());
        assert!(!state.is_initialised());
        assert!(state.client_capabilities().is_none());
        assert!(state.workspace_folders().is_empty());
        assert!(state.index().is_none());
        assert!(state.client().is_none());
    }

    #[test]
    fn mark_initialised_sets_flag() {
        let mut state = ServerState::new(ServerConfig::default());
        state.mark_initialised();
        assert!(state.is_initialised());
    }

    #[test]
    fn capabilities_advertise_completion_and_save_sync() {
        let capabilities = build_server_capabilities();
        assert!(capabilities.completion_provider.is_some());
        assert!(capabilities.text_document_sync.is_some());
    }
}
