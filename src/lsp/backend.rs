use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::{Mutex, RwLock};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::config::options_for_root;
use crate::lsp::document::DocumentState;
use crate::lsp::handlers::HandleDiagnostics;
use crate::lsp::watcher;
use crate::options::IndentationOptions;

/// The main LSP backend that holds state and implements the Language Server Protocol
#[derive(Clone)]
pub struct Backend {
    pub client: Client,
    pub options: Arc<RwLock<IndentationOptions>>,
    pub documents: Arc<Mutex<HashMap<Url, DocumentState>>>,
    root: Arc<Mutex<Option<PathBuf>>>,
    watcher: Arc<Mutex<Option<RecommendedWatcher>>>,
}

impl Backend {
    pub fn new(client: Client, options: IndentationOptions) -> Self {
        Self {
            client,
            options: Arc::new(RwLock::new(options)),
            documents: Arc::new(Mutex::new(HashMap::new())),
            root: Arc::new(Mutex::new(None)),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    async fn store(&self, uri: Url, state: DocumentState) {
        let mut docs = self.documents.lock().await;
        docs.insert(uri.clone(), state);
        drop(docs); // Release the lock before calling publish_diagnostics

        self.publish_diagnostics(uri).await;
    }
}

fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    let from_folders = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok());
    #[allow(deprecated)]
    let from_root_uri = || params.root_uri.as_ref().and_then(|uri| uri.to_file_path().ok());
    from_folders.or_else(from_root_uri)
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> tower_lsp::jsonrpc::Result<InitializeResult> {
        if let Some(root) = workspace_root(&params) {
            match options_for_root(&root) {
                Ok(options) => *self.options.write().await = options,
                Err(e) => log::warn!("ignoring options under {}: {:#}", root.display(), e),
            }
            *self.root.lock().await = Some(root);
        }

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "java-indent-ls".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "java-indent-ls initialized")
            .await;

        let Some(root) = self.root.lock().await.clone() else {
            return;
        };
        match watcher::start_watching(self.clone(), root) {
            Ok(w) => *self.watcher.lock().await = Some(w),
            Err(e) => {
                self.client
                    .log_message(
                        MessageType::WARNING,
                        format!("Failed to watch options file: {}", e),
                    )
                    .await;
            }
        }
    }

    async fn shutdown(&self) -> tower_lsp::jsonrpc::Result<()> {
        self.watcher.lock().await.take();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.store(doc.uri, DocumentState::new(doc.text, doc.version))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        if let Some(change) = params.content_changes.into_iter().last() {
            self.store(uri, DocumentState::new(change.text, version))
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.lock().await.remove(&uri);
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }
}
