//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::semantic_tokens::{encode_semantic_tokens, semantic_tokens_legend};
use cweb_config::LspConfig;
use cweb_parser::{classify, CancellationFlag, Legend, Token};
use tokio::sync::{Mutex, RwLock};
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    DocumentFilter, InitializeParams, InitializeResult, InitializedParams,
    SemanticTokensFullOptions, SemanticTokensOptions, SemanticTokensParams,
    SemanticTokensRegistrationOptions, SemanticTokensResult, SemanticTokensServerCapabilities,
    SemanticTokens, ServerCapabilities, ServerInfo, StaticRegistrationOptions,
    TextDocumentItem, TextDocumentRegistrationOptions, TextDocumentSyncCapability,
    TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;
use tracing::{debug, info, warn};

pub trait LspClient: Send + Sync + Clone + 'static {}
impl LspClient for Client {}

pub trait FeatureProvider: Send + Sync + 'static {
    fn semantic_tokens(&self, text: &str, cancel: &CancellationFlag) -> Vec<Token>;
}

#[derive(Default)]
pub struct DefaultFeatureProvider;

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn semantic_tokens(&self, text: &str, cancel: &CancellationFlag) -> Vec<Token> {
        classify(text, cancel)
    }
}

#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, Arc<String>>>,
}

impl DocumentStore {
    async fn insert(&self, uri: Url, text: String) {
        self.entries.write().await.insert(uri, Arc::new(text));
    }

    /// Replace the text of a tracked document; untracked documents stay untracked.
    async fn replace(&self, uri: &Url, text: String) -> bool {
        match self.entries.write().await.get_mut(uri) {
            Some(entry) => {
                *entry = Arc::new(text);
                true
            }
            None => false,
        }
    }

    async fn get(&self, uri: &Url) -> Option<Arc<String>> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

/// One cancellation flag per document with a scan in flight.
#[derive(Default)]
struct InflightScans {
    flags: Mutex<HashMap<Url, CancellationFlag>>,
}

impl InflightScans {
    /// Register a new scan for `uri`, cancelling the one it supersedes.
    async fn begin(&self, uri: Url) -> CancellationFlag {
        let flag = CancellationFlag::new();
        if let Some(previous) = self.flags.lock().await.insert(uri, flag.clone()) {
            previous.cancel();
        }
        flag
    }

    async fn cancel(&self, uri: &Url) {
        if let Some(flag) = self.flags.lock().await.remove(uri) {
            flag.cancel();
        }
    }

    async fn finish(&self, uri: &Url, flag: &CancellationFlag) {
        let mut flags = self.flags.lock().await;
        if flags.get(uri).is_some_and(|current| current.same_flag(flag)) {
            flags.remove(uri);
        }
    }
}

pub struct CwebLanguageServer<C = Client, P = DefaultFeatureProvider> {
    _client: C,
    config: LspConfig,
    legend: &'static Legend,
    documents: DocumentStore,
    scans: InflightScans,
    features: Arc<P>,
}

impl CwebLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client, config: LspConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()), config)
    }
}

impl<C, P> CwebLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>, config: LspConfig) -> Self {
        Self {
            _client: client,
            config,
            legend: Legend::standard(),
            documents: DocumentStore::default(),
            scans: InflightScans::default(),
            features,
        }
    }

    fn semantic_tokens_capability(&self) -> SemanticTokensServerCapabilities {
        SemanticTokensServerCapabilities::SemanticTokensRegistrationOptions(
            SemanticTokensRegistrationOptions {
                text_document_registration_options: TextDocumentRegistrationOptions {
                    document_selector: Some(vec![DocumentFilter {
                        language: Some(self.config.language_id.clone()),
                        scheme: None,
                        pattern: None,
                    }]),
                },
                semantic_tokens_options: SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: semantic_tokens_legend(self.legend),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                },
                static_registration_options: StaticRegistrationOptions::default(),
            },
        )
    }

    /// Run the classifier off the async runtime so a superseding request can flip the flag
    /// while the scan is still going. Returns `None` when the scan was superseded.
    async fn scan(&self, uri: &Url, text: Arc<String>) -> Option<Vec<Token>> {
        let flag = self.scans.begin(uri.clone()).await;
        let features = Arc::clone(&self.features);
        let scan_flag = flag.clone();
        let result =
            tokio::task::spawn_blocking(move || features.semantic_tokens(&text, &scan_flag)).await;
        self.scans.finish(uri, &flag).await;

        match result {
            Ok(_) if flag.is_cancelled() => {
                debug!(%uri, "semantic token scan superseded");
                None
            }
            Ok(tokens) => Some(tokens),
            Err(err) => {
                warn!(%uri, error = %err, "semantic token scan failed");
                None
            }
        }
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for CwebLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            semantic_tokens_provider: Some(self.semantic_tokens_capability()),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: self.config.server_name.clone(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        info!(language = %self.config.language_id, "cweb language server ready");
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: lsp_types::DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri,
            language_id,
            text,
            ..
        } = params.text_document;
        if language_id != self.config.language_id {
            debug!(%uri, %language_id, "ignoring document in another language");
            return;
        }
        debug!(%uri, "document opened");
        self.documents.insert(uri, text).await;
    }

    async fn did_change(&self, params: lsp_types::DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        if let Some(change) = params.content_changes.into_iter().last() {
            self.scans.cancel(&uri).await;
            self.documents.replace(&uri, change.text).await;
        }
    }

    async fn did_close(&self, params: lsp_types::DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.scans.cancel(&uri).await;
        self.documents.remove(&uri).await;
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let uri = params.text_document.uri;
        let Some(text) = self.documents.get(&uri).await else {
            return Ok(None);
        };
        let Some(tokens) = self.scan(&uri, text).await else {
            return Ok(None);
        };
        let data = encode_semantic_tokens(&tokens, self.legend);
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data,
        })))
    }
}
