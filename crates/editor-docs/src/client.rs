//! REST client for the document API and the code execution service.
//!
//! Every document request carries the session's bearer token, read from the
//! [`TokenProvider`] as the request is built. The client
//! keeps a local mirror of the collection, the last fetched document and a
//! last-error slot, each observable through a `watch` channel.

use crate::document::{Document, DocumentFields};
use crate::exec::{decode_output, encode_source, ExecRequest, ExecResponse};
use crate::{DocsError, DocsResult};
use editor_auth::{summarize_response_body, TokenProvider};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShareRequest<'a> {
    to_mail: &'a str,
    doc_id: &'a str,
}

/// Authenticated client for the document collection.
pub struct DocumentClient {
    http_client: Client,
    api_url: String,
    exec_url: String,
    tokens: Arc<dyn TokenProvider>,
    documents: watch::Sender<Vec<Document>>,
    document: watch::Sender<Option<Document>>,
    error: watch::Sender<Option<String>>,
}

impl DocumentClient {
    /// Create a new document client.
    ///
    /// # Arguments
    /// * `api_url` - Base URL of the document API (e.g. `http://localhost:1337`)
    /// * `exec_url` - Base URL of the code execution service
    /// * `tokens` - Source of the bearer token, consulted on every request
    pub fn new(
        api_url: impl Into<String>,
        exec_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self::with_http_client(api_url, exec_url, tokens, Client::new())
    }

    /// Create a document client that sends requests through `http_client`.
    pub fn with_http_client(
        api_url: impl Into<String>,
        exec_url: impl Into<String>,
        tokens: Arc<dyn TokenProvider>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            exec_url: exec_url.into().trim_end_matches('/').to_string(),
            tokens,
            documents: watch::channel(Vec::new()).0,
            document: watch::channel(None).0,
            error: watch::channel(None).0,
        }
    }

    fn docs_url(&self) -> String {
        format!("{}/api/docs", self.api_url)
    }

    /// Single-document URL. The id is percent-encoded as one path segment.
    fn doc_url(&self, id: &str) -> DocsResult<Url> {
        let mut url = Url::parse(&self.docs_url())?;
        url.path_segments_mut()
            .map_err(|_| DocsError::InvalidUrl(self.api_url.clone()))?
            .push(id);
        Ok(url)
    }

    fn share_url(&self) -> String {
        format!("{}/api/sendMail", self.api_url)
    }

    fn exec_endpoint(&self) -> String {
        format!("{}/code", self.exec_url)
    }

    /// Attach the current bearer token. Empty when logged out.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.tokens.bearer_token())
    }

    /// Snapshot of the local document mirror.
    pub fn documents(&self) -> Vec<Document> {
        self.documents.borrow().clone()
    }

    /// The most recently fetched single document.
    pub fn document(&self) -> Option<Document> {
        self.document.borrow().clone()
    }

    /// Message of the last failed operation, if any.
    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn subscribe_documents(&self) -> watch::Receiver<Vec<Document>> {
        self.documents.subscribe()
    }

    pub fn subscribe_document(&self) -> watch::Receiver<Option<Document>> {
        self.document.subscribe()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<String>> {
        self.error.subscribe()
    }

    /// Fetch the whole collection and replace the mirror.
    ///
    /// The error slot is not cleared first. On failure the mirror keeps its
    /// previous contents.
    pub async fn list_documents(&self) {
        match self.try_list_documents().await {
            Ok(documents) => {
                debug!(count = documents.len(), "Fetched documents");
                self.documents.send_replace(documents);
            }
            Err(e) => self.record_error("list documents", e),
        }
    }

    /// Fetch one document into the single-document slot.
    ///
    /// On failure the slot keeps its previous value.
    pub async fn get_document(&self, id: &str) -> Option<Document> {
        self.clear_error();
        match self.try_get_document(id).await {
            Ok(document) => {
                self.document.send_replace(Some(document.clone()));
                Some(document)
            }
            Err(e) => {
                self.record_error("get document", e);
                None
            }
        }
    }

    /// Create a document and append the server's copy to the mirror.
    pub async fn create_document(&self, fields: &DocumentFields) -> Option<Document> {
        self.clear_error();
        match self.try_create_document(fields).await {
            Ok(document) => {
                info!(id = ?document.identifier(), "Document created");
                self.documents.send_modify(|docs| docs.push(document.clone()));
                Some(document)
            }
            Err(e) => {
                self.record_error("create document", e);
                None
            }
        }
    }

    /// Update a document and replace its mirror entry with the server's copy.
    ///
    /// The entry is matched on either identifier field. A document missing
    /// from the mirror leaves the mirror unchanged.
    pub async fn update_document(&self, id: &str, fields: &DocumentFields) -> Option<Document> {
        self.clear_error();
        match self.try_update_document(id, fields).await {
            Ok(document) => {
                let replaced = self.documents.send_if_modified(|docs| {
                    match docs.iter().position(|d| d.matches_id(id)) {
                        Some(index) => {
                            docs[index] = document.clone();
                            true
                        }
                        None => false,
                    }
                });
                info!(id = %id, mirrored = replaced, "Document updated");
                Some(document)
            }
            Err(e) => {
                self.record_error("update document", e);
                None
            }
        }
    }

    /// Ask the server to mail a share invitation for a document.
    pub async fn share_document(&self, id: &str, recipient_email: &str) -> Option<Value> {
        self.clear_error();
        match self.try_share_document(id, recipient_email).await {
            Ok(response) => {
                info!(id = %id, recipient = %recipient_email, "Document shared");
                Some(response)
            }
            Err(e) => {
                self.record_error("share document", e);
                None
            }
        }
    }

    /// Run source text on the execution service and return its output.
    ///
    /// This request is unauthenticated.
    pub async fn execute_remote_code(&self, source: &str) -> Option<String> {
        self.clear_error();
        match self.try_execute_remote_code(source).await {
            Ok(output) => Some(output),
            Err(e) => {
                self.record_error("execute code", e);
                None
            }
        }
    }

    async fn try_list_documents(&self) -> DocsResult<Vec<Document>> {
        let url = self.docs_url();
        debug!(url = %url, "Fetching documents");

        let response = self.authorized(self.http_client.get(&url)).send().await?;
        read_json(response, "Failed to fetch documents").await
    }

    async fn try_get_document(&self, id: &str) -> DocsResult<Document> {
        let url = self.doc_url(id)?;
        debug!(url = %url, "Fetching document");

        let response = self.authorized(self.http_client.get(url)).send().await?;
        read_json(response, "Document not found").await
    }

    async fn try_create_document(&self, fields: &DocumentFields) -> DocsResult<Document> {
        let url = self.docs_url();
        debug!(url = %url, "Creating document");

        let response = self
            .authorized(self.http_client.post(&url))
            .json(fields)
            .send()
            .await?;
        read_json(response, "Failed to add document").await
    }

    async fn try_update_document(&self, id: &str, fields: &DocumentFields) -> DocsResult<Document> {
        let url = self.doc_url(id)?;
        debug!(url = %url, "Updating document");

        let response = self
            .authorized(self.http_client.put(url))
            .json(fields)
            .send()
            .await?;
        read_json(response, "Failed to update document").await
    }

    async fn try_share_document(&self, id: &str, recipient_email: &str) -> DocsResult<Value> {
        let url = self.share_url();
        debug!(url = %url, id = %id, "Sharing document");

        let response = self
            .authorized(self.http_client.post(&url))
            .json(&ShareRequest {
                to_mail: recipient_email,
                doc_id: id,
            })
            .send()
            .await?;
        read_json(response, "Failed to share document").await
    }

    async fn try_execute_remote_code(&self, source: &str) -> DocsResult<String> {
        let url = self.exec_endpoint();
        debug!(url = %url, source_len = source.len(), "Executing code");

        let response = self
            .http_client
            .post(&url)
            .json(&ExecRequest {
                code: encode_source(source),
            })
            .send()
            .await?;
        let output: ExecResponse = read_json(response, "Execution service error").await?;
        decode_output(&output.data)
    }

    fn clear_error(&self) {
        self.error.send_if_modified(|slot| slot.take().is_some());
    }

    fn record_error(&self, operation: &str, e: DocsError) {
        warn!(operation = %operation, error = %e, "Document operation failed");
        self.error.send_replace(Some(e.to_string()));
    }
}

/// Read a JSON body, turning non-success statuses into [`DocsError::Status`].
async fn read_json<T: DeserializeOwned>(response: Response, message: &'static str) -> DocsResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!(
            status = %status,
            body_summary = %summarize_response_body(&body),
            "{}",
            message
        );
        return Err(DocsError::Status { message, status });
    }

    Ok(serde_json::from_str(&body)?)
}
