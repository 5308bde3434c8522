//! In-process stub of the document API and the execution service.

use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct StubState {
    docs: Vec<Value>,
    requests: Vec<(String, Option<String>)>,
    failure: Option<StatusCode>,
    next_id: usize,
}

/// Handle for seeding and inspecting the stub.
#[derive(Clone, Default)]
pub struct DocsStub {
    state: Arc<Mutex<StubState>>,
}

impl DocsStub {
    /// Add a document on the server side only.
    pub fn seed(&self, doc: Value) {
        self.state.lock().unwrap().docs.push(doc);
    }

    /// Answer every following request with `status`.
    pub fn fail_with(&self, status: StatusCode) {
        self.state.lock().unwrap().failure = Some(status);
    }

    pub fn recover(&self) {
        self.state.lock().unwrap().failure = None;
    }

    /// Path and Authorization header of every request received so far.
    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Authorization header of the most recent request.
    pub fn last_authorization(&self) -> Option<String> {
        self.requests().last().and_then(|(_, auth)| auth.clone())
    }

    /// Record the request and return the configured failure, if any.
    fn enter(&self, uri: &Uri, headers: &HeaderMap) -> Result<(), Response> {
        let mut state = self.state.lock().unwrap();
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state.requests.push((uri.path().to_string(), auth));

        match state.failure {
            Some(status) => Err((status, Json(json!({ "message": "stub failure" }))).into_response()),
            None => Ok(()),
        }
    }
}

fn matches_id(doc: &Value, id: &str) -> bool {
    doc.get("_id").and_then(Value::as_str) == Some(id)
        || doc.get("id").and_then(Value::as_str) == Some(id)
}

async fn list(State(stub): State<DocsStub>, uri: Uri, headers: HeaderMap) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    let docs = stub.state.lock().unwrap().docs.clone();
    Json(Value::Array(docs)).into_response()
}

async fn show(
    State(stub): State<DocsStub>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    let state = stub.state.lock().unwrap();
    match state.docs.iter().find(|d| matches_id(d, &id)) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response(),
    }
}

async fn create(
    State(stub): State<DocsStub>,
    uri: Uri,
    headers: HeaderMap,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    let mut state = stub.state.lock().unwrap();
    state.next_id += 1;
    let mut doc = fields;
    doc.insert("_id".to_string(), json!(format!("doc-{}", state.next_id)));
    let doc = Value::Object(doc);
    state.docs.push(doc.clone());

    (StatusCode::CREATED, Json(doc)).into_response()
}

async fn update(
    State(stub): State<DocsStub>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    Json(fields): Json<Map<String, Value>>,
) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    let mut state = stub.state.lock().unwrap();
    let Some(doc) = state.docs.iter_mut().find(|d| matches_id(d, &id)) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response();
    };
    if let Value::Object(existing) = doc {
        existing.extend(fields);
    }

    Json(doc.clone()).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShareRequest {
    to_mail: String,
    doc_id: String,
}

async fn share(
    State(stub): State<DocsStub>,
    uri: Uri,
    headers: HeaderMap,
    Json(request): Json<ShareRequest>,
) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    Json(json!({
        "message": "Mail sent",
        "toMail": request.to_mail,
        "docId": request.doc_id,
    }))
    .into_response()
}

#[derive(Deserialize)]
struct ExecRequest {
    code: String,
}

/// Echoes the base64 source back as the base64 output.
async fn exec(
    State(stub): State<DocsStub>,
    uri: Uri,
    headers: HeaderMap,
    Json(request): Json<ExecRequest>,
) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    Json(json!({ "data": request.code })).into_response()
}

/// An execution service whose output is not base64.
async fn exec_garbled(State(stub): State<DocsStub>, uri: Uri, headers: HeaderMap) -> Response {
    if let Err(response) = stub.enter(&uri, &headers) {
        return response;
    }
    Json(json!({ "data": "%%% not base64 %%%" })).into_response()
}

/// Start the stub and return its base URL with a handle to its state.
///
/// The echoing execution service is mounted at the root (`/code`), the
/// garbled one under `/garbled` (`/garbled/code`).
pub async fn spawn_docs_stub() -> (String, DocsStub) {
    let stub = DocsStub::default();
    let app = Router::new()
        .route("/api/docs", get(list).post(create))
        .route("/api/docs/{id}", get(show).put(update))
        .route("/api/sendMail", post(share))
        .route("/code", post(exec))
        .route("/garbled/code", post(exec_garbled))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), stub)
}

/// A base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
