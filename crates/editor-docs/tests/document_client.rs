mod common;

use axum::http::StatusCode;
use editor_auth::{SessionManager, StaticToken};
use editor_docs::{Document, DocumentClient, DocumentFields};
use editor_storage::MemoryStorage;
use serde_json::json;
use std::sync::Arc;

fn client_for(base_url: &str) -> DocumentClient {
    DocumentClient::new(base_url, base_url, Arc::new(StaticToken("abc".to_string())))
}

/// The last Authorization header with surrounding whitespace dropped.
fn trimmed_authorization(stub: &common::DocsStub) -> Option<String> {
    stub.last_authorization().map(|auth| auth.trim().to_string())
}

#[tokio::test]
async fn list_replaces_mirror_with_bearer_token() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A", "content": "first" }));
    stub.seed(json!({ "_id": "b", "title": "B", "content": "second" }));
    let client = client_for(&base_url);

    client.list_documents().await;

    let docs = client.documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].identifier(), Some("a"));
    assert_eq!(docs[1].content, "second");
    assert_eq!(stub.last_authorization().as_deref(), Some("Bearer abc"));
    assert!(client.error().is_none());
}

#[tokio::test]
async fn token_is_read_at_call_time() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    let session = Arc::new(SessionManager::new(Arc::new(MemoryStorage::new()), &base_url));
    let client = DocumentClient::new(&base_url, &base_url, session.clone());

    client.list_documents().await;
    assert_eq!(trimmed_authorization(&stub), Some("Bearer".to_string()));

    session.set_session("fresh-token", json!({ "_id": "user-1" }));
    client.list_documents().await;
    assert_eq!(stub.last_authorization().as_deref(), Some("Bearer fresh-token"));

    session.logout();
    client.list_documents().await;
    assert_eq!(trimmed_authorization(&stub), Some("Bearer".to_string()));
}

#[tokio::test]
async fn failed_list_keeps_mirror_and_sets_error() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A" }));
    let client = client_for(&base_url);
    client.list_documents().await;
    let before = client.documents();

    stub.fail_with(StatusCode::INTERNAL_SERVER_ERROR);
    client.list_documents().await;

    assert_eq!(client.documents(), before);
    assert_eq!(
        client.error().as_deref(),
        Some("Failed to fetch documents (500 Internal Server Error)")
    );
}

#[tokio::test]
async fn list_does_not_clear_previous_error() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);

    stub.fail_with(StatusCode::BAD_REQUEST);
    assert!(client.create_document(&DocumentFields::new("T", "C")).await.is_none());
    stub.recover();

    client.list_documents().await;
    assert_eq!(
        client.error().as_deref(),
        Some("Failed to add document (400 Bad Request)")
    );
}

#[tokio::test]
async fn get_document_fills_slot_and_keeps_it_on_failure() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A", "content": "body" }));
    let client = client_for(&base_url);

    let doc = client.get_document("a").await.expect("document should exist");
    assert_eq!(doc.title, "A");
    assert_eq!(client.document(), Some(doc.clone()));

    assert!(client.get_document("missing").await.is_none());
    assert_eq!(client.document(), Some(doc));
    assert_eq!(
        client.error().as_deref(),
        Some("Document not found (404 Not Found)")
    );

    // A successful call clears the error again.
    assert!(client.get_document("a").await.is_some());
    assert!(client.error().is_none());
}

#[tokio::test]
async fn create_appends_server_copy() {
    let (base_url, _stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);
    client.list_documents().await;
    let before = client.documents().len();

    let created = client
        .create_document(&DocumentFields::new("Notes", "hello"))
        .await
        .expect("create should succeed");

    let docs = client.documents();
    assert_eq!(docs.len(), before + 1);
    assert_eq!(docs.last(), Some(&created));
    assert_eq!(created.identifier(), Some("doc-1"));
    assert_eq!(created.title, "Notes");
}

#[tokio::test]
async fn create_does_not_dedup() {
    let (base_url, _stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);
    let fields = DocumentFields::new("Same", "same");

    client.create_document(&fields).await.unwrap();
    client.create_document(&fields).await.unwrap();

    assert_eq!(client.documents().len(), 2);
}

#[tokio::test]
async fn update_replaces_matching_entry_in_place() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A", "content": "one" }));
    stub.seed(json!({ "_id": "b", "title": "B", "content": "two" }));
    let client = client_for(&base_url);
    client.list_documents().await;

    let updated = client
        .update_document("b", &DocumentFields::default().with_content("changed"))
        .await
        .expect("update should succeed");

    let docs = client.documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].content, "one");
    assert_eq!(docs[1], updated);
    assert_eq!(docs[1].content, "changed");
    assert_eq!(docs[1].title, "B");
}

#[tokio::test]
async fn update_matches_alternate_identifier() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "id": "legacy", "title": "Old", "content": "" }));
    let client = client_for(&base_url);
    client.list_documents().await;

    client
        .update_document("legacy", &DocumentFields::default().with_title("New"))
        .await
        .expect("update should succeed");

    assert_eq!(client.documents()[0].title, "New");
}

#[tokio::test]
async fn update_of_unmirrored_document_leaves_mirror() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A" }));
    let client = client_for(&base_url);
    client.list_documents().await;
    stub.seed(json!({ "_id": "elsewhere", "title": "Hidden" }));
    let before = client.documents();

    let response = client
        .update_document("elsewhere", &DocumentFields::default().with_title("Seen"))
        .await;

    assert_eq!(response.map(|d| d.title), Some("Seen".to_string()));
    assert_eq!(client.documents(), before);
    assert!(client.error().is_none());
}

#[tokio::test]
async fn failed_update_returns_none_and_keeps_mirror() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A" }));
    let client = client_for(&base_url);
    client.list_documents().await;
    let before = client.documents();

    stub.fail_with(StatusCode::FORBIDDEN);
    let response = client
        .update_document("a", &DocumentFields::default().with_title("Nope"))
        .await;

    assert!(response.is_none());
    assert_eq!(client.documents(), before);
    assert_eq!(
        client.error().as_deref(),
        Some("Failed to update document (403 Forbidden)")
    );
}

#[tokio::test]
async fn share_posts_recipient_and_id() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);
    client.list_documents().await;
    let before = client.documents();

    let response = client
        .share_document("a", "bob@example.com")
        .await
        .expect("share should succeed");

    assert_eq!(response["toMail"], json!("bob@example.com"));
    assert_eq!(response["docId"], json!("a"));
    assert_eq!(client.documents(), before);
    assert_eq!(stub.last_authorization().as_deref(), Some("Bearer abc"));
}

#[tokio::test]
async fn execute_remote_code_round_trips_through_echo() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);

    let output = client.execute_remote_code("print(1)").await;

    assert_eq!(output.as_deref(), Some("print(1)"));
    let (path, auth) = stub.requests().pop().unwrap();
    assert_eq!(path, "/code");
    assert_eq!(auth, None);
}

#[tokio::test]
async fn execute_remote_code_rejects_garbled_output() {
    let (base_url, _stub) = common::spawn_docs_stub().await;
    let client = DocumentClient::new(
        &base_url,
        format!("{base_url}/garbled"),
        Arc::new(StaticToken("abc".to_string())),
    );

    assert!(client.execute_remote_code("print(1)").await.is_none());
    assert!(client
        .error()
        .unwrap()
        .starts_with("Invalid execution output"));
}

#[tokio::test]
async fn execute_remote_code_reports_service_status() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);
    stub.fail_with(StatusCode::BAD_GATEWAY);

    assert!(client.execute_remote_code("print(1)").await.is_none());
    assert_eq!(
        client.error().as_deref(),
        Some("Execution service error (502 Bad Gateway)")
    );
}

#[tokio::test]
async fn unreachable_server_folds_into_failure() {
    let url = common::unreachable_url();
    let client = client_for(&url);

    client.list_documents().await;
    assert!(client.documents().is_empty());
    assert!(client.error().unwrap().starts_with("HTTP error"));

    assert!(client.get_document("a").await.is_none());
    assert!(client.document().is_none());
    assert!(client
        .create_document(&DocumentFields::new("T", "C"))
        .await
        .is_none());
    assert!(client
        .update_document("a", &DocumentFields::default().with_title("T"))
        .await
        .is_none());
    assert!(client.share_document("a", "bob@example.com").await.is_none());
    assert!(client.execute_remote_code("1").await.is_none());
    assert!(client.error().is_some());
}

#[tokio::test]
async fn malformed_document_body_is_a_failure() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": 42 }));
    let client = client_for(&base_url);

    client.list_documents().await;

    assert!(client.documents().is_empty());
    assert!(client.error().unwrap().starts_with("JSON error"));
}

#[tokio::test]
async fn null_content_does_not_break_list() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a", "title": "A", "content": null }));
    stub.seed(json!({ "_id": "b", "title": "B", "content": "body" }));
    let client = client_for(&base_url);

    client.list_documents().await;

    let docs = client.documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].content, "");
    assert!(client.error().is_none());
}

#[tokio::test]
async fn ids_with_reserved_characters_stay_in_one_segment() {
    let (base_url, stub) = common::spawn_docs_stub().await;
    stub.seed(json!({ "_id": "a/b?c#d", "title": "Odd" }));
    let client = client_for(&base_url);

    let doc = client
        .get_document("a/b?c#d")
        .await
        .expect("document should exist");

    assert_eq!(doc.title, "Odd");
    assert_eq!(
        stub.requests().last().map(|(path, _)| path.clone()),
        Some("/api/docs/a%2Fb%3Fc%23d".to_string())
    );
}

#[tokio::test]
async fn observers_see_mirror_changes() {
    let (base_url, _stub) = common::spawn_docs_stub().await;
    let client = client_for(&base_url);
    let mut rx = client.subscribe_documents();

    let created = client
        .create_document(&DocumentFields::new("Watched", ""))
        .await
        .unwrap();

    assert!(rx.has_changed().unwrap());
    let seen: Vec<Document> = rx.borrow_and_update().clone();
    assert_eq!(seen, vec![created]);
}
