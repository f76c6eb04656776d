use axum::Router;
use doc_assistant_api::{
    AppState, CallToolRequest, CallToolResponse, CompactTagsResponse, create_app,
};
use doc_assistant_core::DocumentStore;
use reqwest::{Client as TestClient, StatusCode};
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};
use tokio::net::TcpListener;

struct TestApp {
    address: String,
    data_dir: TempDir,
}

impl TestApp {
    fn documents_dir(&self) -> PathBuf {
        self.data_dir.path().join("documents")
    }

    fn index_file(&self) -> PathBuf {
        self.data_dir.path().join("index").join("documents.json")
    }
}

// Helper to spawn the app on a random port backed by a temp-dir store
async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    let data_dir = tempdir().expect("Failed to create temp dir for test data");
    let store = DocumentStore::open(
        data_dir.path().join("documents"),
        data_dir.path().join("index"),
    )
    .expect("Failed to open test document store");

    let app: Router = create_app(AppState::new(store));
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .unwrap();
    });

    TestApp { address, data_dir }
}

async fn call(client: &TestClient, app: &TestApp, name: &str, arguments: Value) -> CallToolResponse {
    let arguments = match arguments {
        Value::Object(map) => Some(map),
        _ => None,
    };
    let response = client
        .post(format!("{}/tools/call", app.address))
        .json(&CallToolRequest {
            name: name.to_string(),
            arguments,
        })
        .send()
        .await
        .expect("Failed to call /tools/call");

    let status = response.status();
    let body_text = response.text().await.unwrap_or_default();
    assert!(
        status.is_success(),
        "Tool call {} failed with status {}: {}",
        name,
        status,
        body_text
    );
    serde_json::from_str(&body_text).unwrap_or_else(|e| {
        panic!("Failed to parse /tools/call response: {}. Body: {}", e, body_text)
    })
}

fn text(response: &CallToolResponse) -> &str {
    assert_eq!(response.content.len(), 1);
    assert_eq!(response.content[0].kind, "text");
    &response.content[0].text
}

#[tokio::test]
async fn test_root_and_tool_listing() {
    let app = spawn_app().await;
    let client = TestClient::new();

    let body = client
        .get(&app.address)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "Document Assistant API is running!");

    let tools: Vec<Value> = client
        .get(format!("{}/tools", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        ["index_document", "create_note", "search_documents", "extract_metadata"]
    );
}

#[tokio::test]
async fn test_index_search_and_extract_metadata() {
    let app = spawn_app().await;
    let client = TestClient::new();

    let file_path = app.data_dir.path().join("design_review.md");
    let mut file = File::create(&file_path).unwrap();
    writeln!(file, "Review notes for the storage layer.").unwrap();
    let file_path_str = file_path.to_str().unwrap().to_string();

    let indexed = call(
        &client,
        &app,
        "index_document",
        json!({ "path": file_path_str, "tags": ["review", "storage"] }),
    )
    .await;
    assert!(!indexed.is_error, "{}", text(&indexed));
    assert!(text(&indexed).starts_with("Document indexed successfully: "));
    assert!(text(&indexed).ends_with("design_review.md"));

    let found = call(
        &client,
        &app,
        "search_documents",
        json!({ "query": "design", "tags": ["storage"], "limit": 5 }),
    )
    .await;
    let results: Vec<Value> = serde_json::from_str(text(&found)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["tags"], json!(["review", "storage"]));

    let missed = call(
        &client,
        &app,
        "search_documents",
        json!({ "query": "design", "tags": ["unrelated"] }),
    )
    .await;
    assert_eq!(text(&missed), "[]");

    let metadata = call(&client, &app, "extract_metadata", json!({ "path": file_path_str })).await;
    let metadata: Value = serde_json::from_str(text(&metadata)).unwrap();
    assert_eq!(metadata["extension"], ".md");
    assert!(metadata["indexed_at"].is_string());
}

#[tokio::test]
async fn test_create_note_is_written_and_searchable() {
    let app = spawn_app().await;
    let client = TestClient::new();

    let created = call(
        &client,
        &app,
        "create_note",
        json!({ "title": "My Title", "content": "body", "tags": ["x"] }),
    )
    .await;
    assert!(!created.is_error, "{}", text(&created));
    let note_path = app.documents_dir().join("my-title.md");
    assert_eq!(
        text(&created),
        format!("Note created successfully at: {}", note_path.display())
    );

    let written = std::fs::read_to_string(&note_path).unwrap();
    assert!(written.starts_with("---\ntitle: My Title\n"));
    assert!(written.ends_with("tags: x\n---\n\nbody"));

    let found = call(&client, &app, "search_documents", json!({ "query": "my-title" })).await;
    let results: Vec<Value> = serde_json::from_str(text(&found)).unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_errors_are_returned_as_text() {
    let app = spawn_app().await;
    let client = TestClient::new();
    let missing = app.data_dir.path().join("missing.txt");

    let response = call(
        &client,
        &app,
        "index_document",
        json!({ "path": missing.to_str().unwrap() }),
    )
    .await;
    assert!(response.is_error);
    assert_eq!(
        text(&response),
        format!("Error: Document not found (path: {})", missing.display())
    );
    assert!(!app.index_file().exists());

    let response = call(&client, &app, "create_note", Value::Null).await;
    assert!(response.is_error);
    assert!(text(&response).starts_with("Unexpected error:"));
}

#[tokio::test]
async fn test_unknown_tool_is_rejected() {
    let app = spawn_app().await;
    let client = TestClient::new();

    let response = client
        .post(format!("{}/tools/call", app.address))
        .json(&json!({ "name": "format_disk", "arguments": {} }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "Unknown tool: format_disk");
}

#[tokio::test]
async fn test_compact_tags_drops_stale_associations() {
    let app = spawn_app().await;
    let client = TestClient::new();

    let file_path = app.data_dir.path().join("retagged.txt");
    std::fs::write(&file_path, "x").unwrap();
    let path = file_path.to_str().unwrap();

    call(&client, &app, "index_document", json!({ "path": path, "tags": ["draft"] })).await;
    call(&client, &app, "index_document", json!({ "path": path, "tags": ["final"] })).await;

    let compacted: CompactTagsResponse = client
        .post(format!("{}/maintenance/compact-tags", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(compacted.removed, 1);

    let index: Value = serde_json::from_str(&std::fs::read_to_string(app.index_file()).unwrap()).unwrap();
    assert!(index["tags"].get("draft").is_none());
    assert_eq!(index["tags"]["final"].as_array().unwrap().len(), 1);
}
