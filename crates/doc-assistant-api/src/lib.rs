// crates/doc-assistant-api/src/lib.rs
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use doc_assistant_core::{
    DocumentError, DocumentStore,
    tools::{self, Tool, ToolDefinition},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

pub mod config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Opens the store at `DOCUMENTS_DIR` / `INDEX_DIR`.
    pub fn from_env() -> Result<Self, DocumentError> {
        let store = DocumentStore::open(config::DOCUMENTS_DIR.as_str(), config::INDEX_DIR.as_str())?;
        Ok(Self::new(store))
    }
}

// Lifting this logic out of the main function makes it easier to test
pub fn create_app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/tools", get(list_tools_handler))
        .route("/tools/call", post(call_tool_handler))
        .route("/maintenance/compact-tags", post(compact_tags_handler))
        .with_state(app_state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

pub async fn root() -> &'static str {
    "Document Assistant API is running!"
}

pub async fn list_tools_handler() -> Json<Vec<ToolDefinition>> {
    Json(tools::list_tools())
}

#[derive(Serialize, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CallToolResponse {
    pub content: Vec<TextContent>,
    pub is_error: bool,
}

pub async fn call_tool_handler(
    State(state): State<AppState>,
    Json(payload): Json<CallToolRequest>,
) -> Result<Json<CallToolResponse>, (StatusCode, String)> {
    let tool: Tool = payload.name.parse().map_err(|e: tools::UnknownTool| {
        tracing::warn!("Rejected call: {}", e);
        (StatusCode::NOT_FOUND, e.to_string())
    })?;
    tracing::info!("Calling tool: {}", tool);

    let arguments = payload.arguments.unwrap_or_default();
    let output = tools::call_tool(&state.store, tool, &arguments).await;

    Ok(Json(CallToolResponse {
        content: vec![TextContent {
            kind: "text".to_string(),
            text: output.text,
        }],
        is_error: output.is_error,
    }))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CompactTagsResponse {
    pub removed: usize,
}

pub async fn compact_tags_handler(
    State(state): State<AppState>,
) -> Result<Json<CompactTagsResponse>, (StatusCode, String)> {
    let removed = state.store.compact_tags().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Compaction error: {}", e),
        )
    })?;
    Ok(Json(CompactTagsResponse { removed }))
}
