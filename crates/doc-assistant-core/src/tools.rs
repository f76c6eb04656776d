//! Named tool boundary over [`DocumentStore`].
//!
//! Callers hand over a tool name and a JSON argument bag and always get text
//! back; failures are rendered, never propagated.

use crate::document_store::DocumentStore;
use crate::error::DocumentError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::error;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    IndexDocument,
    CreateNote,
    SearchDocuments,
    ExtractMetadata,
}

impl Tool {
    pub const ALL: [Tool; 4] = [
        Tool::IndexDocument,
        Tool::CreateNote,
        Tool::SearchDocuments,
        Tool::ExtractMetadata,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::IndexDocument => "index_document",
            Tool::CreateNote => "create_note",
            Tool::SearchDocuments => "search_documents",
            Tool::ExtractMetadata => "extract_metadata",
        }
    }

    pub fn definition(self) -> ToolDefinition {
        let tags_schema = |description: &str| {
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": description
            })
        };

        let (description, input_schema) = match self {
            Tool::IndexDocument => (
                "Index a document for search and retrieval",
                json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string", "description": "Path to the document to index" },
                        "tags": tags_schema("Optional tags for categorization")
                    },
                    "required": ["path"]
                }),
            ),
            Tool::CreateNote => (
                "Create a new note in markdown format",
                json!({
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "description": "Title of the note" },
                        "content": { "type": "string", "description": "Content of the note in markdown" },
                        "tags": tags_schema("Optional tags for the note")
                    },
                    "required": ["title", "content"]
                }),
            ),
            Tool::SearchDocuments => (
                "Search indexed documents by keywords or tags",
                json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Search query string" },
                        "tags": tags_schema("Optional tags to filter results"),
                        "limit": {
                            "type": "integer",
                            "description": "Maximum number of results (default: 10)",
                            "default": DEFAULT_SEARCH_LIMIT
                        }
                    },
                    "required": ["query"]
                }),
            ),
            Tool::ExtractMetadata => (
                "Extract metadata from a document",
                json!({
                    "type": "object",
                    "properties": {
                        "path": { "type": "string", "description": "Path to the document" }
                    },
                    "required": ["path"]
                }),
            ),
        };

        ToolDefinition {
            name: self.name().to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| UnknownTool(name.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

pub fn list_tools() -> Vec<ToolDefinition> {
    Tool::ALL.into_iter().map(Tool::definition).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("invalid arguments: {0}")]
    InvalidArguments(serde_json::Error),
    #[error("failed to serialize result: {0}")]
    Serialization(serde_json::Error),
}

#[derive(Deserialize)]
struct IndexDocumentArgs {
    path: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct CreateNoteArgs {
    title: String,
    content: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct SearchDocumentsArgs {
    query: String,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ExtractMetadataArgs {
    path: String,
}

/// Runs `tool` against the store. Errors come back as `is_error` text.
pub async fn call_tool(store: &DocumentStore, tool: Tool, arguments: &Map<String, Value>) -> ToolOutput {
    match dispatch(store, tool, arguments).await {
        Ok(text) => ToolOutput { text, is_error: false },
        Err(ToolError::Document(e)) => {
            error!("Document error in {}: {}", tool, e);
            ToolOutput {
                text: format!("Error: {e}"),
                is_error: true,
            }
        }
        Err(e) => {
            error!("Unexpected error in {}: {}", tool, e);
            ToolOutput {
                text: format!("Unexpected error: {e}"),
                is_error: true,
            }
        }
    }
}

async fn dispatch(store: &DocumentStore, tool: Tool, arguments: &Map<String, Value>) -> Result<String, ToolError> {
    match tool {
        Tool::IndexDocument => {
            let args: IndexDocumentArgs = parse_args(arguments)?;
            let id = store
                .index_document(&args.path, args.tags.unwrap_or_default())
                .await?;
            Ok(format!("Document indexed successfully: {id}"))
        }
        Tool::CreateNote => {
            let args: CreateNoteArgs = parse_args(arguments)?;
            let path = store
                .create_note(&args.title, &args.content, args.tags.unwrap_or_default())
                .await?;
            Ok(format!("Note created successfully at: {path}"))
        }
        Tool::SearchDocuments => {
            let args: SearchDocumentsArgs = parse_args(arguments)?;
            let results = store
                .search_documents(
                    &args.query,
                    &args.tags.unwrap_or_default(),
                    args.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
                )
                .await?;
            serde_json::to_string_pretty(&results).map_err(ToolError::Serialization)
        }
        Tool::ExtractMetadata => {
            let args: ExtractMetadataArgs = parse_args(arguments)?;
            let metadata = store.extract_metadata(&args.path).await?;
            serde_json::to_string_pretty(&metadata).map_err(ToolError::Serialization)
        }
    }
}

fn parse_args<T: DeserializeOwned>(arguments: &Map<String, Value>) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments.clone())).map_err(ToolError::InvalidArguments)
}
