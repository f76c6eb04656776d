use clap::Parser;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde_json::{Value, json};

static API_BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("DOC_ASSISTANT_API_URL").unwrap_or_else(|_| "http://localhost:3030".into())
});

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Index a document for search and retrieval
    Index {
        /// Path to the document to index
        #[clap(short, long)]
        path: String,
        /// Tag to attach (repeatable)
        #[clap(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Create a markdown note and index it
    Note {
        #[clap(long)]
        title: String,
        /// Note body in markdown
        #[clap(short, long)]
        content: String,
        /// Tag to attach (repeatable)
        #[clap(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Search indexed documents by filename or tag
    Search {
        /// The search query
        #[clap(short, long)]
        query: String,
        /// Only match documents carrying one of these tags (repeatable)
        #[clap(short, long = "tag")]
        tags: Vec<String>,
        /// Number of results to return
        #[clap(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Show metadata for a document
    Metadata {
        #[clap(short, long)]
        path: String,
    },
    /// List the tools the service exposes
    Tools,
    /// Remove stale tag associations from the index
    CompactTags,
}

impl Commands {
    /// The tool name and argument bag for commands that map to a tool call.
    fn tool_call(&self) -> Option<(&'static str, Value)> {
        match self {
            Commands::Index { path, tags } => {
                Some(("index_document", json!({ "path": path, "tags": tags })))
            }
            Commands::Note {
                title,
                content,
                tags,
            } => Some((
                "create_note",
                json!({ "title": title, "content": content, "tags": tags }),
            )),
            Commands::Search { query, tags, limit } => Some((
                "search_documents",
                json!({ "query": query, "tags": tags, "limit": limit }),
            )),
            Commands::Metadata { path } => Some(("extract_metadata", json!({ "path": path }))),
            Commands::Tools | Commands::CompactTags => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init(); // Basic tracing for CLI
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Tools => {
            let response = client.get(format!("{}/tools", &*API_BASE_URL)).send().await?;
            if response.status().is_success() {
                let tools: Vec<Value> = response.json().await?;
                for tool in tools {
                    println!(
                        "{:<18} {}",
                        tool["name"].as_str().unwrap_or_default(),
                        tool["description"].as_str().unwrap_or_default()
                    );
                }
            } else {
                eprintln!("Error listing tools: {} - {}", response.status(), response.text().await?);
            }
        }
        Commands::CompactTags => {
            let response = client
                .post(format!("{}/maintenance/compact-tags", &*API_BASE_URL))
                .send()
                .await?;
            if response.status().is_success() {
                let body: Value = response.json().await?;
                println!("Removed {} stale tag associations", body["removed"]);
            } else {
                eprintln!("Error compacting tags: {} - {}", response.status(), response.text().await?);
            }
        }
        command => {
            if let Some((name, arguments)) = command.tool_call() {
                call_tool(&client, name, arguments).await?;
            }
        }
    }
    Ok(())
}

async fn call_tool(client: &Client, name: &str, arguments: Value) -> Result<(), reqwest::Error> {
    tracing::info!("Calling tool {} on {}", name, &*API_BASE_URL);
    let response = client
        .post(format!("{}/tools/call", &*API_BASE_URL))
        .json(&json!({ "name": name, "arguments": arguments }))
        .send()
        .await?;

    if response.status().is_success() {
        let body: Value = response.json().await?;
        let text = body["content"][0]["text"].as_str().unwrap_or_default();
        if body["is_error"].as_bool().unwrap_or(false) {
            eprintln!("{}", text);
        } else {
            println!("{}", text);
        }
    } else {
        eprintln!("Error calling {}: {} - {}", name, response.status(), response.text().await?);
    }
    Ok(())
}
