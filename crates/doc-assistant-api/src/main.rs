use doc_assistant_api::{AppState, config, create_app};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Error, Debug)]
enum StartupError {
    #[error("Failed to open document store: {0}")]
    Store(#[from] doc_assistant_core::DocumentError),
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // if we don't init tracing, we won't be able to see the env results
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "doc_assistant_api=debug,tower_http=debug,doc_assistant_core=info".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenvy::dotenv().ok() {
        Some(path) => tracing::info!(".env file loaded successfully from: {:?}", path),
        None => tracing::warn!(
            "Could not load .env file or it was already loaded. This is fine if variables are set externally."
        ),
    }

    tracing::info!(
        "Opening document store: documents={}, index={}",
        &*config::DOCUMENTS_DIR,
        &*config::INDEX_DIR
    );
    let app = create_app(AppState::from_env()?);

    let listener = tokio::net::TcpListener::bind(config::API_BASE_URL.as_str()).await?;
    tracing::info!("Starting Document Assistant API on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
