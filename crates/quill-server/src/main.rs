use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use axum_extra::extract::cookie::Key;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use quill_media::PictureStore;
use quill_web::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let secret = std::env::var("QUILL_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-me-0123456789abcdefghijklmnopqrstuvwxyz-0123456789".into());
    if secret.len() < 32 {
        bail!("QUILL_SECRET must be at least 32 bytes of key material");
    }
    let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
    let data_dir = std::env::var("QUILL_DATA_DIR").unwrap_or_else(|_| "static".into());
    let host = std::env::var("QUILL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("QUILL_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let page_size: u32 = std::env::var("QUILL_PAGE_SIZE")
        .unwrap_or_else(|_| "2".into())
        .parse()
        .context("QUILL_PAGE_SIZE must be a positive integer")?;

    // Init database and picture storage
    let db = quill_db::Database::open(&PathBuf::from(&db_path))?;
    let pictures = PictureStore::new(&PathBuf::from(&data_dir)).await?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        pictures,
        cookie_key: Key::derive_from(secret.as_bytes()),
        page_size: page_size.max(1),
    });

    // Routes; uploaded profile pictures are served back from the data dir
    let app = quill_web::router(state)
        .nest_service("/static", ServeDir::new(&data_dir))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Quill listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
