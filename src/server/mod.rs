use crate::config::Config;
use crate::images::{ImageService, ImageStorage};
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit, http::StatusCode, response::IntoResponse, routing::get, Router,
};
use pictura_db::pool::DbPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod error;
pub mod flash;
pub mod routes_images;
pub mod templates;

use templates::Templates;

/// URL prefix stored files are served under.
pub const MEDIA_URL: &str = "/media/";

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub images: Arc<ImageService>,
    pub templates: Arc<Templates>,
}

impl AppContext {
    /// Build the context from loaded config and an initialized database pool.
    pub fn new(config: Config, pool: DbPool) -> Result<Self> {
        let storage = ImageStorage::new(config.storage.media_root_path());
        let images = ImageService::new(storage, pool)
            .with_file_removal(config.storage.remove_files_on_delete);
        let templates = Templates::new().context("Failed to compile page templates")?;

        Ok(Self {
            config: Arc::new(config),
            images: Arc::new(images),
            templates: Arc::new(templates),
        })
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let media_root = ctx.images.storage().media_root().to_path_buf();
    let body_limit = ctx.config.upload.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .merge(routes_images::image_routes())
        .nest_service(MEDIA_URL.trim_end_matches('/'), ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config, pool: DbPool) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let media_root = config.storage.media_root_path();
    std::fs::create_dir_all(&media_root)
        .with_context(|| format!("Failed to create media root: {}", media_root.display()))?;
    tracing::info!("Serving media from {}", media_root.display());

    let ctx = AppContext::new(config, pool)?;
    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
