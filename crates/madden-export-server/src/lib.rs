// Server mode - HTTP receiver for companion app exports
//
// Features:
// - Axum HTTP server (HTTP/1.1, HTTP/2)
// - Export endpoint with nested paths, status page, 404 fallback
// - Permissive CORS for browser-based senders
// - Structured logging with tracing, optional daily log file
// - Graceful shutdown bounded by a grace period

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::any,
    Router,
};
use madden_export_config::RuntimeConfig;
use madden_export_core::Persister;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, Dispatch};

mod handlers;
mod init;

pub use init::{build_logging, init_tracing, Logging};

use handlers::{handle_export, not_found, status_page};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub persister: Arc<Persister>,
    /// Export path without trailing slash, e.g. `/export`
    pub export_path: String,
    pub max_payload_bytes: usize,
    /// Port shown in the status page example URL
    pub port: u16,
}

impl AppState {
    pub fn new(persister: Persister, export_path: String, max_payload_bytes: usize, port: u16) -> Self {
        Self {
            persister: Arc::new(persister),
            export_path,
            max_payload_bytes,
            port,
        }
    }
}

/// Build the router: `/`, the export path and everything under it
pub fn build_router(state: AppState) -> Router {
    let export_path = state.export_path.clone();

    Router::new()
        .route("/", any(status_page))
        .route(&export_path, any(handle_export))
        .route(&format!("{}/", export_path), any(handle_export))
        .route(&format!("{}/*rest", export_path), any(handle_export))
        .fallback(not_found)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow cross-origin calls from anywhere
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}

/// Run the server until a shutdown signal, then wait for in-flight requests.
///
/// `dispatch` is the logging sink handed to the persister.
pub async fn run_with_config(config: RuntimeConfig, dispatch: Dispatch) -> Result<()> {
    let export_path = config.server.normalized_export_path();
    let grace = config.server.shutdown_grace();

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server.listen_addr))?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    let persister = Persister::new(config.storage.data_dir(), dispatch);
    let state = AppState::new(
        persister,
        export_path.clone(),
        config.request.max_payload_bytes,
        local_addr.port(),
    );
    let app = build_router(state);

    info!(
        "Starting Madden Companion Export server on http://{}",
        local_addr
    );
    info!("Routes:");
    info!("  POST http://{}{}/... - Export ingestion", local_addr, export_path);
    info!("  GET  http://{}{}     - Readiness message", local_addr, export_path);
    info!("  GET  http://{}/      - Status page", local_addr);
    info!("Writing exports to {}", config.storage.data_dir);
    info!("Press Ctrl+C or send SIGTERM to stop");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(());
    })
    .into_future();

    let deadline = async move {
        if shutdown_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result.context("Server error")?,
        _ = deadline => {
            anyhow::bail!(
                "Server forced to shutdown: in-flight requests did not finish within {}s",
                grace.as_secs()
            );
        }
    }

    info!("Server gracefully stopped");
    Ok(())
}
