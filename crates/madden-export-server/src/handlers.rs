// HTTP request handlers for server mode
//
// The export endpoint always answers 200: the companion app only checks the
// status code, so processing failures are reported in the body and the logs.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use madden_export_handlers::{is_readiness_probe, process_export, ExportError, ExportOutcome};
use metrics::counter;
use std::net::SocketAddr;
use tracing::{debug, error, info};

use crate::AppState;

/// Any method on the export path or below it
pub(crate) async fn handle_export(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let remote_addr = remote_addr(connect_info.as_ref());
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    info!(
        "Received request: Method={}, URL={}, RemoteAddr={}, Content-Type={}",
        method,
        uri.path(),
        remote_addr,
        content_type
    );
    debug!("Request Query Params: {}", uri.query().unwrap_or(""));
    for (name, value) in headers.iter() {
        debug!("Header {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    counter!("madden.export.requests", 1);

    if is_readiness_probe(method.as_str()) {
        info!("GET request received, sending status message");
        return ok_text(ExportOutcome::Ready.message());
    }

    let bytes = match axum::body::to_bytes(body, state.max_payload_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Error reading request body: {}", e);
            counter!("madden.export.failed", 1);
            let err = ExportError::BodyRead {
                message: e.to_string(),
            };
            return ok_text(ExportOutcome::Failed(err).message());
        }
    };

    let persister = state.persister.clone();
    let path = uri.path().to_string();
    let outcome =
        match tokio::task::spawn_blocking(move || process_export(&persister, &path, &bytes)).await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Export task failed: {}", e);
                ExportOutcome::Failed(ExportError::Internal {
                    message: e.to_string(),
                })
            }
        };

    match &outcome {
        ExportOutcome::Saved { .. } => counter!("madden.export.saved", 1),
        ExportOutcome::Failed(_) => counter!("madden.export.failed", 1),
        ExportOutcome::Ready | ExportOutcome::EmptyBody => {}
    }

    ok_text(outcome.message())
}

/// `/` - plain-text status page
pub(crate) async fn status_page(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> impl IntoResponse {
    debug!(
        "Status page requested from {}",
        remote_addr(connect_info.as_ref())
    );

    ok_text(format!(
        "Madden Companion Export Service is running\n\
         Send your Madden Companion App exports to this server's export endpoint\n\
         Example URL: http://your-server-ip:{}{}\n",
        state.port, state.export_path
    ))
}

/// Everything else
pub(crate) async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found\n")
}

fn ok_text(message: String) -> Response {
    (StatusCode::OK, message).into_response()
}

fn remote_addr(connect_info: Option<&ConnectInfo<SocketAddr>>) -> String {
    connect_info
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
