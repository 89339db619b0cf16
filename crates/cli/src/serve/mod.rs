//! `sts serve` -- in-memory checklist proxy for local development and tests.
//!
//! Serves the same endpoints the client talks to, on `axum` + `tokio`.
//! Records live only as long as the process.
//!
//! Endpoints:
//! - GET  /health
//! - GET  /api/sts-proxy/{slug}?operationRef=<ref>   - Read one record
//! - POST /api/sts-proxy/{slug}/create               - Create (multipart field `data`)
//! - PUT  /api/sts-proxy/{slug}?operationRef=<ref>   - Replace (multipart field `data`)
//! - GET  /api/sts-proxy/{slug}/list?year=<yyyy>     - Records created in a year
//!
//! Errors use `{"success": false, "message": ...}` bodies.

mod handlers;
mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use self::handlers::{
    handle_create, handle_health, handle_list, handle_not_found, handle_read, handle_update,
};
use self::state::{AppState, Store};

/// Maximum request body size: 10 MB. Signature images travel inline.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(serde_json::json!({ "success": false, "message": message })),
    )
}

pub(crate) fn router() -> Router {
    let state = Arc::new(AppState {
        store: RwLock::new(Store::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/api/sts-proxy/{slug}",
            get(handle_read).put(handle_update),
        )
        .route(
            "/api/sts-proxy/{slug}/create",
            axum::routing::post(handle_create),
        )
        .route("/api/sts-proxy/{slug}/list", get(handle_list))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the stub proxy on `127.0.0.1:<port>` and run until Ctrl+C.
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "checklist proxy listening on http://{}/api/sts-proxy", addr);

    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
