//! HTTP surface.
//!
//! - `GET  /health`                 : liveness
//! - `GET  /entrypoints`            : catalog with price metadata
//! - `POST /entrypoints/:key/invoke`: body `{ "input": {...} }` -> `{ "output": ... }`

pub mod error;
pub mod state;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::core::FxError;
use crate::core::config::AppConfig;
use crate::entrypoints::{self, CATALOG};
pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/entrypoints", get(catalog))
        .route("/entrypoints/:key/invoke", post(invoke))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<()> {
    let listen = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind {listen}"))?;

    info!(%listen, upstream = %config.upstream.base_url, "fxrelay listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn catalog() -> impl IntoResponse {
    Json(&CATALOG[..])
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InvokeRequest {
    #[serde(default)]
    input: Value,
}

async fn invoke(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, FxError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        InvokeRequest::default()
    } else {
        serde_json::from_slice::<InvokeRequest>(&body)
            .map_err(|e| FxError::validation(format!("malformed request body: {e}")))?
    };

    let output = entrypoints::invoke(&key, state.provider(), request.input)
        .await
        .inspect_err(|e| warn!(%key, error = %e, "Entrypoint failed"))?;
    Ok(Json(json!({ "output": output })))
}
