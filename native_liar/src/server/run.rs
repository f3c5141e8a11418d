// Run and routing helpers (build_router, run_server).

use std::net::SocketAddr;

use axum::{response::IntoResponse, routing::get, routing::post, Json, Router};

use anyhow::{Context, Result};

use super::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "ok": true })) }),
        )
        // WebSocket endpoint for interactive clients
        .route("/ws", get(super::ws::ws_handler))
        // HTTP API endpoint using the same ClientMsg/ServerMsg payloads
        .route("/api/message", post(super::http::message_handler))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> impl IntoResponse {
    (
        axum::http::StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "no such route" })),
    )
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);

    let display_addr = if addr.ip().to_string() == "127.0.0.1" {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    };
    tracing::info!(display_addr = %display_addr, "Liar Game server running");
    tracing::info!("connect with: liar-cli --transport ws://{}/ws watch", display_addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .await
        .context("serving HTTP/WebSocket traffic")?;
    Ok(())
}
