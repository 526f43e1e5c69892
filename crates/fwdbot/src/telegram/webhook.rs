//! Webhook ingestion server
//!
//! Endpoints:
//! - POST `WEBHOOK_PATH` - Telegram update delivery, always answered `200 OK`
//! - GET `/` and `/health` - liveness probe for the hosting platform

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use teloxide::types::Update;
use teloxide::Bot;
use tokio::net::TcpListener;

use super::bot::register_webhook;
use super::queue::UpdateQueue;
use super::shutdown_signal;
use crate::core::config;

pub const ALIVE: &str = "Bot is alive 🤖";

#[derive(Clone)]
struct WebhookState {
    queue: UpdateQueue,
}

/// Router with the ingestion route mounted on `webhook_path`.
pub fn router(queue: UpdateQueue, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(webhook_handler))
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .with_state(WebhookState { queue })
}

/// Accepts one update.
///
/// Telegram retries anything but a 2xx, so bodies that cannot be read or
/// decoded are logged and acknowledged like the rest.
async fn webhook_handler(
    State(state): State<WebhookState>,
    body: Result<Bytes, BytesRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            log::warn!("Failed to read update body: {}", e);
            return (StatusCode::OK, "OK");
        }
    };

    match serde_json::from_slice::<Update>(&body) {
        Ok(update) => {
            log::debug!("Received update {:?}", update.id);
            state.queue.submit(update).await;
        }
        Err(e) => log::warn!("Failed to decode update ({} bytes): {}", body.len(), e),
    }
    (StatusCode::OK, "OK")
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, ALIVE)
}

/// Binds the server, registers the webhook and serves until Ctrl+C.
///
/// Startup fails if Telegram rejects the webhook URL.
pub async fn run_webhook(bot: &Bot, queue: UpdateQueue, webhook_url: &str) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], *config::PORT));
    let listener = TcpListener::bind(&addr).await?;

    register_webhook(bot, webhook_url).await?;

    let app = router(queue, &config::WEBHOOK_PATH);
    log::info!("Starting webhook server on http://{}", addr);
    log::info!("  {} - Telegram updates", config::WEBHOOK_PATH.as_str());
    log::info!("  /health  - Health check (liveness)");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
