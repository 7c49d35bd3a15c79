//! Gateway HTTP server: POST /webhook and GET / health.

use crate::classify::ClassifyPolicy;
use crate::config::{self, Config};
use crate::dispatch;
use crate::line::{self, LineClient};
use crate::translate::MyMemoryClient;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

const SIGNATURE_HEADER: &str = "x-line-signature";

/// Shared state for the gateway: config and the outbound clients. Built once
/// at startup and never mutated afterwards, so handlers share it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Channel secret for webhook signature verification. None disables
    /// verification (local development only).
    pub channel_secret: Option<String>,
    pub line: Arc<LineClient>,
    pub translator: Arc<MyMemoryClient>,
    pub policy: ClassifyPolicy,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let channel_secret = config::resolve_channel_secret(&config);
        let access_token = config::resolve_channel_access_token(&config);
        let line = LineClient::new(config.channels.line.api_base.clone(), access_token);
        let translator = MyMemoryClient::new(config.translate.endpoint.clone());
        let policy = config.translate.policy;
        Self {
            config: Arc::new(config),
            channel_secret,
            line: Arc::new(line),
            translator: Arc::new(translator),
            policy,
        }
    }
}

/// Language pairs served by the active policy (reported by the health
/// endpoint; informational only).
fn language_pairs(policy: ClassifyPolicy) -> Vec<&'static str> {
    match policy {
        ClassifyPolicy::BinaryEnTh => vec!["en-th", "th-en"],
        ClassifyPolicy::ThreeWayThMyEn => vec!["th-my", "my-th", "en-th"],
    }
}

/// Run the gateway; binds to config.gateway.bind:config.gateway.port.
/// Blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn run_gateway(config: Config) -> Result<()> {
    if config::resolve_channel_secret(&config).is_none() {
        log::warn!("no channel secret configured; webhook signatures will not be verified");
    }
    let state = AppState::from_config(config);
    let bind_addr = format!(
        "{}:{}",
        state.config.gateway.bind, state.config.gateway.port
    );

    let app = Router::new()
        .route("/", get(health))
        .route("/webhook", post(webhook))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes and uptime checks).
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "service": "lintra translation relay",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "languagePairs": language_pairs(state.policy),
    }))
}

/// POST /webhook — verifies x-line-signature over the raw body, validates
/// the events array, and dispatches every event concurrently. The only
/// all-or-nothing failure boundary is "is this a valid batch of events":
/// per-event failures become null results, and anything unexpected maps to a
/// generic 500 so internal detail never reaches the platform.
async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    if let Some(ref secret) = state.channel_secret {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !line::signature::verify(secret, provided, &body) {
            log::warn!("webhook rejected: signature mismatch");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "invalid signature" })),
            )
                .into_response();
        }
    }

    match handle_webhook(&state, &body).await {
        Ok(response) => response,
        Err(e) => {
            log::error!("webhook error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal server error" })),
            )
                .into_response()
        }
    }
}

async fn handle_webhook(state: &AppState, body: &[u8]) -> Result<Response> {
    let payload: serde_json::Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return Ok(invalid_events_response()),
    };
    let Some(events) = payload.get("events").and_then(|v| v.as_array()) else {
        return Ok(invalid_events_response());
    };

    let results = dispatch::process_batch(
        state.policy,
        state.translator.as_ref(),
        state.line.as_ref(),
        events,
    )
    .await;
    let results = serde_json::to_value(results).context("serializing batch results")?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "results": results }))).into_response())
}

fn invalid_events_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid events format" })),
    )
        .into_response()
}
