//! HTTP endpoint handlers.
//!
//! The webhook handler takes the raw body bytes so exactly what Slack signed
//! reaches the signature check. Configuration is loaded fresh for every
//! request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ConfigSource;
use crate::process::{handle_request, InboundRequest};
use crate::services::Services;
use crate::web::response::WebhookResponse;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigSource>,
    pub services: Services,
}

impl AppState {
    pub fn new(config: ConfigSource, services: Services) -> Self {
        Self {
            config: Arc::new(config),
            services,
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Slack webhook endpoint: slash command, block actions and view submissions.
pub async fn fngbot_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse {
    info!(body_length = body.len(), "fngbot_webhook_received");

    // Slack signs UTF-8 form bodies; anything else cannot carry a valid signature
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "fngbot_webhook_body_not_utf8");
            return WebhookResponse::empty();
        }
    };

    let config = state.config.load();
    let request = InboundRequest::new(
        body,
        headers.iter().filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        }),
    );

    let response = handle_request(&config, &state.services, &request).await;

    info!(
        status = response.status_code,
        body_length = response.body.len(),
        "fngbot_webhook_complete"
    );

    response
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/fngbot", post(fngbot_webhook))
        .route("/fngbot/", post(fngbot_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
