//! Webhook request processing.
//!
//! ## Processing Flow
//!
//! ```text
//! InboundRequest → signature gate → classify() → form display
//!                                              → extract_fields() → run_submission()
//!                                              → unknown request
//! ```
//!
//! Every path yields a 200 [`WebhookResponse`]; failures are reported in the
//! body, never as a transport error.

pub mod classify;
pub mod extract;
pub mod orchestrator;

use serde_json::json;
use tracing::{info, warn};

use crate::config::Config;
use crate::services::Services;
use crate::web::signature::{validate_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::web::WebhookResponse;

pub use classify::{classify, InboundRequest, Route};
pub use extract::{extract_fields, ExtractedFields, FormField};
pub use orchestrator::{process_submission, run_submission, SubmissionReport};

/// Handle one webhook request end to end.
pub async fn handle_request(
    config: &Config,
    services: &Services,
    request: &InboundRequest,
) -> WebhookResponse {
    let signature = request.header(SIGNATURE_HEADER).unwrap_or_default();
    let timestamp = request.header(TIMESTAMP_HEADER).unwrap_or_default();

    if !validate_signature(&config.slack_signing_secret, &request.body, signature, timestamp) {
        warn!("request_rejected_signature");
        return WebhookResponse::empty();
    }

    match classify(request) {
        Route::Submission(submission) => {
            info!(route = "submission", "request_routed");
            let fields = extract_fields(&submission.view);
            process_submission(config, services, &fields).await
        }
        Route::FormDisplay(trigger_id) => {
            info!(route = "form_display", trigger_id = %trigger_id, "request_routed");
            display_form(config, services, &trigger_id).await
        }
        Route::Rejected => {
            warn!(route = "rejected", "request_routed");
            WebhookResponse::empty()
        }
        Route::Unknown => {
            info!(route = "unknown", "request_routed");
            WebhookResponse::unknown_request()
        }
    }
}

/// Open the invite form. Failures are reported in the body.
pub async fn display_form(config: &Config, services: &Services, trigger_id: &str) -> WebhookResponse {
    match services.chat.open_form(config, trigger_id).await {
        Ok(()) => WebhookResponse::empty(),
        Err(e) => {
            warn!(error = %e, trigger_id = %trigger_id, "form_open_failed");
            let body = json!({
                "Status": "Error invoking form!",
                "Response": e.provider_response(),
                "error": e.to_string(),
            });
            WebhookResponse::json(body.to_string())
        }
    }
}
