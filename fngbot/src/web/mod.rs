//! Web server module for the Slack webhook.
//!
//! Slack posts slash commands, button presses and form submissions to one
//! URL. The handler verifies the request signature, hands the request to the
//! processing pipeline, and always answers 200.

pub mod handlers;
pub mod response;
pub mod signature;

pub use handlers::{create_router, fngbot_webhook, health, AppState, HealthResponse};
pub use response::WebhookResponse;
pub use signature::{expected_signature, validate_signature};
