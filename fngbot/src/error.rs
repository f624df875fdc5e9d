//! Error types for downstream collaborator calls.
//!
//! These never reach the webhook caller. Each collaborator client converts a
//! `CollaboratorError` into its outcome status before returning.

use thiserror::Error;

/// Failure of a call to Slack, Mailchimp or SES.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status and no usable error body.
    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// The provider reported an error with a machine-readable code.
    #[error("provider error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body did not have the expected shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The call could not be attempted with the current configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CollaboratorError {
    /// Provider error code, when the provider supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            CollaboratorError::Api { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Whatever the provider sent back, if anything.
    pub fn provider_response(&self) -> &str {
        match self {
            CollaboratorError::Status { body, .. } => body,
            CollaboratorError::Api { code, .. } => code,
            _ => "",
        }
    }
}
