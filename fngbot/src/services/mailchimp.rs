//! Mailchimp audience subscription.
//!
//! Uses the batch subscribe endpoint (`POST /3.0/lists/{list_id}`), which
//! answers 200 even when individual members fail and lists those failures in
//! an `errors` array.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use super::{MailingList, SubscribeOutcome};
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::process::extract::ExtractedFields;

/// Error code Mailchimp returns when the address is already on the list.
pub const CONTACT_EXISTS: &str = "ERROR_CONTACT_EXISTS";

/// Batch subscribe response. Only the error list is inspected.
#[derive(Debug, Default, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    errors: Vec<MemberError>,
}

#[derive(Debug, Deserialize)]
struct MemberError {
    #[serde(default)]
    email_address: Option<String>,
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_code: String,
}

/// Mailchimp client.
#[derive(Debug, Clone)]
pub struct MailchimpClient {
    http: reqwest::Client,
}

impl MailchimpClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn subscribe(
        &self,
        config: &Config,
        fields: &ExtractedFields,
    ) -> Result<(), CollaboratorError> {
        let url = format!(
            "{}/3.0/lists/{}?skip_merge_validation=true",
            config.mailchimp_base_url(),
            config.mailchimp_list_id
        );

        let response = self
            .http
            .post(&url)
            .basic_auth("anystring", Some(&config.mailchimp_api_key))
            .json(&subscribe_body(fields))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), body_length = body.len(), "mailchimp_response");

        if !status.is_success() {
            return Err(CollaboratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BatchResponse = serde_json::from_str(&body)?;

        // Only one member is submitted, so the first error decides.
        if let Some(err) = parsed.errors.into_iter().next() {
            warn!(
                email = ?err.email_address,
                error_code = %err.error_code,
                error = %err.error,
                "mailchimp_member_error"
            );
            return Err(CollaboratorError::Api {
                code: err.error_code,
                message: err.error,
            });
        }

        Ok(())
    }
}

/// Request body for a single-member batch subscribe.
fn subscribe_body(fields: &ExtractedFields) -> serde_json::Value {
    json!({
        "members": [{
            "email_address": fields.email_address,
            "status": "subscribed",
            "email_type": "html",
            "merge_fields": {
                "FULLNAME": fields.hospital_name,
                "PHONE": fields.cell_phone,
                "F3NAME": fields.f3_name
            }
        }],
        "sync_tags": false,
        "update_existing": false
    })
}

/// Map a subscribe result to its outcome.
pub fn classify(result: &Result<(), CollaboratorError>) -> SubscribeOutcome {
    match result {
        Ok(()) => SubscribeOutcome::Success,
        Err(e) if e.code() == Some(CONTACT_EXISTS) => SubscribeOutcome::AlreadyExists,
        Err(_) => SubscribeOutcome::Failure,
    }
}

#[async_trait]
impl MailingList for MailchimpClient {
    async fn add_subscriber(&self, config: &Config, fields: &ExtractedFields) -> SubscribeOutcome {
        let result = self.subscribe(config, fields).await;

        if let Err(e) = &result {
            warn!(error = %e, "mailchimp_add_failed");
        }

        let outcome = classify(&result);
        info!(outcome = ?outcome, "mailchimp_add_complete");
        outcome
    }
}
