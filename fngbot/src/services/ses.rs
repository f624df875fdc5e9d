//! Invite emails through the Amazon SES v2 REST API.
//!
//! Calls `POST /v2/email/outbound-emails` directly with reqwest and a
//! SigV4-signed request. SES reports failures as JSON with the error type in
//! the `x-amzn-ErrorType` header.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use super::sigv4::AwsV4Signer;
use super::{InviteMailer, InviteOutcome};
use crate::config::Config;
use crate::error::CollaboratorError;

const SEND_EMAIL_PATH: &str = "/v2/email/outbound-emails";

/// SES error types that clear up on their own or after account changes.
const RETRYABLE_ERRORS: &[&str] = &[
    "TooManyRequestsException",
    "LimitExceededException",
    "SendingPausedException",
    "AccountSendingPausedException",
    "ConfigurationSetSendingPausedException",
    "MailFromDomainNotVerifiedException",
    "ConfigurationSetDoesNotExistException",
];

/// JSON error body. The type may also appear here instead of the header.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "__type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// SES-backed invite mailer.
#[derive(Debug, Clone)]
pub struct SesMailer {
    http: reqwest::Client,
}

impl SesMailer {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn send(
        &self,
        config: &Config,
        from: &str,
        to: &str,
        region: &str,
        link: &str,
    ) -> Result<(), CollaboratorError> {
        let target = SigningTarget::for_endpoint(&config.ses_base_url())?;
        let body = invite_email_body(from, to, region, link).to_string();

        let signer = AwsV4Signer::new(&config.aws, &config.ses_region, "ses");
        let signed = signer.sign_request("POST", &target.host, &target.path, &body, &Utc::now());

        let mut request = self
            .http
            .post(target.url)
            .header("Content-Type", "application/json")
            .body(body);
        for (key, value) in signed {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        let status = response.status();
        let header_type = response
            .headers()
            .get("x-amzn-ErrorType")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = response.text().await?;

        if status.is_success() {
            return Ok(());
        }

        let error_body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = header_type
            .or(error_body.error_type)
            .or(error_body.code)
            .map(|c| normalize_error_type(&c));

        match code {
            Some(code) => Err(CollaboratorError::Api {
                code,
                message: error_body.message.unwrap_or(text),
            }),
            None => Err(CollaboratorError::Status {
                status: status.as_u16(),
                body: text,
            }),
        }
    }
}

/// Where the send request goes, and the host and path it is signed for.
#[derive(Debug)]
struct SigningTarget {
    url: Url,
    /// Host with an explicit port, as sent in the `Host` header
    host: String,
    /// Full request path, including any prefix from an endpoint override
    path: String,
}

impl SigningTarget {
    fn for_endpoint(base: &str) -> Result<Self, CollaboratorError> {
        let raw = format!("{}{}", base, SEND_EMAIL_PATH);
        let url = Url::parse(&raw).map_err(|e| CollaboratorError::Config(e.to_string()))?;
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(CollaboratorError::Config(format!(
                    "SES endpoint has no host: {}",
                    raw
                )))
            }
        };
        let path = url.path().to_string();

        Ok(Self { url, host, path })
    }
}

/// Strip the namespace prefix and URL suffix SES may attach to an error type,
/// e.g. `com.amazonaws.ses#TooManyRequestsException:http://...`.
fn normalize_error_type(raw: &str) -> String {
    let without_suffix = raw.split(':').next().unwrap_or(raw);
    without_suffix
        .rsplit('#')
        .next()
        .unwrap_or(without_suffix)
        .trim()
        .to_string()
}

/// `SendEmail` request body for the invite.
fn invite_email_body(from: &str, to: &str, region: &str, link: &str) -> serde_json::Value {
    json!({
        "FromEmailAddress": from,
        "Destination": {"ToAddresses": [to]},
        "Content": {
            "Simple": {
                "Subject": {"Data": format!("Please join {} on Slack!", region), "Charset": "UTF-8"},
                "Body": {
                    "Html": {
                        "Data": format!(
                            "Hi! Please join {} on Slack by clicking this <a href=\"{}\">link</a>.",
                            region, link
                        ),
                        "Charset": "UTF-8"
                    },
                    "Text": {
                        "Data": format!(
                            "Hi! Please join {} on Slack by clicking this link: {}",
                            region, link
                        ),
                        "Charset": "UTF-8"
                    }
                }
            }
        }
    })
}

/// Map a send result to its outcome.
///
/// Failures without a provider code (network trouble, unparseable replies)
/// are worth another try; provider errors are retryable only when listed.
pub fn classify(result: &Result<(), CollaboratorError>) -> InviteOutcome {
    match result {
        Ok(()) => InviteOutcome::Success,
        Err(CollaboratorError::Api { code, .. }) if RETRYABLE_ERRORS.contains(&code.as_str()) => {
            InviteOutcome::Retryable
        }
        Err(CollaboratorError::Api { .. }) | Err(CollaboratorError::Config(_)) => {
            InviteOutcome::Failure
        }
        Err(_) => InviteOutcome::Retryable,
    }
}

#[async_trait]
impl InviteMailer for SesMailer {
    async fn send_invite(
        &self,
        config: &Config,
        from: &str,
        to: &str,
        region: &str,
        link: &str,
    ) -> InviteOutcome {
        let result = self.send(config, from, to, region, link).await;

        if let Err(e) = &result {
            warn!(error = %e, to = %to, "ses_send_failed");
        }

        let outcome = classify(&result);
        info!(outcome = ?outcome, to = %to, "ses_send_complete");
        outcome
    }
}
