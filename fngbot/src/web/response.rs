//! Response envelope returned to the webhook caller.
//!
//! Slack treats any non-200 (or slow) response as a failed delivery and
//! retries with the same payload, so every path answers 200 and reports
//! problems inside the body.

use std::collections::BTreeMap;

use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::warn;

/// Body returned for requests that match no known interaction type.
pub const UNKNOWN_REQUEST_BODY: &str = r#"{"Status":"Unknown Request","error": "<null>"}"#;

/// Status code, headers and body of a webhook response.
///
/// Serializes to the function-runtime envelope (`statusCode`, `headers`, `body`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl WebhookResponse {
    /// 200 with an empty body and no headers.
    pub fn empty() -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// 200 with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: body.into(),
        }
    }

    /// The fixed diagnostic response for unclassifiable requests.
    pub fn unknown_request() -> Self {
        Self::json(UNKNOWN_REQUEST_BODY)
    }
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        let mut response = (status, self.body).into_response();

        for (name, value) in &self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => warn!(header = %name, "response_header_invalid"),
            }
        }

        response
    }
}
