//! Request classification.
//!
//! Slack sends the slash command, the home-tab button press, and the form
//! submission to the same URL, so the route is decided from the body:
//!
//! 1. `payload` with `type = view_submission` → submission handling
//! 2. `payload` with `type = block_actions` → open the form with the trigger id
//!    inside the payload
//! 3. no `payload`, top-level `trigger_id` (slash command) → open the form
//!    with that id
//! 4. anything else → unknown request
//!
//! A non-empty `payload` decides the route on its own: when it is malformed or
//! of another type, a top-level `trigger_id` is ignored.

use std::collections::HashMap;

use tracing::debug;

use crate::slack::{InteractionPayload, ViewSubmission};

/// Headers and form fields of one inbound webhook request.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    /// Raw body, exactly as received
    pub body: String,
    /// Header name (lower-case) → value
    pub headers: HashMap<String, String>,
    /// Decoded top-level form fields
    pub form: HashMap<String, String>,
}

impl InboundRequest {
    /// Build a request from a raw form-encoded body and its headers.
    pub fn new(body: String, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        let form = parse_form(&body);
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();

        Self {
            body,
            headers,
            form,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Non-empty form field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Decode an `application/x-www-form-urlencoded` body. Later keys win.
pub fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

/// Where a request goes after the signature check.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Process a submitted form
    Submission(ViewSubmission),
    /// Open the form for this trigger id
    FormDisplay(String),
    /// A `block_actions` payload without a usable trigger id
    Rejected,
    /// Nothing recognizable
    Unknown,
}

/// Decide the route for a request. Total: every input maps to one route.
pub fn classify(request: &InboundRequest) -> Route {
    if let Some(raw) = request.field("payload") {
        match InteractionPayload::decode(raw) {
            InteractionPayload::ViewSubmission(submission) => {
                debug!("route_view_submission");
                return Route::Submission(submission);
            }
            InteractionPayload::BlockActions(actions) => {
                return match actions.trigger_id {
                    Some(trigger_id) => {
                        debug!(trigger_id = %trigger_id, "route_block_actions");
                        Route::FormDisplay(trigger_id)
                    }
                    None => {
                        debug!("route_block_actions_without_trigger");
                        Route::Rejected
                    }
                };
            }
            InteractionPayload::Unrecognized => {
                debug!("route_payload_unrecognized");
                return Route::Unknown;
            }
        }
    }

    if let Some(trigger_id) = request.field("trigger_id") {
        debug!(trigger_id = %trigger_id, "route_slash_command");
        return Route::FormDisplay(trigger_id.to_string());
    }

    debug!(request_type = ?request.field("type"), "route_unknown");
    Route::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> InboundRequest {
        InboundRequest::new(body.to_string(), Vec::new())
    }

    fn encode(payload: &str) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("payload", payload)
            .finish()
    }

    #[test]
    fn test_parse_form_decodes_values() {
        let form = parse_form("command=%2Ftestinvoke&text=&trigger_id=5643.1660.e4ad&user_name=marcus+b");
        assert_eq!(form.get("command").map(String::as_str), Some("/testinvoke"));
        assert_eq!(form.get("text").map(String::as_str), Some(""));
        assert_eq!(form.get("trigger_id").map(String::as_str), Some("5643.1660.e4ad"));
        assert_eq!(form.get("user_name").map(String::as_str), Some("marcus b"));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = InboundRequest::new(
            String::new(),
            vec![("X-Slack-Signature".to_string(), "v0=abc".to_string())],
        );
        assert_eq!(req.header("x-slack-signature"), Some("v0=abc"));
        assert_eq!(req.header("X-SLACK-SIGNATURE"), Some("v0=abc"));
        assert_eq!(req.header("X-Slack-Request-Timestamp"), None);
    }

    #[test]
    fn test_slash_command_routes_to_form_display() {
        let route = classify(&request("command=%2Ffng&trigger_id=T1"));
        assert_eq!(route, Route::FormDisplay("T1".to_string()));
    }

    #[test]
    fn test_view_submission() {
        let body = encode(r#"{"type":"view_submission","view":{"blocks":[],"state":{"values":{}}}}"#);
        match classify(&request(&body)) {
            Route::Submission(submission) => assert!(submission.view.blocks.is_empty()),
            other => panic!("Expected Submission, got {:?}", other),
        }
    }

    #[test]
    fn test_block_actions_uses_inner_trigger_id() {
        let body = format!(
            "{}&trigger_id=OUTER",
            encode(r#"{"type":"block_actions","trigger_id":"INNER"}"#)
        );
        assert_eq!(
            classify(&request(&body)),
            Route::FormDisplay("INNER".to_string())
        );
    }

    #[test]
    fn test_block_actions_without_string_trigger_is_rejected() {
        let body = encode(r#"{"type":"block_actions","trigger_id":42}"#);
        assert_eq!(classify(&request(&body)), Route::Rejected);

        let body = encode(r#"{"type":"block_actions"}"#);
        assert_eq!(classify(&request(&body)), Route::Rejected);
    }

    #[test]
    fn test_payload_takes_precedence_over_trigger_id() {
        let body = format!(
            "trigger_id=T1&{}",
            encode(r#"{"type":"view_submission"}"#)
        );
        assert!(matches!(classify(&request(&body)), Route::Submission(_)));
    }

    #[test]
    fn test_unrecognized_payload_ignores_trigger_id() {
        let body = format!("{}&trigger_id=T1", encode("{not json"));
        assert_eq!(classify(&request(&body)), Route::Unknown);

        let body = format!("{}&trigger_id=T1", encode(r#"{"type":"shortcut"}"#));
        assert_eq!(classify(&request(&body)), Route::Unknown);
    }

    #[test]
    fn test_empty_payload_falls_through_to_trigger_id() {
        assert_eq!(
            classify(&request("payload=&trigger_id=T1")),
            Route::FormDisplay("T1".to_string())
        );
    }

    #[test]
    fn test_unknown_requests() {
        assert_eq!(classify(&request("")), Route::Unknown);
        assert_eq!(classify(&request("type=event_callback")), Route::Unknown);
        assert_eq!(classify(&request("trigger_id=")), Route::Unknown);
        assert_eq!(classify(&request(&encode(r#"{"type":"shortcut"}"#))), Route::Unknown);
        assert_eq!(classify(&request("payload=%7B%7D")), Route::Unknown);
    }
}
