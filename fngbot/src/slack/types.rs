//! Slack interaction payload types.
//!
//! The `payload` form field carries a JSON document whose `type` decides its
//! shape. Decoding first reads that discriminant and only then decodes the
//! typed structure for the variant, so nothing downstream works with loose maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Discriminant for a submitted modal.
pub const VIEW_SUBMISSION: &str = "view_submission";

/// Discriminant for a button press (e.g. on the app home tab).
pub const BLOCK_ACTIONS: &str = "block_actions";

/// Decoded interaction payload.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPayload {
    /// The user submitted the invite form
    ViewSubmission(ViewSubmission),
    /// The user pressed a button that should open the form
    BlockActions(BlockActions),
    /// Invalid JSON, or a `type` this bot does not handle
    Unrecognized,
}

impl InteractionPayload {
    /// Decode the raw `payload` field. Never fails.
    pub fn decode(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, payload_length = raw.len(), "payload_json_invalid");
                return InteractionPayload::Unrecognized;
            }
        };

        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);

        match kind.as_deref() {
            Some(VIEW_SUBMISSION) => {
                // A malformed view still counts as a submission; extraction
                // then simply finds nothing.
                let submission: ViewSubmission = serde_json::from_value(value).unwrap_or_else(|e| {
                    warn!(error = %e, "view_submission_decode_failed");
                    ViewSubmission::default()
                });
                InteractionPayload::ViewSubmission(submission)
            }
            Some(BLOCK_ACTIONS) => InteractionPayload::BlockActions(BlockActions {
                trigger_id: value
                    .get("trigger_id")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            other => {
                debug!(payload_type = ?other, "payload_type_unrecognized");
                InteractionPayload::Unrecognized
            }
        }
    }
}

/// `block_actions` payload. Only the trigger id matters here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockActions {
    /// `None` when absent or not a string
    pub trigger_id: Option<String>,
}

/// `view_submission` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSubmission {
    #[serde(default)]
    pub trigger_id: Option<String>,
    #[serde(default)]
    pub view: SubmissionView,
}

/// The submitted modal: its block layout plus the values the user entered.
///
/// `blocks` and `state` are parallel structures linked only by action id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionView {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub state: ViewState,
}

/// One block of the modal layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub block_id: Option<String>,
    /// Input blocks carry a label; section and divider blocks do not
    #[serde(default)]
    pub label: Option<Label>,
    #[serde(default)]
    pub element: Option<Element>,
}

impl Block {
    /// Input block with a label and an element action id.
    pub fn input(label: &str, action_id: &str) -> Self {
        Self {
            block_id: None,
            label: Some(Label {
                text: label.to_string(),
            }),
            element: Some(Element {
                action_id: Some(action_id.to_string()),
            }),
        }
    }

    /// The element's action id, if any.
    pub fn action_id(&self) -> Option<&str> {
        self.element.as_ref()?.action_id.as_deref()
    }

    /// The label caption, if any.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.text.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub action_id: Option<String>,
}

/// Submitted values: block grouping key → action id → entered value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub values: BTreeMap<String, BTreeMap<String, StateValue>>,
}

/// A single entered value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateValue {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl StateValue {
    pub fn new(value: &str) -> Self {
        Self {
            kind: None,
            value: Some(value.to_string()),
        }
    }
}
