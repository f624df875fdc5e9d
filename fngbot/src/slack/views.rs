//! Modal bodies sent to Slack.

use serde_json::{json, Value};

use crate::process::extract::FormField;

/// Request body for `views.open`: the four-field invite form.
///
/// Only the cell phone element gets a fixed action id; Slack assigns the
/// others, which is why submissions are matched by label.
pub fn invite_form(trigger_id: &str) -> Value {
    json!({
        "trigger_id": trigger_id,
        "view": {
            "title": {"type": "plain_text", "text": "FNG Bot", "emoji": true},
            "submit": {"type": "plain_text", "text": "Invite!", "emoji": true},
            "type": "modal",
            "blocks": [
                input_block(FormField::F3Name, json!({"type": "plain_text_input"})),
                input_block(FormField::HospitalName, json!({"type": "plain_text_input"})),
                input_block(FormField::EmailAddress, json!({"type": "email_text_input"})),
                input_block(
                    FormField::CellPhone,
                    json!({
                        "type": "number_input",
                        "is_decimal_allowed": false,
                        "action_id": "number_input-action"
                    })
                ),
            ]
        }
    })
}

fn input_block(field: FormField, element: Value) -> Value {
    json!({
        "type": "input",
        "element": element,
        "label": {"type": "plain_text", "text": field.label(), "emoji": false}
    })
}

/// Text of the status-report section shown after a submission.
pub fn status_report_text(subscribe: &str, invite: &str, welcome: &str) -> String {
    format!(
        "Thanks for using FNG Bot!\n*Status Report*:\n\n✅ I am a robot 🤖!\n\n {}\n\n{}\n\n{}\n\n",
        subscribe, invite, welcome
    )
}

/// `view_submission` response that swaps the form for the status report.
pub fn status_update(subscribe: &str, invite: &str, welcome: &str) -> Value {
    json!({
        "response_action": "update",
        "view": {
            "type": "modal",
            "title": {"type": "plain_text", "text": "Status"},
            "blocks": [
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": status_report_text(subscribe, invite, welcome)
                    }
                }
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_form_shape() {
        let form = invite_form("T123");
        assert_eq!(form["trigger_id"], "T123");
        assert_eq!(form["view"]["type"], "modal");
        assert_eq!(form["view"]["submit"]["text"], "Invite!");

        let labels: Vec<&str> = form["view"]["blocks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["label"]["text"].as_str().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["F3 Name", "Hospital Name", "Email Address", "Cell Phone"]
        );
        assert_eq!(form["view"]["blocks"][2]["element"]["type"], "email_text_input");
        assert_eq!(form["view"]["blocks"][3]["element"]["type"], "number_input");
    }

    #[test]
    fn test_trigger_id_is_escaped() {
        let form = invite_form(r#"T"1"#);
        let serialized = serde_json::to_string(&form).unwrap();
        let reparsed: Value = serde_json::from_str(&serialized).unwrap();
        assert_eq!(reparsed["trigger_id"], r#"T"1"#);
    }

    #[test]
    fn test_status_update() {
        let update = status_update("a", "b", "c");
        assert_eq!(update["response_action"], "update");
        assert_eq!(update["view"]["title"]["text"], "Status");
        assert_eq!(
            update["view"]["blocks"][0]["text"]["text"],
            "Thanks for using FNG Bot!\n*Status Report*:\n\n✅ I am a robot 🤖!\n\n a\n\nb\n\nc\n\n"
        );
    }
}
