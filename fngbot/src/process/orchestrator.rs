//! Submission orchestration.
//!
//! Runs the three collaborator calls for a submitted form in order
//! (mailing list, invite email, welcome-channel post) and turns their outcomes
//! into the status report. A failed call never stops the later ones.

use tracing::info;

use crate::config::Config;
use crate::process::extract::ExtractedFields;
use crate::services::{InviteOutcome, Services, SubscribeOutcome};
use crate::slack::views;
use crate::web::WebhookResponse;

pub const SUBSCRIBE_SUCCESS: &str = "✅ Success adding user to the mailing list!";
pub const SUBSCRIBE_EXISTS: &str = "⚠️  Email address is already subscribed to the mailing list.";
pub const SUBSCRIBE_FAILURE: &str = "🛑 Could not add user to the mailing list.";

pub const INVITE_SUCCESS: &str = "✅ Success inviting user to Slack!";
pub const INVITE_RETRYABLE: &str = "⚠️  I couldn't invite the user to Slack, but try again later.";
pub const INVITE_FAILURE: &str = "🛑 I could not invite the user to Slack.";

pub const WELCOME_SUCCESS: &str = "✅ Notifying the welcome team!";
pub const WELCOME_FAILURE: &str = "🛑 I could not notify the welcome team.";

impl SubscribeOutcome {
    pub fn status_line(self) -> &'static str {
        match self {
            SubscribeOutcome::Success => SUBSCRIBE_SUCCESS,
            SubscribeOutcome::AlreadyExists => SUBSCRIBE_EXISTS,
            SubscribeOutcome::Failure => SUBSCRIBE_FAILURE,
        }
    }
}

impl InviteOutcome {
    pub fn status_line(self) -> &'static str {
        match self {
            InviteOutcome::Success => INVITE_SUCCESS,
            InviteOutcome::Retryable => INVITE_RETRYABLE,
            InviteOutcome::Failure => INVITE_FAILURE,
        }
    }
}

/// Status line for the welcome-channel post.
pub fn welcome_status_line(posted: bool) -> &'static str {
    if posted {
        WELCOME_SUCCESS
    } else {
        WELCOME_FAILURE
    }
}

/// Outcomes of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReport {
    pub subscribe: SubscribeOutcome,
    pub invite: InviteOutcome,
    /// Whether the welcome channel accepted the report
    pub welcomed: bool,
}

impl SubmissionReport {
    /// `view_submission` response showing the three status lines.
    pub fn into_response(self) -> WebhookResponse {
        let update = views::status_update(
            self.subscribe.status_line(),
            self.invite.status_line(),
            welcome_status_line(self.welcomed),
        );
        WebhookResponse::json(update.to_string())
    }
}

/// Message posted to the welcome channel for a new member.
pub fn welcome_message(fields: &ExtractedFields, invite_status: &str, subscribe_status: &str) -> String {
    format!(
        "Hi welcome team! A new FNG just posted.  Their contact info is:\n\
         F3 Name: {}\n\
         Hospital Name: {}\n\
         Email Address: {}\n\
         Cell Phone: {}\n\
         \n\
         Here are the results of inviting them to slack and adding them to Mailchimp:\n\
         {}\n\
         {}",
        fields.f3_name,
        fields.hospital_name,
        fields.email_address,
        fields.cell_phone,
        invite_status,
        subscribe_status
    )
}

/// Run the collaborator calls for a submission, one after another.
pub async fn run_submission(
    config: &Config,
    services: &Services,
    fields: &ExtractedFields,
) -> SubmissionReport {
    info!(email = %fields.email_address, "submission_start");

    let subscribe = services.mailing_list.add_subscriber(config, fields).await;
    info!(outcome = ?subscribe, "submission_subscribe_done");

    let invite = services
        .mailer
        .send_invite(
            config,
            &config.email_sender_address,
            &fields.email_address,
            &config.f3_region,
            &config.slack_invite_link,
        )
        .await;
    info!(outcome = ?invite, "submission_invite_done");

    let message = welcome_message(fields, invite.status_line(), subscribe.status_line());
    let welcomed = services
        .chat
        .post_message(config, &config.slack_channel_id, &message)
        .await;

    let report = SubmissionReport {
        subscribe,
        invite,
        welcomed,
    };

    info!(
        subscribe = ?report.subscribe,
        invite = ?report.invite,
        welcomed = report.welcomed,
        "submission_complete"
    );

    report
}

/// Process a submission and build the response for Slack.
pub async fn process_submission(
    config: &Config,
    services: &Services,
    fields: &ExtractedFields,
) -> WebhookResponse {
    run_submission(config, services, fields).await.into_response()
}
