//! Downstream collaborators: mailing list, invite email, and Slack.
//!
//! Each collaborator is a trait so the request pipeline can run against
//! in-memory fakes. Calls take the per-invocation [`Config`] by reference;
//! implementations hold nothing but an HTTP client.

pub mod mailchimp;
pub mod ses;
pub mod sigv4;

#[cfg(test)]
pub(crate) mod fakes;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::CollaboratorError;
use crate::process::extract::ExtractedFields;
use crate::slack::SlackClient;

pub use mailchimp::MailchimpClient;
pub use ses::SesMailer;

/// Result of adding a subscriber to the mailing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Success,
    AlreadyExists,
    Failure,
}

/// Result of sending the invite email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InviteOutcome {
    Success,
    Retryable,
    Failure,
}

/// Mailing-list provider.
#[async_trait]
pub trait MailingList: Send + Sync {
    async fn add_subscriber(&self, config: &Config, fields: &ExtractedFields) -> SubscribeOutcome;
}

/// Transactional email provider used for the workspace invite.
#[async_trait]
pub trait InviteMailer: Send + Sync {
    async fn send_invite(
        &self,
        config: &Config,
        from: &str,
        to: &str,
        region: &str,
        link: &str,
    ) -> InviteOutcome;
}

/// Chat platform operations.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Render the invite form for a trigger id.
    async fn open_form(&self, config: &Config, trigger_id: &str) -> Result<(), CollaboratorError>;

    /// Post a plain-text message to a channel. Returns whether it was accepted.
    async fn post_message(&self, config: &Config, channel: &str, text: &str) -> bool;
}

/// The set of collaborators one request may call.
#[derive(Clone)]
pub struct Services {
    pub mailing_list: Arc<dyn MailingList>,
    pub mailer: Arc<dyn InviteMailer>,
    pub chat: Arc<dyn ChatPlatform>,
}

impl Services {
    /// Production collaborators sharing one HTTP client.
    pub fn live(http: reqwest::Client) -> Self {
        Self {
            mailing_list: Arc::new(MailchimpClient::new(http.clone())),
            mailer: Arc::new(SesMailer::new(http.clone())),
            chat: Arc::new(SlackClient::new(http)),
        }
    }
}
