//! FNG Bot - Slack onboarding webhook.
//!
//! A slash command or home-tab button opens an invite form; submitting it adds
//! the new member to the Mailchimp list, emails them the Slack invite link
//! through SES, and posts a report to the welcome channel.
//!
//! ## Architecture
//!
//! ```text
//! Slack → Web Server → signature check → classify → open form
//!                                                 → extract → Mailchimp, SES, Slack
//! ```

pub mod config;
pub mod error;
pub mod process;
pub mod services;
pub mod slack;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigSource};
pub use error::CollaboratorError;
pub use process::{handle_request, ExtractedFields, InboundRequest, Route};
pub use services::{InviteOutcome, Services, SubscribeOutcome};
pub use web::{create_router, AppState, WebhookResponse};
