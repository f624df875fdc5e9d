//! Slack-facing pieces: interaction payload decoding, modal bodies, and the
//! Web API client.

pub mod client;
pub mod types;
pub mod views;

pub use client::SlackClient;
pub use types::{
    Block, BlockActions, InteractionPayload, StateValue, SubmissionView, ViewState,
    ViewSubmission,
};
