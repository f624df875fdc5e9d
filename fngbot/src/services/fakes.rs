//! In-memory collaborators for unit tests.
//!
//! `tests/common/mod.rs` carries the same `Fake`/`Calls` pair for the router
//! tests; keep the two in step.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{ChatPlatform, InviteMailer, InviteOutcome, MailingList, Services, SubscribeOutcome};
use crate::config::Config;
use crate::error::CollaboratorError;
use crate::process::extract::ExtractedFields;

#[derive(Default)]
pub struct Calls {
    pub subscribe: AtomicUsize,
    pub invite: AtomicUsize,
    pub open_form: AtomicUsize,
    pub post_message: AtomicUsize,
    pub log: Mutex<Vec<String>>,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.subscribe.load(Ordering::SeqCst)
            + self.invite.load(Ordering::SeqCst)
            + self.open_form.load(Ordering::SeqCst)
            + self.post_message.load(Ordering::SeqCst)
    }

    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

pub struct Fake {
    pub calls: Arc<Calls>,
    pub subscribe: SubscribeOutcome,
    pub invite: InviteOutcome,
    pub open_form_error: Option<String>,
    pub post_ok: bool,
}

impl Default for Fake {
    fn default() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            subscribe: SubscribeOutcome::Success,
            invite: InviteOutcome::Success,
            open_form_error: None,
            post_ok: true,
        }
    }
}

impl Fake {
    pub fn into_services(self) -> (Services, Arc<Calls>) {
        let calls = Arc::clone(&self.calls);
        let fake = Arc::new(self);
        let services = Services {
            mailing_list: fake.clone(),
            mailer: fake.clone(),
            chat: fake,
        };
        (services, calls)
    }
}

#[async_trait]
impl MailingList for Fake {
    async fn add_subscriber(&self, _config: &Config, fields: &ExtractedFields) -> SubscribeOutcome {
        self.calls.subscribe.fetch_add(1, Ordering::SeqCst);
        self.calls.record(format!(
            "subscribe:{}|{}|{}|{}",
            fields.f3_name, fields.hospital_name, fields.email_address, fields.cell_phone
        ));
        self.subscribe
    }
}

#[async_trait]
impl InviteMailer for Fake {
    async fn send_invite(
        &self,
        _config: &Config,
        from: &str,
        to: &str,
        region: &str,
        link: &str,
    ) -> InviteOutcome {
        self.calls.invite.fetch_add(1, Ordering::SeqCst);
        self.calls
            .record(format!("invite:{}:{}:{}:{}", from, to, region, link));
        self.invite
    }
}

#[async_trait]
impl ChatPlatform for Fake {
    async fn open_form(&self, _config: &Config, trigger_id: &str) -> Result<(), CollaboratorError> {
        self.calls.open_form.fetch_add(1, Ordering::SeqCst);
        self.calls.record(format!("open_form:{}", trigger_id));
        match &self.open_form_error {
            Some(code) => Err(CollaboratorError::Api {
                code: code.clone(),
                message: "views.open failed".to_string(),
            }),
            None => Ok(()),
        }
    }

    async fn post_message(&self, _config: &Config, channel: &str, text: &str) -> bool {
        self.calls.post_message.fetch_add(1, Ordering::SeqCst);
        self.calls.record(format!("post:{}:{}", channel, text));
        self.post_ok
    }
}
