/// In-memory mailer
///
/// Keeps every message it is asked to send. Used by the `memory` transport
/// and by tests that assert on outgoing mail.

use super::{MailError, Mailer, OutgoingEmail};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tracing::info;

#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages sent so far
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last message sent to `address`
    pub fn last_to(&self, address: &str) -> Option<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|email| email.to == address)
            .cloned()
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "Email captured (memory transport)");
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email);
        Ok(())
    }
}
