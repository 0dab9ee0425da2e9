/// Outgoing email
///
/// Handlers build an [`OutgoingEmail`] from one of the [`templates`] and hand
/// it to the configured [`Mailer`]. Sending is synchronous with the request:
/// callers decide whether a failure is fatal.
///
/// # Transports
///
/// - [`LettreMailer`]: SMTP with STARTTLS, or a file spool for development
/// - [`MemoryMailer`]: keeps messages in memory (tests, local runs)
///
/// # Example
///
/// ```
/// use hirepath_shared::mail::{Mailer, MemoryMailer, OutgoingEmail};
///
/// # async fn example() -> Result<(), hirepath_shared::mail::MailError> {
/// let mailer = MemoryMailer::new();
/// mailer
///     .send(OutgoingEmail::html("ada@example.com", "Welcome", "<p>Hi</p>"))
///     .await?;
/// assert_eq!(mailer.sent().len(), 1);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod smtp;
pub mod templates;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryMailer;
pub use smtp::{LettreMailer, SmtpSettings};

/// Mail delivery errors
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to deliver message: {0}")]
    Transport(String),

    #[error("Mail transport setup failed: {0}")]
    Setup(String),
}

/// File attached to an email
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// A ready-to-send HTML email
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

impl OutgoingEmail {
    pub fn html(to: impl Into<String>, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html_body: html_body.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// Delivers emails
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}
