/// lettre-backed mailer
///
/// SMTP uses STARTTLS with username/password credentials. The file transport
/// writes each message as an `.eml` file into a spool directory, which is
/// handy for local development.

use super::{MailError, Mailer, OutgoingEmail};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;
use tracing::debug;

/// SMTP relay settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    File(AsyncFileTransport<Tokio1Executor>),
}

pub struct LettreMailer {
    transport: Transport,
    from: Mailbox,
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

impl LettreMailer {
    /// Builds an SMTP mailer (STARTTLS relay)
    pub fn smtp(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MailError::Setup(format!("create SMTP transport: {e}")))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self {
            transport: Transport::Smtp(transport),
            from: parse_mailbox(from)?,
        })
    }

    /// Builds a mailer that writes messages into `dir`
    pub fn file(dir: impl AsRef<Path>, from: &str) -> Result<Self, MailError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| MailError::Setup(format!("create mail spool {}: {e}", dir.display())))?;
        }

        Ok(Self {
            transport: Transport::File(AsyncFileTransport::<Tokio1Executor>::new(dir)),
            from: parse_mailbox(from)?,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.clone());

        let result = if email.attachments.is_empty() {
            builder
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone())
        } else {
            let mut parts = MultiPart::mixed().singlepart(SinglePart::html(email.html_body.clone()));
            for attachment in &email.attachments {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| MailError::Build(format!("content type {}: {e}", attachment.content_type)))?;
                parts = parts.singlepart(
                    MailAttachment::new(attachment.filename.clone())
                        .body(attachment.bytes.to_vec(), content_type),
                );
            }
            builder.multipart(parts)
        };

        result.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for LettreMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(&email)?;

        match &self.transport {
            Transport::Smtp(smtp) => {
                smtp.send(message)
                    .await
                    .map_err(|e| MailError::Transport(format!("SMTP: {e}")))?;
            }
            Transport::File(file) => {
                file.send(message)
                    .await
                    .map_err(|e| MailError::Transport(format!("file spool: {e}")))?;
            }
        }

        debug!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::Attachment;
    use bytes::Bytes;

    fn spool_dir() -> std::path::PathBuf {
        std::env::temp_dir().join(format!("hirepath-mail-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_invalid_from_address() {
        let result = LettreMailer::file(spool_dir(), "not an address");
        assert!(matches!(result, Err(MailError::InvalidAddress { .. })));
    }

    #[test]
    fn test_build_message_with_attachment() {
        let mailer = LettreMailer::file(spool_dir(), "HirePath <noreply@hirepath.test>").unwrap();
        let email = OutgoingEmail::html("admin@hirepath.test", "New document", "<p>Review</p>")
            .with_attachment(Attachment {
                filename: "passport.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: Bytes::from_static(b"%PDF-1.4"),
            });

        let message = mailer.build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("passport.pdf"));
    }

    #[tokio::test]
    async fn test_file_transport_writes_message() {
        let dir = spool_dir();
        let mailer = LettreMailer::file(&dir, "noreply@hirepath.test").unwrap();

        mailer
            .send(OutgoingEmail::html("ada@example.com", "Welcome", "<p>Hi</p>"))
            .await
            .unwrap();

        let written = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(written, 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
