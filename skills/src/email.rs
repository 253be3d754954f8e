//! Plain-text email over SMTP (STARTTLS + login).

use std::fmt::Display;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::config::SmtpConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("missing smtp configuration: {0}")]
    MissingConfig(String),

    #[error("invalid email address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("failed to configure smtp relay '{host}': {reason}")]
    Relay { host: String, reason: String },

    #[error("failed to send email to '{to}': {reason}")]
    Delivery { to: String, reason: String },
}

/// Confirmation returned to the agent after a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailReceipt {
    pub status: String,
    pub to: String,
    pub subject: String,
}

/// Sends emails through any lettre [`Transport`].
pub struct EmailSender<T> {
    from: Mailbox,
    transport: T,
}

impl EmailSender<SmtpTransport> {
    /// Build an SMTP sender (STARTTLS on `config.port`, authenticated).
    pub fn connect(config: &SmtpConfig) -> Result<Self, EmailError> {
        let transport = SmtpTransport::starttls_relay(&config.host)
            .map_err(|err| EmailError::Relay {
                host: config.host.clone(),
                reason: err.to_string(),
            })?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();
        Self::with_transport(&config.from, transport)
    }
}

impl<T> EmailSender<T>
where
    T: Transport,
    T::Error: Display,
{
    pub fn with_transport(from: &str, transport: T) -> Result<Self, EmailError> {
        Ok(Self {
            from: parse_mailbox(from)?,
            transport,
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[instrument(skip_all, fields(to))]
    pub fn send(&self, to: &str, subject: &str, body: &str) -> Result<EmailReceipt, EmailError> {
        let recipient = parse_mailbox(to)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        if let Err(err) = self.transport.send(&message) {
            error!(to, err = %err, "email delivery failed");
            return Err(EmailError::Delivery {
                to: to.to_string(),
                reason: err.to_string(),
            });
        }

        info!(to, "email sent");
        Ok(EmailReceipt {
            status: "success".to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .trim()
        .parse()
        .map_err(|err: lettre::address::AddressError| EmailError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;

    #[test]
    fn send_delivers_plain_text_message() {
        let sender = EmailSender::with_transport("bot@example.com", RecordingTransport::default())
            .expect("sender");
        let receipt = sender
            .send("ana@example.com", "Status report", "All systems nominal.")
            .expect("send");
        assert_eq!(
            receipt,
            EmailReceipt {
                status: "success".to_string(),
                to: "ana@example.com".to_string(),
                subject: "Status report".to_string(),
            }
        );

        let sent = sender.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["ana@example.com"]);
        assert_eq!(sent[0].from.as_deref(), Some("bot@example.com"));
        assert!(sent[0].raw.contains("Subject: Status report"));
        assert!(sent[0].raw.contains("All systems nominal."));
    }

    #[test]
    fn invalid_recipient_is_rejected_before_delivery() {
        let sender = EmailSender::with_transport("bot@example.com", RecordingTransport::default())
            .expect("sender");
        let err = sender.send("not an address", "s", "b").expect_err("invalid");
        assert!(matches!(err, EmailError::InvalidAddress { .. }));
        assert!(sender.transport().sent().is_empty());
    }

    #[test]
    fn invalid_sender_is_rejected_at_construction() {
        let result = EmailSender::with_transport("nobody", RecordingTransport::default());
        assert!(matches!(result, Err(EmailError::InvalidAddress { .. })));
    }

    #[test]
    fn transport_failure_maps_to_delivery_error() {
        let sender = EmailSender::with_transport("bot@example.com", RecordingTransport::failing())
            .expect("sender");
        let err = sender
            .send("ana@example.com", "Status", "body")
            .expect_err("delivery fails");
        match err {
            EmailError::Delivery { to, reason } => {
                assert_eq!(to, "ana@example.com");
                assert!(reason.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
