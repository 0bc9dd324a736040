//! Mail collaborator: the [`Mailer`] contract plus an SMTP implementation.
//!
//! `SmtpMailer` speaks STARTTLS with login credentials and builds the
//! transport per send; there is no connection pooling because the assistant
//! sends at most one message per request.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid mailbox address `{address}`: {source}")]
    Address { address: String, source: lettre::address::AddressError },
    #[error("failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("failed to initialize SMTP relay `{host}`: {source}")]
    Relay { host: String, source: lettre::transport::smtp::Error },
    #[error("SMTP send failed: {0}")]
    Send(lettre::transport::smtp::Error),
}

/// Sends one plain-text email. Implementations must not retry.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl<T: Mailer + ?Sized> Mailer for Arc<T> {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        (**self).send(to, subject, body).await
    }
}

pub struct SmtpMailer {
    smtp_host: String,
    smtp_port: u16,
    sender: String,
    password: SecretString,
}

impl SmtpMailer {
    pub fn new(smtp_host: String, smtp_port: u16, sender: String, password: SecretString) -> Self {
        Self { smtp_host, smtp_port, sender, password }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let from = parse_mailbox(&self.sender)?;
        let to = parse_mailbox(to)?;

        let message =
            Message::builder().from(from).to(to).subject(subject).body(body.to_string())?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_host)
            .map_err(|source| NotifyError::Relay { host: self.smtp_host.clone(), source })?
            .port(self.smtp_port)
            .credentials(Credentials::new(
                self.sender.clone(),
                self.password.expose_secret().to_string(),
            ))
            .build();

        tracing::debug!(host = %self.smtp_host, port = self.smtp_port, "sending notification email");
        transport.send(message).await.map_err(NotifyError::Send)?;
        Ok(())
    }
}
