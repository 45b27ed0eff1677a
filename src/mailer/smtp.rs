use crate::mailer::traits::{MailError, Mailer};
use crate::models::Notification;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use tracing::debug;

pub const DEFAULT_SMTP_SERVER: &str = "smtp.office365.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Relay endpoint and sender identity
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    /// Sender address, also the SMTP username
    pub sender: String,
    pub password: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sends plain-text mail through a STARTTLS relay with password auth.
/// Each call opens its own connection.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    settings: SmtpSettings,
    sender: Mailbox,
}

impl SmtpMailer {
    /// Fails if the sender is not a valid address
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let sender = parse_mailbox(&settings.sender)?;
        Ok(Self { settings, sender })
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let credentials =
            Credentials::new(self.settings.sender.clone(), self.settings.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.settings.port)
            .credentials(credentials)
            .build();

        Ok(transport)
    }

    /// Build the plain-text message for a notification
    pub fn build_message(&self, notification: &Notification) -> Result<Message, MailError> {
        let to = parse_mailbox(&notification.to)?;

        Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| MailError::Message(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_notification(&self, notification: &Notification) -> Result<(), MailError> {
        let message = self.build_message(notification)?;
        let transport = self.build_transport()?;

        debug!(
            "Sending '{}' via {}:{}",
            notification.subject, self.settings.server, self.settings.port
        );

        transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        debug!("Relay accepted message for {}", notification.to);
        Ok(())
    }
}
