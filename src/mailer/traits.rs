use crate::models::Notification;
use async_trait::async_trait;

/// Failure to deliver a confirmation email. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid address {address}: {reason}")]
    Address { address: String, reason: String },
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("SMTP error: {0}")]
    Transport(String),
}

/// Sends one plain-text message per call
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_notification(&self, notification: &Notification) -> Result<(), MailError>;
}
