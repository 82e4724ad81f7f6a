//! Outbound email notifications.
//!
//! Delivery is best-effort: [`dispatch`] runs after the database transaction
//! has committed and a transport failure is logged, never surfaced.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

use crate::config::SmtpConfig;

pub const ACCOUNT_CONFIRMATION_SUBJECT: &str = "Registration confirmation";
pub const ORDER_CONFIRMATION_SUBJECT: &str = "Order confirmation";

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// A single message to one recipient. The body is the confirmation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub address: String,
}

impl Notification {
    pub fn account_confirmation(address: &str, key: &str) -> Self {
        Self {
            subject: ACCOUNT_CONFIRMATION_SUBJECT.to_string(),
            body: key.to_string(),
            address: address.to_string(),
        }
    }

    pub fn order_confirmation(address: &str, key: &str) -> Self {
        Self {
            subject: ORDER_CONFIRMATION_SUBJECT.to_string(),
            body: key.to_string(),
            address: address.to_string(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, subject: &str, body: &str, address: &str) -> Result<(), NotifyError>;
}

/// Sends plain-text mail over STARTTLS SMTP.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str, address: &str) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| NotifyError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(address
                .parse()
                .map_err(|_| NotifyError::InvalidAddress(address.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;

        tracing::info!(to = %address, subject = %subject, "email sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, subject: &str, body: &str, address: &str) -> Result<(), NotifyError> {
        tracing::info!(to = %address, subject = %subject, body = %body, "email not sent, smtp disabled");
        Ok(())
    }
}

pub fn notifier_from_config(config: Option<&SmtpConfig>) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config {
        Some(smtp) => Ok(Arc::new(SmtpNotifier::new(smtp)?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}

/// Fire-and-forget delivery on a background task.
pub fn dispatch(notifier: Arc<dyn Notifier>, notification: Notification) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let Notification {
            subject,
            body,
            address,
        } = notification;
        if let Err(err) = notifier.send(&subject, &body, &address).await {
            tracing::warn!(error = %err, to = %address, subject = %subject, "notification failed");
        }
    })
}
