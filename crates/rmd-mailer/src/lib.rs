//! # rmd-mailer
//!
//! Outbound reminder mail for Remind.
//!
//! The [`Mailer`] trait is the seam the task service and reminder scanner
//! dispatch through. [`SmtpMailer`] sends real mail via lettre when SMTP is
//! configured and falls back to logging otherwise (useful for development);
//! [`CaptureMailer`] records messages for tests and can inject failures.

use std::sync::{Arc, Mutex};

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use rmd_config::SmtpConfig;

/// Errors from reminder dispatch. Always isolated per task by callers, never
/// fatal to a surrounding scan or creation.
#[derive(Debug, Error)]
pub enum MailError {
    /// A recipient or sender address failed to parse.
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP transport rejected or failed the send.
    #[error("SMTP send failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// Injected failure (test mailer).
    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

/// One outbound reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// The reminder shape used everywhere: subject carries the task title,
    /// body the description.
    #[must_use]
    pub fn task_reminder(title: &str, description: &str, recipients: Vec<String>) -> Self {
        Self {
            to: recipients,
            subject: format!("Reminder: {title}"),
            body: format!("Task description: {description}"),
        }
    }
}

/// Mail dispatch capability, injected into the task service and scanner.
pub trait Mailer: Send + Sync {
    /// Send one message. One attempt; retries are the caller's concern.
    fn send(
        &self,
        message: &MailMessage,
    ) -> impl std::future::Future<Output = Result<(), MailError>> + Send;
}

/// lettre-backed SMTP mailer with a logging fallback when unconfigured.
pub struct SmtpMailer {
    from: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpMailer {
    /// Build from configuration. Without a configured host the mailer logs
    /// each reminder instead of sending it.
    ///
    /// # Errors
    ///
    /// Returns `MailError::Transport` if the relay cannot be constructed.
    pub fn from_config(config: &SmtpConfig) -> Result<Self, MailError> {
        let transport = if config.is_configured() {
            let relay = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                .port(config.port)
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .build();
            Some(relay)
        } else {
            tracing::warn!("smtp is not configured; reminders will be logged, not sent");
            None
        };

        Ok(Self {
            from: config.from_address().to_string(),
            transport,
        })
    }

    /// Whether real delivery is configured.
    #[must_use]
    pub const fn has_smtp(&self) -> bool {
        self.transport.is_some()
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            tracing::info!(
                to = ?message.to,
                subject = %message.subject,
                "smtp unconfigured; logging reminder instead of sending"
            );
            return Ok(());
        };

        let mut builder = Message::builder().from(self.from.parse::<Mailbox>()?);
        for recipient in &message.to {
            builder = builder.to(recipient.parse::<Mailbox>()?);
        }
        let email = builder
            .subject(message.subject.clone())
            .body(message.body.clone())?;

        transport.send(email).await?;
        tracing::info!(to = ?message.to, subject = %message.subject, "reminder sent");
        Ok(())
    }
}

/// Test mailer: records every message, optionally failing those whose
/// subject contains a needle.
#[derive(Debug, Clone, Default)]
pub struct CaptureMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
    fail_subject_containing: Option<String>,
}

impl CaptureMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer that fails any send whose subject contains `needle`.
    #[must_use]
    pub fn failing_on(needle: impl Into<String>) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_subject_containing: Some(needle.into()),
        }
    }

    /// Messages successfully "sent" so far.
    #[must_use]
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Mailer for CaptureMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if let Some(needle) = &self.fail_subject_containing {
            if message.subject.contains(needle.as_str()) {
                return Err(MailError::Dispatch(format!(
                    "injected failure for subject '{}'",
                    message.subject
                )));
            }
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn task_reminder_shape() {
        let message = MailMessage::task_reminder(
            "Water the plants",
            "Front office only",
            vec!["office@example.com".into()],
        );
        assert_eq!(message.subject, "Reminder: Water the plants");
        assert_eq!(message.body, "Task description: Front office only");
        assert_eq!(message.to, vec!["office@example.com".to_string()]);
    }

    #[tokio::test]
    async fn unconfigured_smtp_mailer_logs_and_succeeds() {
        let mailer = SmtpMailer::from_config(&SmtpConfig::default()).unwrap();
        assert!(!mailer.has_smtp());

        let message = MailMessage::task_reminder("t", "d", vec!["a@example.com".into()]);
        mailer.send(&message).await.unwrap();
    }

    #[tokio::test]
    async fn capture_mailer_records_sends() {
        let mailer = CaptureMailer::new();
        let message = MailMessage::task_reminder("t", "d", vec!["a@example.com".into()]);
        mailer.send(&message).await.unwrap();
        assert_eq!(mailer.sent(), vec![message]);
    }

    #[tokio::test]
    async fn capture_mailer_injects_failures() {
        let mailer = CaptureMailer::failing_on("flaky");
        let bad = MailMessage::task_reminder("flaky task", "d", vec!["a@example.com".into()]);
        let good = MailMessage::task_reminder("steady task", "d", vec!["a@example.com".into()]);

        assert!(mailer.send(&bad).await.is_err());
        mailer.send(&good).await.unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }
}
