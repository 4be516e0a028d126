//! Best-effort customer notifications.
//!
//! Messages are handed to a [`Mailer`], which queues them for a background
//! task. Enqueueing never blocks and never fails the caller; delivery errors
//! are logged and dropped.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// An outbound message to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery to {to} failed: {reason}")]
    Delivery { to: String, reason: String },
}

/// Delivers a single message
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, email: &Email) -> Result<(), NotifyError>;
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        info!(
            "Email to {} [{}]: {}",
            email.to, email.subject, email.body
        );
        Ok(())
    }
}

/// Queue in front of a [`Notifier`], drained by a background task
#[derive(Clone)]
pub struct Mailer {
    tx: mpsc::UnboundedSender<Email>,
}

impl Mailer {
    /// Spawns the delivery task on the current tokio runtime
    pub fn spawn(notifier: Arc<dyn Notifier>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Email>();

        tokio::spawn(async move {
            while let Some(email) = rx.recv().await {
                match notifier.send(&email).await {
                    Ok(()) => debug!("Delivered \"{}\" to {}", email.subject, email.to),
                    Err(e) => warn!("Dropping notification: {e}"),
                }
            }
            debug!("Mailer queue closed");
        });

        Self { tx }
    }

    /// Queues a message for delivery
    pub fn enqueue(&self, email: Email) {
        if let Err(e) = self.tx.send(email) {
            warn!("Mailer is not running, dropping message to {}", e.0.to);
        }
    }
}
