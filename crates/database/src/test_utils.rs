use crate::notify::{Email, Notifier, NotifyError};
use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::mpsc;

/// Fresh in-memory database with every migration applied
///
/// A single pooled connection keeps every caller on the same in-memory
/// database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Forwards every delivered message to a channel the test can read
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<Email>,
}

impl RecordingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Email>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        let _ = self.tx.send(email.clone());
        Ok(())
    }
}

/// Reports every attempt to a channel, then fails it
pub struct FailingNotifier {
    tx: mpsc::UnboundedSender<Email>,
}

impl FailingNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Email>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        let _ = self.tx.send(email.clone());
        Err(NotifyError::Delivery {
            to: email.to.clone(),
            reason: "smtp unreachable".to_string(),
        })
    }
}
