//! Durable mailbox storage repository.
//!
//! A thin adapter over a key-value table: one key per partner, value = the
//! JSON-serialized full mailbox snapshot. Every save is an unconditional
//! full-snapshot overwrite; within one process the last writer wins.

use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use super::events::{EventBus, MailboxEvent};
use crate::Result;
use crate::mailbox::Message;
use crate::partner::PartnerId;

/// Repository for per-partner mailbox snapshots.
pub struct MailboxRepository {
    pool: SqlitePool,
    events: EventBus,
}

impl MailboxRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self {
            pool,
            events: EventBus::new(),
        };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self {
            pool,
            events: EventBus::new(),
        };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS mailboxes (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The durable key for a partner's mailbox.
    #[must_use]
    pub fn mailbox_key(partner: &PartnerId) -> String {
        format!("mailbox:{partner}")
    }

    /// Load the persisted mailbox for a partner.
    ///
    /// A missing key, a failed query, or a value that does not decode to a
    /// message sequence all degrade to an empty mailbox; this never fails.
    pub async fn load(&self, partner: &PartnerId) -> Vec<Message> {
        let key = Self::mailbox_key(partner);

        let row = match sqlx::query(r"SELECT value FROM mailboxes WHERE key = ?")
            .bind(&key)
            .fetch_optional(&self.pool)
            .await
        {
            Ok(row) => row,
            Err(err) => {
                warn!(%key, %err, "mailbox read failed; treating as empty");
                return Vec::new();
            }
        };

        let Some(row) = row else {
            debug!(%key, "no persisted mailbox");
            return Vec::new();
        };

        let value: String = row.get("value");
        match serde_json::from_str::<Vec<Message>>(&value) {
            Ok(messages) => messages,
            Err(err) => {
                warn!(%key, %err, "persisted mailbox is malformed; treating as empty");
                Vec::new()
            }
        }
    }

    /// Persist the full mailbox snapshot for a partner, then broadcast a
    /// change notification tagged with the written key.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails. The
    /// notification is only published after a successful write.
    pub async fn save(&self, partner: &PartnerId, messages: &[Message]) -> Result<()> {
        let key = Self::mailbox_key(partner);
        let value = serde_json::to_string(messages)?;

        sqlx::query(
            r"
            INSERT INTO mailboxes (key, value)
            VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(&key)
        .bind(&value)
        .execute(&self.pool)
        .await?;

        debug!(%key, count = messages.len(), "mailbox persisted");
        self.events.publish(key);
        Ok(())
    }

    /// Subscribe to mailbox write notifications.
    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<MailboxEvent> {
        self.events.subscribe()
    }

    /// Make every subsequent write to the mailbox table fail while reads keep
    /// working, so callers' write-failure handling can be exercised. The
    /// upsert in [`save`](Self::save) takes the update branch for existing
    /// keys, so both trigger kinds are needed.
    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) async fn disable_writes(&self) {
        for statement in [
            r"
            CREATE TRIGGER mailboxes_reject_insert BEFORE INSERT ON mailboxes
            BEGIN SELECT RAISE(ABORT, 'writes disabled'); END
            ",
            r"
            CREATE TRIGGER mailboxes_reject_update BEFORE UPDATE ON mailboxes
            BEGIN SELECT RAISE(ABORT, 'writes disabled'); END
            ",
        ] {
            sqlx::query(statement).execute(&self.pool).await.unwrap();
        }
    }
}
