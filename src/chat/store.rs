use serde::{Serialize, Serializer};
use sqlx::SqlitePool;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::Identity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored timestamp out of range: {0}")]
    Timestamp(#[from] time::error::ComponentRange),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: i64,
    pub sender: Identity,
    pub recipient: Identity,
    pub body: String,
    #[serde(serialize_with = "rfc3339")]
    pub created_at: OffsetDateTime,
}

fn rfc3339<S: Serializer>(at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = at.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&text)
}

type MessageRow = (i64, String, String, String, i64);

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from((id, sender, recipient, body, created_at): MessageRow) -> StoreResult<Message> {
        Ok(Message {
            id,
            sender: Identity::from_stored(sender),
            recipient: Identity::from_stored(recipient),
            body,
            created_at: from_micros(created_at)?,
        })
    }
}

// Timestamps live in the table as unix microseconds so ORDER BY is numeric.
fn to_micros(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000) as i64
}

fn from_micros(micros: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(micros as i128 * 1_000)
}

/// Append-only chat history in SQLite.
#[derive(Debug, Clone)]
pub struct MessageStore {
    db_pool: SqlitePool,
}

impl MessageStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                sender TEXT NOT NULL,
                recipient TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.db_pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS chat_messages_pair ON chat_messages (sender, recipient)")
            .execute(&self.db_pool)
            .await?;

        Ok(())
    }

    pub async fn insert(&self, sender: &Identity, recipient: &Identity, body: &str) -> StoreResult<Message> {
        let micros = to_micros(OffsetDateTime::now_utc());

        let id = sqlx::query("INSERT INTO chat_messages (sender,recipient,body,created_at) VALUES (?,?,?,?)")
            .bind(sender.as_str())
            .bind(recipient.as_str())
            .bind(body)
            .bind(micros)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid();

        Ok(Message {
            id,
            sender: sender.clone(),
            recipient: recipient.clone(),
            body: body.to_owned(),
            created_at: from_micros(micros)?,
        })
    }

    /// Both directions between `a` and `b`, oldest first.
    pub async fn conversation(&self, a: &Identity, b: &Identity) -> StoreResult<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id,sender,recipient,body,created_at FROM chat_messages \
             WHERE (sender=? AND recipient=?) OR (sender=? AND recipient=?) \
             ORDER BY created_at, id",
        )
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(b.as_str())
        .bind(a.as_str())
        .fetch_all(&self.db_pool)
        .await?;

        rows.into_iter().map(Message::try_from).collect()
    }

    pub async fn get(&self, id: i64) -> StoreResult<Option<Message>> {
        let row: Option<MessageRow> =
            sqlx::query_as("SELECT id,sender,recipient,body,created_at FROM chat_messages WHERE id=?")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?;

        row.map(Message::try_from).transpose()
    }

    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE id=?")
            .bind(id)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[cfg(test)]
    pub(crate) async fn count(&self) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chat_messages")
            .fetch_one(&self.db_pool)
            .await
            .unwrap();
        count
    }
}

#[cfg(test)]
pub(crate) async fn memory_store() -> MessageStore {
    use sqlx::sqlite::SqlitePoolOptions;

    // a single pinned connection, every new in-memory connection is a fresh database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = MessageStore::new(db_pool);
    store.migrate().await.unwrap();
    store
}
