use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::email::{EmailRecord, EmailStatus, NewEmail};

#[derive(Debug, thiserror::Error)]
pub enum EmailDBError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Query error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

/// Per-user email persistence. Every call is scoped by the owning user's id.
#[async_trait]
pub trait EmailStore: Send + Sync {
    /// All records owned by `user_id`, newest first.
    async fn list(&self, user_id: &str) -> Result<Vec<EmailRecord>, EmailDBError>;

    /// Stores a new record for `user_id` and returns it with id and timestamps.
    async fn create(&self, user_id: &str, email: NewEmail) -> Result<EmailRecord, EmailDBError>;
}

/// SQLite-backed email store.
#[derive(Clone)]
pub struct EmailDB {
    pool: SqlitePool,
}

impl EmailDB {
    pub async fn new(database_url: &str) -> Result<Self, EmailDBError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| EmailDBError::ConnectionError(format!("Invalid database url: {}", e)))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| EmailDBError::ConnectionError(format!("Failed to open database: {}", e)))?;

        Self::init_schema(&pool).await?;
        info!("Email database ready at {}", database_url);
        Ok(EmailDB { pool })
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, EmailDBError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| EmailDBError::ConnectionError(e.to_string()))?;

        // A second connection would see a different, empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| EmailDBError::ConnectionError(format!("Failed to open in-memory database: {}", e)))?;

        Self::init_schema(&pool).await?;
        Ok(EmailDB { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), EmailDBError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS emails (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                subject TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                from_addr TEXT NOT NULL DEFAULT '',
                to_addrs TEXT NOT NULL DEFAULT '[]',
                cc_addrs TEXT NOT NULL DEFAULT '[]',
                bcc_addrs TEXT NOT NULL DEFAULT '[]',
                status TEXT NOT NULL DEFAULT 'draft',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_emails_user_created ON emails(user_id, created_at DESC);
            "#,
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    fn record_from_row(row: &SqliteRow) -> Result<EmailRecord, EmailDBError> {
        let id: String = row.try_get("id")?;
        let corrupt = |reason: String| EmailDBError::CorruptRecord { id: id.clone(), reason };

        let status: String = row.try_get("status")?;
        let status = EmailStatus::from_str(&status).map_err(corrupt)?;
        let created_at = millis_to_datetime(row.try_get("created_at")?)
            .ok_or_else(|| corrupt("created_at out of range".to_string()))?;
        let updated_at = millis_to_datetime(row.try_get("updated_at")?)
            .ok_or_else(|| corrupt("updated_at out of range".to_string()))?;

        Ok(EmailRecord {
            subject: row.try_get("subject")?,
            content: row.try_get("content")?,
            from: row.try_get("from_addr")?,
            to: serde_json::from_str(&row.try_get::<String, _>("to_addrs")?)?,
            cc: serde_json::from_str(&row.try_get::<String, _>("cc_addrs")?)?,
            bcc: serde_json::from_str(&row.try_get::<String, _>("bcc_addrs")?)?,
            status,
            created_at,
            updated_at,
            user_id: row.try_get("user_id")?,
            id,
        })
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis)
}

#[async_trait]
impl EmailStore for EmailDB {
    async fn list(&self, user_id: &str) -> Result<Vec<EmailRecord>, EmailDBError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, subject, content, from_addr, to_addrs, cc_addrs, bcc_addrs,
                   status, created_at, updated_at
            FROM emails
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!("Loaded {} emails for user {}", rows.len(), user_id);
        rows.iter().map(Self::record_from_row).collect()
    }

    async fn create(&self, user_id: &str, email: NewEmail) -> Result<EmailRecord, EmailDBError> {
        // Stored at millisecond precision, so round now() the same way.
        let now_millis = Utc::now().timestamp_millis();
        let now = millis_to_datetime(now_millis)
            .ok_or_else(|| EmailDBError::ConnectionError("system clock out of range".to_string()))?;

        let record = EmailRecord {
            id: Uuid::new_v4().to_string(),
            subject: email.subject,
            content: email.content,
            from: email.from,
            to: email.to,
            cc: email.cc,
            bcc: email.bcc,
            status: email.status,
            created_at: now,
            updated_at: now,
            user_id: user_id.to_string(),
        };

        sqlx::query(
            r#"
            INSERT INTO emails (id, user_id, subject, content, from_addr, to_addrs, cc_addrs,
                                bcc_addrs, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.subject)
        .bind(&record.content)
        .bind(&record.from)
        .bind(serde_json::to_string(&record.to)?)
        .bind(serde_json::to_string(&record.cc)?)
        .bind(serde_json::to_string(&record.bcc)?)
        .bind(record.status.as_str())
        .bind(now_millis)
        .bind(now_millis)
        .execute(&self.pool)
        .await?;

        info!("Created email {} for user {}", record.id, user_id);
        Ok(record)
    }
}
