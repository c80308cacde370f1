//! Log entry repository
//!
//! Every read joins the owning account so the owner's display name travels
//! with the entry.

use crate::domain::{
    ArchiveFilter, LogChanges, LogChannel, LogEntry, LogId, LogLevel, NewLogEntry, UserId,
};
use crate::errors::{Error, Result};
use crate::storage::DbPool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::instrument;

#[derive(Debug, Clone, FromRow)]
struct LogRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub details: String,
    pub source: String,
    pub event_count: i32,
    pub level: String,
    pub channel: String,
    pub created_at: DateTime<Utc>,
    pub archived: bool,
    pub user_id: i64,
    pub user_name: String,
}

fn row_to_entry(row: LogRow) -> Result<LogEntry> {
    let level: LogLevel = row.level.parse().map_err(|e| Error::validation(format!("{}", e)))?;
    let channel: LogChannel =
        row.channel.parse().map_err(|e| Error::validation(format!("{}", e)))?;

    Ok(LogEntry {
        id: LogId::new(row.id),
        title: row.title,
        description: row.description,
        details: row.details,
        source: row.source,
        event_count: row.event_count,
        level,
        channel,
        created_at: row.created_at,
        archived: row.archived,
        owner_id: UserId::new(row.user_id),
        owner_name: row.user_name,
    })
}

const SELECT_LOGS: &str = r#"
    SELECT l.id, l.title, l.description, l.details, l.source, l.event_count, l.level,
           l.channel, l.created_at, l.archived, l.user_id, u.name AS user_name
    FROM logs l
    JOIN users u ON u.id = l.user_id
"#;

#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Insert a new entry and return it with its owner's name
    async fn create_log(&self, log: NewLogEntry) -> Result<LogEntry>;

    async fn get_log(&self, id: LogId) -> Result<Option<LogEntry>>;

    /// Every unarchived entry across all owners
    async fn list_unarchived(&self) -> Result<Vec<LogEntry>>;

    /// Entries of one owner, narrowed by archive state
    async fn list_by_owner(&self, owner_id: UserId, filter: ArchiveFilter)
        -> Result<Vec<LogEntry>>;

    /// Overwrite the editable fields. Returns whether a row changed.
    async fn update_log(&self, id: LogId, changes: &LogChanges) -> Result<bool>;

    async fn set_archived(&self, id: LogId, archived: bool) -> Result<bool>;

    async fn delete_log(&self, id: LogId) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct SqlxLogRepository {
    pool: DbPool,
}

impl SqlxLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn rows_to_entries(rows: Vec<LogRow>) -> Result<Vec<LogEntry>> {
        rows.into_iter().map(row_to_entry).collect()
    }
}

#[async_trait]
impl LogRepository for SqlxLogRepository {
    #[instrument(skip(self, log), fields(owner_id = %log.owner_id), name = "db_create_log")]
    async fn create_log(&self, log: NewLogEntry) -> Result<LogEntry> {
        let fields = &log.fields;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO logs (title, description, details, source, event_count, level, channel,
                              created_at, archived, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, $9)
            RETURNING id
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.details)
        .bind(&fields.source)
        .bind(fields.event_count)
        .bind(fields.level.as_str())
        .bind(fields.channel.as_str())
        .bind(log.created_at)
        .bind(log.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to create log"))?;

        self.get_log(LogId::new(id))
            .await?
            .ok_or_else(|| Error::not_found("Log", id))
    }

    #[instrument(skip(self), fields(log_id = %id), name = "db_get_log")]
    async fn get_log(&self, id: LogId) -> Result<Option<LogEntry>> {
        let row = sqlx::query_as::<_, LogRow>(&format!("{} WHERE l.id = $1", SELECT_LOGS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to fetch log"))?;

        row.map(row_to_entry).transpose()
    }

    #[instrument(skip(self), name = "db_list_unarchived_logs")]
    async fn list_unarchived(&self) -> Result<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogRow>(&format!(
            "{} WHERE l.archived = 0 ORDER BY l.id",
            SELECT_LOGS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list logs"))?;

        Self::rows_to_entries(rows)
    }

    #[instrument(skip(self), fields(owner_id = %owner_id, filter = ?filter), name = "db_list_logs_by_owner")]
    async fn list_by_owner(
        &self,
        owner_id: UserId,
        filter: ArchiveFilter,
    ) -> Result<Vec<LogEntry>> {
        let rows = sqlx::query_as::<_, LogRow>(&format!(
            "{} WHERE l.user_id = $1 AND ($2 IS NULL OR l.archived = $3) ORDER BY l.id",
            SELECT_LOGS
        ))
        .bind(owner_id)
        .bind(filter.archived_flag())
        .bind(filter.archived_flag())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to list logs by owner"))?;

        Self::rows_to_entries(rows)
    }

    #[instrument(skip(self, changes), fields(log_id = %id), name = "db_update_log")]
    async fn update_log(&self, id: LogId, changes: &LogChanges) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE logs
            SET title = $1, description = $2, details = $3, source = $4, event_count = $5,
                level = $6, channel = $7
            WHERE id = $8
            "#,
        )
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(&changes.details)
        .bind(&changes.source)
        .bind(changes.event_count)
        .bind(changes.level.as_str())
        .bind(changes.channel.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| Error::database(err, "Failed to update log"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(log_id = %id), name = "db_set_log_archived")]
    async fn set_archived(&self, id: LogId, archived: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE logs SET archived = $1 WHERE id = $2")
            .bind(archived)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to archive log"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(log_id = %id), name = "db_delete_log")]
    async fn delete_log(&self, id: LogId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| Error::database(err, "Failed to delete log"))?;

        Ok(result.rows_affected() > 0)
    }
}
