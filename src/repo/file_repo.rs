use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::model::FileRecord;

const FILE_COLUMNS: &str = "id, user_id, original_name, saved_name, file_url, upload_time";

pub struct FileRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        owner_id: &str,
        original_name: &str,
        saved_name: &str,
        file_url: &str,
    ) -> Result<FileRecord> {
        let file = FileRecord {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            original_name: original_name.to_string(),
            saved_name: saved_name.to_string(),
            file_url: file_url.to_string(),
            upload_time: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO files (id, user_id, original_name, saved_name, file_url, upload_time)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&file.id)
        .bind(&file.user_id)
        .bind(&file.original_name)
        .bind(&file.saved_name)
        .bind(&file.file_url)
        .bind(format_time(&file.upload_time))
        .execute(self.pool)
        .await
        .context("inserting file record")?;

        Ok(file)
    }

    /// Newest first. Rows inserted within the same microsecond fall back to
    /// insertion order.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE user_id = ? ORDER BY upload_time DESC, rowid DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool)
        .await
        .context("listing files")?;

        rows.iter().map(file_from_row).collect()
    }

    /// Deletes the row only if `owner_id` owns it and returns its saved name.
    /// `None` covers both "no such file" and "someone else's file".
    pub async fn delete_by_id_and_owner(&self, file_id: &str, owner_id: &str) -> Result<Option<String>> {
        let saved_name = sqlx::query_scalar::<_, String>(
            "DELETE FROM files WHERE id = ? AND user_id = ? RETURNING saved_name",
        )
        .bind(file_id)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await
        .context("deleting file record")?;

        Ok(saved_name)
    }

    pub async fn find_by_saved_name_and_owner(
        &self,
        saved_name: &str,
        owner_id: &str,
    ) -> Result<Option<FileRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE saved_name = ? AND user_id = ?"
        ))
        .bind(saved_name)
        .bind(owner_id)
        .fetch_optional(self.pool)
        .await
        .context("looking up file record")?;

        row.as_ref().map(file_from_row).transpose()
    }
}

// Fixed precision keeps textual order equal to chronological order.
fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn file_from_row(row: &SqliteRow) -> Result<FileRecord> {
    let upload_time: String = row.try_get("upload_time")?;
    Ok(FileRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        original_name: row.try_get("original_name")?,
        saved_name: row.try_get("saved_name")?,
        file_url: row.try_get("file_url")?,
        upload_time: DateTime::parse_from_rfc3339(&upload_time)
            .with_context(|| format!("bad upload_time {upload_time:?}"))?
            .with_timezone(&Utc),
    })
}
