use sqlx::{Row, sqlite::SqlitePool};
use crate::constants::MESSAGE_USERNAME_TAKEN;
use crate::error::AppError;
use crate::model::User;
use anyhow::Result;

pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts the user. The UNIQUE constraint on `username` is the only
    /// duplicate check, so two concurrent registrations cannot both win.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let result = sqlx::query("INSERT INTO users (id, username, password_hash) VALUES (?, ?, ?)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AppError::Conflict(MESSAGE_USERNAME_TAKEN.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
        }))
    }
}
