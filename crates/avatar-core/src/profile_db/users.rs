//! User rows and the profile image field.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::db::{unix_timestamp, ProfileDb};
use super::types::UserRecord;
use crate::profile::{IdentityId, ProfileUpdate};

fn user_from_row(row: &SqliteRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        profile_image: row.get("profile_image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl ProfileDb {
    /// Insert a user with an empty profile image. Emails are unique.
    pub async fn add_user(&self, email: &str) -> Result<IdentityId> {
        let now = unix_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO users (email, profile_image, created_at, updated_at)
            VALUES (?1, NULL, ?2, ?3)
            "#,
        )
        .bind(email)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to add user {email}"))?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn get_user(&self, id: IdentityId) -> Result<Option<UserRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, profile_image, created_at, updated_at
            FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    /// All users, oldest first.
    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, profile_image, created_at, updated_at
            FROM users ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    /// Overwrite the profile image field. A missing user is not an error.
    pub async fn set_profile_image(
        &self,
        id: IdentityId,
        value: Option<&str>,
    ) -> Result<ProfileUpdate> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET profile_image = ?1,
                updated_at = ?2
            WHERE id = ?3
            "#,
        )
        .bind(value)
        .bind(unix_timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(if affected == 0 {
            ProfileUpdate::NoProfile
        } else {
            ProfileUpdate::Updated
        })
    }
}
