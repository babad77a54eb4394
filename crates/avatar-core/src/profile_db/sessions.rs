//! Session tokens resolving to users.

use anyhow::Result;
use sqlx::Row;

use super::db::{unix_timestamp, ProfileDb};
use crate::profile::{Identity, IdentityId};

impl ProfileDb {
    /// Create a session for `user_id` and return its random token.
    pub async fn create_session(&self, user_id: IdentityId) -> Result<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(unix_timestamp())
        .execute(&self.pool)
        .await?;
        Ok(token)
    }

    /// Returns true if a session was removed.
    pub async fn remove_session(&self, token: &str) -> Result<bool> {
        let affected = sqlx::query(r#"DELETE FROM sessions WHERE token = ?1"#)
            .bind(token)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    /// Identity for a session token, if the token is known.
    pub async fn identity_for_token(&self, token: &str) -> Result<Option<Identity>> {
        let row = sqlx::query(r#"SELECT user_id FROM sessions WHERE token = ?1"#)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| Identity {
            id: r.get("user_id"),
        }))
    }
}
