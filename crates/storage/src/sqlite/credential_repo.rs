use async_trait::async_trait;
use chrono::{DateTime, Utc};
use intellitest_core::model::UserId;
use sqlx::Row;

use crate::repository::{CredentialRepository, StorageError, StoredCredentials};

use super::SqliteRepository;

#[async_trait]
impl CredentialRepository for SqliteRepository {
    async fn load_credentials(&self) -> Result<Option<StoredCredentials>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT access_token, username, user_id, saved_at
            FROM credentials
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let access_token: String = row
            .try_get("access_token")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let username: Option<String> = row
            .try_get("username")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let user_id: Option<i64> = row
            .try_get("user_id")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let saved_at: DateTime<Utc> = row
            .try_get("saved_at")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let user_id = user_id
            .map(|raw| {
                u64::try_from(raw)
                    .map(UserId::new)
                    .map_err(|_| StorageError::Serialization(format!("invalid user id: {raw}")))
            })
            .transpose()?;

        Ok(Some(StoredCredentials {
            access_token,
            username,
            user_id,
            saved_at,
        }))
    }

    async fn save_credentials(&self, credentials: &StoredCredentials) -> Result<(), StorageError> {
        let user_id = credentials
            .user_id
            .map(|id| {
                i64::try_from(id.value())
                    .map_err(|_| StorageError::Serialization(format!("user id out of range: {id}")))
            })
            .transpose()?;

        sqlx::query(
            r"
            INSERT INTO credentials (id, access_token, username, user_id, saved_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                access_token = excluded.access_token,
                username = excluded.username,
                user_id = excluded.user_id,
                saved_at = excluded.saved_at
            ",
        )
        .bind(1_i64)
        .bind(&credentials.access_token)
        .bind(credentials.username.as_deref())
        .bind(user_id)
        .bind(credentials.saved_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_credentials(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM credentials WHERE id = 1")
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
