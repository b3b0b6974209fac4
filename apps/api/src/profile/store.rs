use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profile::models::UserProfile;

/// Profile document store keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Merge-upsert: top-level keys in `patch` replace the stored ones; the
    /// document is created if missing.
    async fn merge(&self, uid: &str, patch: Map<String, Value>) -> Result<(), AppError>;
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT user_id, data, updated_at FROM user_profiles WHERE user_id = $1")
                .bind(uid)
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        debug!(user_id = %row.user_id, updated_at = %row.updated_at, "Loaded profile");

        let profile: UserProfile = serde_json::from_value(row.data)
            .with_context(|| format!("stored profile for {uid} is not a valid document"))?;
        Ok(Some(profile))
    }

    async fn merge(&self, uid: &str, patch: Map<String, Value>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (user_id, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET data = user_profiles.data || EXCLUDED.data,
                updated_at = NOW()
            "#,
        )
        .bind(uid)
        .bind(Value::Object(patch))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
