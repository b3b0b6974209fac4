use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// One row of `user_profiles`: the caller's profile document as stored.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}
