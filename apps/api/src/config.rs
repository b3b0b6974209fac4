use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
/// Dimension produced by `text-embedding-3-large`.
const DEFAULT_EMBEDDING_DIMENSION: usize = 3072;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Startup fails if a required secret is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub pinecone_api_key: String,
    pub pinecone_index_host: String,
    pub pinecone_namespace: String,
    pub embedding_dimension: usize,
    pub auth_jwt_secret: String,
    pub auth_jwt_issuer: Option<String>,
    pub auth_jwt_audience: Option<String>,
    pub upstream_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            pinecone_api_key: require_env("PINECONE_API_KEY")?,
            pinecone_index_host: require_env("PINECONE_INDEX_HOST")?,
            pinecone_namespace: optional_env("PINECONE_NAMESPACE").unwrap_or_default(),
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION)?,
            auth_jwt_secret: require_env("AUTH_JWT_SECRET")?,
            auth_jwt_issuer: optional_env("AUTH_JWT_ISSUER"),
            auth_jwt_audience: optional_env("AUTH_JWT_AUDIENCE"),
            upstream_timeout: Duration::from_secs(parse_env(
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )?),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    anyhow::ensure!(
        !value.trim().is_empty(),
        "Required environment variable '{key}' is empty"
    );
    Ok(value)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
