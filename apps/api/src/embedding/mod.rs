//! Query embedding — turns free text into a fixed-length vector.
//!
//! The embedding model is hardcoded; its output dimension must match the
//! vector index. The dimension check lives in the chat pipeline so it applies
//! to every `Embedder` backend.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 3072-dimensional embeddings.
pub const EMBEDDING_MODEL: &str = "text-embedding-3-large";

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding request failed (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("embedding service returned no vector")]
    Empty,
}

/// Embedding backend. Carried in `AppState` as `Arc<dyn Embedder>`.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Async client for OpenAI-compatible `/embeddings` endpoints.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
}

impl OpenAiEmbedder {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        anyhow::ensure!(!api_key.trim().is_empty(), "missing OpenAI API key");
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .context("invalid OpenAI API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("failed to build embedding HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbeddingRequest {
            model: EMBEDDING_MODEL,
            input: text,
        };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = response.json().await?;
        first_embedding(parsed)
    }
}

fn first_embedding(response: EmbeddingResponse) -> Result<Vec<f32>, EmbeddingError> {
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(EmbeddingError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_embedding_extracts_vector() {
        let parsed: EmbeddingResponse = serde_json::from_str(
            r#"{"object":"list","data":[{"object":"embedding","index":0,"embedding":[0.1,-0.2,0.3]}],"model":"text-embedding-3-large"}"#,
        )
        .unwrap();
        assert_eq!(first_embedding(parsed).unwrap(), vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_first_embedding_rejects_empty_data() {
        let parsed: EmbeddingResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(matches!(first_embedding(parsed), Err(EmbeddingError::Empty)));
    }

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(OpenAiEmbedder::new("  ", "https://api.openai.com/v1", Duration::from_secs(5)).is_err());
    }
}
