//! Similarity retrieval over the occupation vector index.
//!
//! `VectorIndex` is the seam; `PineconeIndex` is the production backend.
//! `filter` holds the pure relevance filter applied after retrieval.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod filter;
pub mod pinecone;

/// Nearest neighbours requested per question.
pub const TOP_K: usize = 5;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vector index request failed (status {status}): {body}")]
    Api { status: u16, body: String },
}

/// One neighbour returned by the index. `score` is always present;
/// `metadata` may be sparse or empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoredMatch {
    pub id: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Subset of index statistics used for the startup dimension check.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub dimension: Option<usize>,
    #[serde(default)]
    pub total_vector_count: u64,
}

/// Vector index backend. Carried in `AppState` as `Arc<dyn VectorIndex>`.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Returns up to `top_k` matches ordered by descending score.
    /// An empty result is not an error.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<ScoredMatch>, IndexError>;

    async fn describe_stats(&self) -> Result<IndexStats, IndexError>;
}

/// Sorts matches by descending score. Ties keep their original order.
pub(crate) fn sort_by_score_desc(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
}
