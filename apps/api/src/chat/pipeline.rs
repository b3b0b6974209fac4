//! Chat RAG pipeline — answers one question, statelessly.
//!
//! Flow: embed → retrieve (top-K) → filter (score > threshold) → compose prompt →
//!       generate → shape response.
//!
//! Stages run strictly in sequence. Any stage failure fails the whole request;
//! nothing is retried and no partial answer is returned.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::chat::composer::compose_prompt;
use crate::embedding::Embedder;
use crate::errors::AppError;
use crate::llm_client::{ChatModel, ChatRequest, GenerationParams};
use crate::models::occupation::OccupationRecord;
use crate::retrieval::filter::{filter_relevant, RELEVANCE_THRESHOLD};
use crate::retrieval::{VectorIndex, TOP_K};

pub const CHAT_PARAMS: GenerationParams = GenerationParams {
    model: "gpt-4",
    temperature: 0.7,
    max_tokens: 1000,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Embedding,
    Retrieving,
    Filtering,
    Composing,
    Generating,
    Shaping,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Embedding => "embedding",
            PipelineStage::Retrieving => "retrieving",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Composing => "composing",
            PipelineStage::Generating => "generating",
            PipelineStage::Shaping => "shaping",
        };
        f.write_str(name)
    }
}

/// Upstream collaborators for one request. Borrowed from `AppState`.
#[derive(Clone, Copy)]
pub struct ChatDeps<'a> {
    pub embedder: &'a dyn Embedder,
    pub index: &'a dyn VectorIndex,
    pub chat: &'a dyn ChatModel,
    pub embedding_dimension: usize,
}

/// Response body of the chat endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    pub response: String,
    /// Records that passed the relevance filter, in retrieval order.
    pub relevant_data: Vec<OccupationRecord>,
    /// Number of matches the index returned before filtering.
    pub matches: usize,
}

pub async fn answer_question(deps: ChatDeps<'_>, question: &str) -> Result<ChatAnswer, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput("Message is required".to_string()));
    }

    debug!(stage = %PipelineStage::Embedding, "Embedding question");
    let vector = deps.embedder.embed(question).await?;
    check_dimension(vector.len(), deps.embedding_dimension)?;

    debug!(stage = %PipelineStage::Retrieving, "Querying vector index (top_k={TOP_K})");
    let matches = deps.index.query(&vector, TOP_K, true).await?;
    let retrieved = matches.len();
    info!("Vector index returned {retrieved} matches");

    debug!(stage = %PipelineStage::Filtering, "Applying relevance threshold {RELEVANCE_THRESHOLD}");
    let records: Vec<OccupationRecord> = matches.iter().map(OccupationRecord::from_match).collect();
    let relevant = filter_relevant(records, RELEVANCE_THRESHOLD);
    info!("{} of {retrieved} matches passed the relevance filter", relevant.len());

    debug!(stage = %PipelineStage::Composing, "Composing prompt");
    let prompt = compose_prompt(question, &relevant)?;

    debug!(stage = %PipelineStage::Generating, "Calling chat model {}", CHAT_PARAMS.model);
    let response = deps
        .chat
        .complete(ChatRequest {
            system: prompt.system,
            user: &prompt.user,
            params: CHAT_PARAMS,
        })
        .await?;

    debug!(stage = %PipelineStage::Shaping, "Shaping response");
    Ok(shape_response(response, relevant, retrieved))
}

/// The embedding must have exactly the dimension the index was built with.
pub fn check_dimension(actual: usize, expected: usize) -> Result<(), AppError> {
    if actual == expected {
        Ok(())
    } else {
        Err(AppError::Configuration(format!(
            "embedding dimension {actual} does not match index dimension {expected}"
        )))
    }
}

fn shape_response(
    response: String,
    relevant_data: Vec<OccupationRecord>,
    matches: usize,
) -> ChatAnswer {
    ChatAnswer {
        response,
        relevant_data,
        matches,
    }
}
