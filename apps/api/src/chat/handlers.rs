//! Axum route handlers for the Chat API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::chat::pipeline::{answer_question, ChatAnswer, ChatDeps};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /api/chat
///
/// Answers one question from retrieved occupation data. Stateless: prior turns
/// shown in the client are not sent to the model.
pub async fn handle_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequestBody>, JsonRejection>,
) -> Result<Json<ChatAnswer>, AppError> {
    let message = payload
        .ok()
        .and_then(|Json(body)| body.message)
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Message is required".to_string()))?;

    let deps = ChatDeps {
        embedder: state.embedder.as_ref(),
        index: state.index.as_ref(),
        chat: state.llm.as_ref(),
        embedding_dimension: state.config.embedding_dimension,
    };

    let span = info_span!("chat", request_id = %Uuid::new_v4());
    let answer = answer_question(deps, &message).instrument(span).await?;

    Ok(Json(answer))
}
