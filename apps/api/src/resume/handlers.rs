//! Axum route handlers for resume-section generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::resume::generator::generate_resume_section;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeRequest {
    #[serde(default)]
    pub job_data: Option<JobData>,
}

#[derive(Debug, Deserialize)]
pub struct JobData {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResumeResponse {
    pub resume: String,
}

/// POST /api/generate-resume (also served as /api/generate-cover-letter)
///
/// Token is checked before the body is read; the profile is looked up only
/// for a usable job description.
pub async fn handle_generate_resume(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<GenerateResumeRequest>, JsonRejection>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    let description = payload
        .ok()
        .and_then(|Json(body)| body.job_data)
        .and_then(|job| job.description)
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing or invalid job data".to_string()))?;

    let profile = state
        .profiles
        .get(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let resume = generate_resume_section(state.llm.as_ref(), &profile, &description).await?;
    Ok(Json(GenerateResumeResponse { resume }))
}
