//! Resume-section generation.
//!
//! Flow: profile context → prompt → LLM generate → enforce heading.

use serde::Serialize;
use tracing::info;

use crate::errors::{AppError, UpstreamService};
use crate::llm_client::prompts::{fill_template, GROUNDING_INSTRUCTION};
use crate::llm_client::{ChatModel, ChatRequest, GenerationParams};
use crate::profile::models::{Education, UserProfile, WorkExperience};
use crate::resume::prompts::{EXPERIENCE_HEADING, RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM};

pub const RESUME_PARAMS: GenerationParams = GenerationParams {
    model: "gpt-4-turbo",
    temperature: 0.5,
    max_tokens: 1500,
};

/// Longest job description, in characters, sent to the model.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 10_000;

/// The slice of the profile the model sees.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileContext<'a> {
    work_experience: &'a [WorkExperience],
    key_skills: &'a [String],
    education: &'a [Education],
}

/// Builds the user prompt for `profile` and `job_description`.
pub fn build_resume_prompt(
    profile: &UserProfile,
    job_description: &str,
) -> Result<String, AppError> {
    let context = ProfileContext {
        work_experience: &profile.work_experience,
        key_skills: &profile.key_skills,
        education: &profile.education,
    };
    let profile_context =
        serde_json::to_string_pretty(&context).map_err(|e| AppError::Internal(e.into()))?;

    Ok(fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("heading", EXPERIENCE_HEADING),
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("profile_context", &profile_context),
            (
                "job_description",
                truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS),
            ),
        ],
    ))
}

/// Generates the tailored "Professional Experience" section.
pub async fn generate_resume_section(
    chat: &dyn ChatModel,
    profile: &UserProfile,
    job_description: &str,
) -> Result<String, AppError> {
    let user = build_resume_prompt(profile, job_description)?;
    info!(
        "Generating resume section ({} roles, model {})",
        profile.work_experience.len(),
        RESUME_PARAMS.model
    );

    let raw = chat
        .complete(ChatRequest {
            system: RESUME_SYSTEM,
            user: &user,
            params: RESUME_PARAMS,
        })
        .await?;

    with_heading(&raw).ok_or_else(|| {
        AppError::upstream(UpstreamService::ChatModel, "empty resume section")
    })
}

/// Trims the model output and makes sure it opens with the fixed heading.
fn with_heading(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if text.starts_with(EXPERIENCE_HEADING) {
        Some(text.to_string())
    } else {
        Some(format!("{EXPERIENCE_HEADING}\n\n{text}"))
    }
}

/// First `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}
