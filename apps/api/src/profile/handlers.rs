use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::profile::form::FormMode;
use crate::profile::models::UserProfile;
use crate::profile::sections::ProfileSection;
use crate::profile::validation::{
    completeness, first_invalid_section, validate_profile, validate_section,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSaveResponse {
    pub profile: UserProfile,
    pub next_mode: FormMode,
}

#[derive(Debug, Serialize)]
pub struct FormStep {
    pub id: &'static str,
    pub title: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormBootstrap {
    pub mode: FormMode,
    pub read_only: bool,
    pub steps: Vec<FormStep>,
    /// First section that does not validate yet, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_incomplete: Option<ProfileSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
}

/// Which form flow a section save came from.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveFlow {
    #[default]
    Section,
    Steps,
}

impl SaveFlow {
    /// Form mode a save from this flow is made in.
    pub fn editing(self, section: ProfileSection) -> FormMode {
        match self {
            SaveFlow::Section => FormMode::Viewing.edit_section(section),
            SaveFlow::Steps => FormMode::EditingAll(section),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SectionSaveQuery {
    #[serde(default)]
    pub flow: SaveFlow,
}

/// GET /api/profile
pub async fn handle_get_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .profiles
        .get(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(profile))
}

/// GET /api/profile/form
///
/// Initial form mode and the ordered steps. Review mode when a profile exists,
/// otherwise the first step of the multi-step flow.
pub async fn handle_form_bootstrap(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<FormBootstrap>, AppError> {
    let profile = state.profiles.get(&user.uid).await?;
    let steps = ProfileSection::ALL
        .into_iter()
        .map(|s| FormStep {
            id: s.id(),
            title: s.title(),
            fields: s.fields(),
        })
        .collect();

    let mode = FormMode::on_load(profile.is_some());
    let first_incomplete = profile
        .as_ref()
        .and_then(|p| first_invalid_section(p, Utc::now().date_naive()));

    Ok(Json(FormBootstrap {
        mode,
        read_only: mode.is_read_only(),
        steps,
        first_incomplete,
        profile,
    }))
}

/// PUT /api/profile
///
/// Saves the whole profile. Every section must validate.
pub async fn handle_save_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<UserProfile>, AppError> {
    let Json(mut profile) =
        payload.map_err(|_| AppError::InvalidInput("Invalid profile data".to_string()))?;

    if profile.email.trim().is_empty() {
        if let Some(email) = &user.email {
            profile.email = email.clone();
        }
    }

    let now = Utc::now();
    let errors = validate_profile(&profile, now.date_naive());
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let patch = stamped_patch(&mut profile, &user.uid, now, &ProfileSection::ALL)?;
    state.profiles.merge(&user.uid, patch).await?;
    info!(sections = ProfileSection::ALL.len(), "Profile saved");

    Ok(Json(profile))
}

/// PUT /api/profile/sections/:section
///
/// Validates and merges one section. Other stored sections are untouched.
pub async fn handle_save_section(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<String>,
    query: Result<Query<SectionSaveQuery>, QueryRejection>,
    payload: Result<Json<UserProfile>, JsonRejection>,
) -> Result<Json<SectionSaveResponse>, AppError> {
    let section = ProfileSection::from_id(&section_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown profile section: {section_id}")))?;
    let Query(query) =
        query.map_err(|_| AppError::InvalidInput("Invalid save flow".to_string()))?;
    let Json(incoming) =
        payload.map_err(|_| AppError::InvalidInput("Invalid profile data".to_string()))?;

    let mode = query.flow.editing(section);
    let Some(target) = mode.save_target() else {
        return Err(AppError::InvalidInput("Nothing to save".to_string()));
    };

    let mut profile = state.profiles.get(&user.uid).await?.unwrap_or_default();
    profile.apply_section(target, &incoming);

    let now = Utc::now();
    let errors = validate_section(&profile, target, now.date_naive());
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let patch = stamped_patch(&mut profile, &user.uid, now, &[target])?;
    state.profiles.merge(&user.uid, patch).await?;
    info!(section = target.id(), "Profile section saved");

    Ok(Json(SectionSaveResponse {
        profile,
        next_mode: mode.save_succeeded(),
    }))
}

/// Stamps the server-managed fields on `profile` and returns the merge patch
/// for `sections` plus those fields.
fn stamped_patch(
    profile: &mut UserProfile,
    uid: &str,
    now: DateTime<Utc>,
    sections: &[ProfileSection],
) -> Result<Map<String, Value>, AppError> {
    profile.user_id = Some(uid.to_string());
    profile.profile_last_updated = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    profile.profile_completeness = Some(completeness(profile, now.date_naive()));

    let mut patch = profile
        .to_patch(sections)
        .map_err(|e| AppError::Internal(e.into()))?;
    patch.insert("userId".to_string(), Value::from(uid));
    patch.insert(
        "profileLastUpdated".to_string(),
        Value::from(profile.profile_last_updated.clone()),
    );
    patch.insert(
        "profileCompleteness".to_string(),
        Value::from(profile.profile_completeness),
    );
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_stamped_patch_adds_server_fields() {
        let mut profile = UserProfile {
            full_name: "Ana Silva".to_string(),
            ..Default::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap();
        let patch =
            stamped_patch(&mut profile, "uid-1", now, &[ProfileSection::PersonalDetails]).unwrap();

        assert_eq!(patch["userId"], "uid-1");
        assert_eq!(patch["profileLastUpdated"], "2025-06-15T09:30:00.000Z");
        assert_eq!(patch["fullName"], "Ana Silva");
        assert!(patch.get("keySkills").is_none());
        assert_eq!(profile.user_id.as_deref(), Some("uid-1"));
        assert_eq!(
            patch["profileCompleteness"].as_f64(),
            profile.profile_completeness
        );
    }

    #[test]
    fn test_save_flow_defaults_to_single_section() {
        let q: SectionSaveQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.flow, SaveFlow::Section);
        let q: SectionSaveQuery = serde_json::from_str(r#"{"flow":"steps"}"#).unwrap();
        assert_eq!(q.flow, SaveFlow::Steps);
    }

    #[test]
    fn test_each_flow_saves_the_section_it_edits() {
        for section in ProfileSection::ALL {
            assert_eq!(SaveFlow::Section.editing(section).save_target(), Some(section));
            assert_eq!(SaveFlow::Steps.editing(section).save_target(), Some(section));
        }
        assert_eq!(
            SaveFlow::Section.editing(ProfileSection::Education),
            FormMode::EditingSection(ProfileSection::Education)
        );
    }
}
