use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::profile::sections::ProfileSection;

/// Marker stored in `endDate` for an ongoing role or course.
pub const PRESENT: &str = "Present";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub summary: String,
    pub location: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD` or `Present`.
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub qualification: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub honors: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,
}

/// One user's profile document, keyed by user id in the profile store.
///
/// List fields accept either a JSON array or the joined form the profile form
/// submits, and are always stored as arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    // personal-details
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub linkedin_url: String,
    pub location: String,
    pub visa_status: String,

    // core-story
    pub professional_summary: String,
    pub career_goal: String,
    #[serde(deserialize_with = "comma_list")]
    pub key_skills: Vec<String>,

    // job-preferences
    #[serde(deserialize_with = "comma_list")]
    pub preferred_job_titles: Vec<String>,
    pub desired_industry: String,
    pub availability: String,
    pub preferred_work_type: String,

    #[serde(deserialize_with = "null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub certifications: Vec<Certification>,

    // customization
    #[serde(deserialize_with = "comma_list")]
    pub key_strengths: Vec<String>,
    pub cultural_fit_notes: String,

    // optional-extras
    pub volunteer_experience: String,
    #[serde(deserialize_with = "comma_list")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "line_list")]
    pub publications_or_portfolios: Vec<String>,
    #[serde(deserialize_with = "yes_no")]
    pub willing_to_relocate: bool,

    // Server-managed; ignored on input.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_completeness: Option<f64>,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            full_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            linkedin_url: String::new(),
            location: String::new(),
            visa_status: "Australian Citizen".to_string(),
            professional_summary: String::new(),
            career_goal: String::new(),
            key_skills: Vec::new(),
            preferred_job_titles: Vec::new(),
            desired_industry: String::new(),
            availability: "Immediately Available".to_string(),
            preferred_work_type: "Full-time".to_string(),
            work_experience: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            key_strengths: Vec::new(),
            cultural_fit_notes: String::new(),
            volunteer_experience: String::new(),
            languages: Vec::new(),
            publications_or_portfolios: Vec::new(),
            willing_to_relocate: false,
            user_id: None,
            profile_last_updated: None,
            profile_completeness: None,
        }
    }
}

impl UserProfile {
    /// Copies the fields owned by `section` from `other`.
    pub fn apply_section(&mut self, section: ProfileSection, other: &UserProfile) {
        match section {
            ProfileSection::PersonalDetails => {
                self.full_name = other.full_name.clone();
                self.email = other.email.clone();
                self.phone_number = other.phone_number.clone();
                self.linkedin_url = other.linkedin_url.clone();
                self.location = other.location.clone();
                self.visa_status = other.visa_status.clone();
            }
            ProfileSection::CoreStory => {
                self.professional_summary = other.professional_summary.clone();
                self.career_goal = other.career_goal.clone();
                self.key_skills = other.key_skills.clone();
            }
            ProfileSection::JobPreferences => {
                self.preferred_job_titles = other.preferred_job_titles.clone();
                self.desired_industry = other.desired_industry.clone();
                self.availability = other.availability.clone();
                self.preferred_work_type = other.preferred_work_type.clone();
            }
            ProfileSection::WorkExperience => {
                self.work_experience = other.work_experience.clone();
            }
            ProfileSection::Education => self.education = other.education.clone(),
            ProfileSection::Certifications => {
                self.certifications = other.certifications.clone();
            }
            ProfileSection::Customization => {
                self.key_strengths = other.key_strengths.clone();
                self.cultural_fit_notes = other.cultural_fit_notes.clone();
            }
            ProfileSection::OptionalExtras => {
                self.volunteer_experience = other.volunteer_experience.clone();
                self.languages = other.languages.clone();
                self.publications_or_portfolios = other.publications_or_portfolios.clone();
                self.willing_to_relocate = other.willing_to_relocate;
            }
        }
    }

    /// Document fields for the given sections, as a merge patch.
    pub fn to_patch(&self, sections: &[ProfileSection]) -> Result<Map<String, Value>, serde_json::Error> {
        let Value::Object(mut all) = serde_json::to_value(self)? else {
            return Ok(Map::new());
        };
        let mut patch = Map::new();
        for field in sections.iter().flat_map(|s| s.fields()) {
            if let Some(value) = all.remove(*field) {
                patch.insert((*field).to_string(), value);
            }
        }
        Ok(patch)
    }
}

/// Splits joined form input: trims each item and drops empties.
pub fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListInput {
    Items(Vec<String>),
    Joined(String),
}

fn list_with<'de, D>(deserializer: D, separator: char) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ListInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(ListInput::Joined(raw)) => split_list(&raw, separator),
        Some(ListInput::Items(items)) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    list_with(deserializer, ',')
}

fn line_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    list_with(deserializer, '\n')
}

fn yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }
    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(t)) => matches!(t.trim().to_ascii_lowercase().as_str(), "yes" | "true"),
        None => false,
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(t)) => t,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
