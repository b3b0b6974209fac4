//! Profile validation, per form section.
//!
//! Errors are keyed by field path (`fullName`, `workExperience.0.startDate`)
//! so a client can attach each message to its input. `today` is passed in
//! rather than read from the clock.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::profile::models::{UserProfile, PRESENT};
use crate::profile::sections::ProfileSection;

pub type FieldErrors = BTreeMap<String, String>;

/// Validates one section of the profile.
pub fn validate_section(
    profile: &UserProfile,
    section: ProfileSection,
    today: NaiveDate,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match section {
        ProfileSection::PersonalDetails => {
            require(&mut errors, "fullName", &profile.full_name, "Full name is required");
            if profile.email.trim().is_empty() {
                errors.insert("email".into(), "Email is required".into());
            } else if !is_valid_email(profile.email.trim()) {
                errors.insert("email".into(), "Please enter a valid email address".into());
            }
            require(&mut errors, "phoneNumber", &profile.phone_number, "Phone number is required");
            require(&mut errors, "location", &profile.location, "Location is required");
        }
        ProfileSection::CoreStory => {
            require(
                &mut errors,
                "professionalSummary",
                &profile.professional_summary,
                "Professional summary is required",
            );
            if profile.key_skills.is_empty() {
                errors.insert("keySkills".into(), "Key skills are required".into());
            }
        }
        ProfileSection::JobPreferences => {
            if profile.preferred_job_titles.is_empty() {
                errors.insert(
                    "preferredJobTitles".into(),
                    "Preferred job titles are required".into(),
                );
            }
            require(
                &mut errors,
                "desiredIndustry",
                &profile.desired_industry,
                "Desired industry is required",
            );
        }
        ProfileSection::WorkExperience => {
            for (i, role) in profile.work_experience.iter().enumerate() {
                let key = |field: &str| format!("workExperience.{i}.{field}");
                require(&mut errors, &key("title"), &role.title, "Job title is required");
                require(&mut errors, &key("company"), &role.company, "Company name is required");
                require(&mut errors, &key("summary"), &role.summary, "Please provide role details");
                require(&mut errors, &key("location"), &role.location, "Work location is required");
                check_date_range(
                    &mut errors,
                    &key("startDate"),
                    &key("endDate"),
                    &role.start_date,
                    &role.end_date,
                    "End Date is required or select Present",
                    today,
                );
            }
            if profile.work_experience.is_empty() {
                errors.insert(
                    "workExperience.minimum".into(),
                    "At least one work experience entry is required.".into(),
                );
            }
        }
        ProfileSection::Education => {
            for (i, edu) in profile.education.iter().enumerate() {
                let key = |field: &str| format!("education.{i}.{field}");
                require(
                    &mut errors,
                    &key("qualification"),
                    &edu.qualification,
                    "Qualification is required",
                );
                require(
                    &mut errors,
                    &key("institution"),
                    &edu.institution,
                    "Institution name is required",
                );
                check_date_range(
                    &mut errors,
                    &key("startDate"),
                    &key("endDate"),
                    &edu.start_date,
                    &edu.end_date,
                    "End Date is required or select Expected",
                    today,
                );
            }
        }
        ProfileSection::Certifications => {
            for (i, cert) in profile.certifications.iter().enumerate() {
                let key = |field: &str| format!("certifications.{i}.{field}");
                require(&mut errors, &key("name"), &cert.name, "Certification Name is required");
                require(&mut errors, &key("issuer"), &cert.issuer, "Issuer is required");
                if let Some(message) = check_year(&cert.year, today.year()) {
                    errors.insert(key("year"), message.into());
                }
            }
        }
        ProfileSection::Customization | ProfileSection::OptionalExtras => {}
    }
    errors
}

/// Validates every section, collecting all failures.
pub fn validate_profile(profile: &UserProfile, today: NaiveDate) -> FieldErrors {
    ProfileSection::ALL
        .into_iter()
        .flat_map(|section| validate_section(profile, section, today))
        .collect()
}

/// First section, in step order, with a validation error.
pub fn first_invalid_section(profile: &UserProfile, today: NaiveDate) -> Option<ProfileSection> {
    ProfileSection::ALL
        .into_iter()
        .find(|s| !validate_section(profile, *s, today).is_empty())
}

/// Share of sections that currently validate, in `[0, 1]`.
pub fn completeness(profile: &UserProfile, today: NaiveDate) -> f64 {
    let valid = ProfileSection::ALL
        .into_iter()
        .filter(|s| validate_section(profile, *s, today).is_empty())
        .count();
    valid as f64 / ProfileSection::ALL.len() as f64
}

fn require(errors: &mut FieldErrors, key: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(key.to_string(), message.to_string());
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn check_date_range(
    errors: &mut FieldErrors,
    start_key: &str,
    end_key: &str,
    start_raw: &str,
    end_raw: &str,
    end_missing_message: &str,
    today: NaiveDate,
) {
    let start = if start_raw.trim().is_empty() {
        errors.insert(start_key.to_string(), "Start Date is required".to_string());
        None
    } else {
        match parse_date(start_raw) {
            Some(date) if date > today => {
                errors.insert(
                    start_key.to_string(),
                    "Start Date cannot be in the future".to_string(),
                );
                Some(date)
            }
            Some(date) => Some(date),
            None => {
                errors.insert(
                    start_key.to_string(),
                    "Start Date must be a date in YYYY-MM-DD format".to_string(),
                );
                None
            }
        }
    };

    if end_raw.trim() == PRESENT {
        return;
    }
    if end_raw.trim().is_empty() {
        errors.insert(end_key.to_string(), end_missing_message.to_string());
        return;
    }
    let Some(end) = parse_date(end_raw) else {
        errors.insert(
            end_key.to_string(),
            "End Date must be a date in YYYY-MM-DD format".to_string(),
        );
        return;
    };
    if end > today {
        errors.insert(end_key.to_string(), "End Date cannot be in the future".to_string());
    }
    if start.is_some_and(|start| start > end) {
        errors.insert(
            end_key.to_string(),
            "End Date cannot be before Start Date".to_string(),
        );
    }
}

fn check_year(raw: &str, current_year: i32) -> Option<&'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some("Year is required");
    }
    if raw.len() != 4 || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Some("Year must be a 4-digit number");
    }
    match raw.parse::<i32>() {
        Ok(year) if year > current_year => Some("Year cannot be in the future"),
        Ok(_) => None,
        Err(_) => Some("Year must be a 4-digit number"),
    }
}

/// `local@domain.tld` shape: one `@`, no whitespace, and a dot inside the domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
