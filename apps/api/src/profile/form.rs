//! Profile form modes as an explicit state machine.
//!
//! `Viewing` is the read-only review of a saved profile, `EditingAll` walks the
//! sections as steps, and `EditingSection` edits one section from the review.
//! Transitions are pure; callers decide validity and persistence.

use serde::Serialize;

use crate::profile::sections::ProfileSection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "section", rename_all = "camelCase")]
pub enum FormMode {
    Viewing,
    EditingAll(ProfileSection),
    EditingSection(ProfileSection),
}

impl FormMode {
    /// Mode after the stored profile has been looked up.
    pub fn on_load(profile_exists: bool) -> Self {
        if profile_exists {
            FormMode::Viewing
        } else {
            FormMode::EditingAll(ProfileSection::ALL[0])
        }
    }

    /// Advances one step if the current step validated. Stays on the last step.
    #[allow(dead_code)] // step navigation runs in the web client
    pub fn next(self, step_valid: bool) -> Self {
        match self {
            FormMode::EditingAll(step) if step_valid => {
                FormMode::EditingAll(step.next().unwrap_or(step))
            }
            other => other,
        }
    }

    /// Goes back one step without validating. Stays on the first step.
    #[allow(dead_code)] // step navigation runs in the web client
    pub fn previous(self) -> Self {
        match self {
            FormMode::EditingAll(step) => FormMode::EditingAll(step.previous().unwrap_or(step)),
            other => other,
        }
    }

    /// Opens a single section for editing.
    pub fn edit_section(self, section: ProfileSection) -> Self {
        FormMode::EditingSection(section)
    }

    /// A single-section save returns to the review; a step save stays put.
    pub fn save_succeeded(self) -> Self {
        match self {
            FormMode::EditingSection(_) => FormMode::Viewing,
            other => other,
        }
    }

    /// Abandons editing and returns to the review.
    #[allow(dead_code)] // step navigation runs in the web client
    pub fn cancel(self) -> Self {
        FormMode::Viewing
    }

    /// Section a save in this mode validates and writes.
    pub fn save_target(self) -> Option<ProfileSection> {
        match self {
            FormMode::Viewing => None,
            FormMode::EditingAll(step) => Some(step),
            FormMode::EditingSection(section) => Some(section),
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(self, FormMode::Viewing)
    }
}
