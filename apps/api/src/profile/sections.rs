use serde::{Deserialize, Serialize};

/// The profile form's sections, in step order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileSection {
    PersonalDetails,
    CoreStory,
    JobPreferences,
    WorkExperience,
    Education,
    Certifications,
    Customization,
    OptionalExtras,
}

impl ProfileSection {
    pub const ALL: [ProfileSection; 8] = [
        ProfileSection::PersonalDetails,
        ProfileSection::CoreStory,
        ProfileSection::JobPreferences,
        ProfileSection::WorkExperience,
        ProfileSection::Education,
        ProfileSection::Certifications,
        ProfileSection::Customization,
        ProfileSection::OptionalExtras,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProfileSection::PersonalDetails => "personal-details",
            ProfileSection::CoreStory => "core-story",
            ProfileSection::JobPreferences => "job-preferences",
            ProfileSection::WorkExperience => "work-experience",
            ProfileSection::Education => "education",
            ProfileSection::Certifications => "certifications",
            ProfileSection::Customization => "customization",
            ProfileSection::OptionalExtras => "optional-extras",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ProfileSection::PersonalDetails => "Personal Details",
            ProfileSection::CoreStory => "Professional Summary & Skills",
            ProfileSection::JobPreferences => "Job Preferences",
            ProfileSection::WorkExperience => "Work Experience",
            ProfileSection::Education => "Education",
            ProfileSection::Certifications => "Certifications & Training",
            ProfileSection::Customization => "Customization & Fit",
            ProfileSection::OptionalExtras => "Optional Extras",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }

    /// Zero-based step position.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Document keys owned by this section.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ProfileSection::PersonalDetails => &[
                "fullName",
                "email",
                "phoneNumber",
                "linkedinUrl",
                "location",
                "visaStatus",
            ],
            ProfileSection::CoreStory => &["professionalSummary", "careerGoal", "keySkills"],
            ProfileSection::JobPreferences => &[
                "preferredJobTitles",
                "desiredIndustry",
                "availability",
                "preferredWorkType",
            ],
            ProfileSection::WorkExperience => &["workExperience"],
            ProfileSection::Education => &["education"],
            ProfileSection::Certifications => &["certifications"],
            ProfileSection::Customization => &["keyStrengths", "culturalFitNotes"],
            ProfileSection::OptionalExtras => &[
                "volunteerExperience",
                "languages",
                "publicationsOrPortfolios",
                "willingToRelocate",
            ],
        }
    }
}
