use serde::Serialize;
use serde_json::{Map, Value};

use crate::retrieval::ScoredMatch;

// Metadata keys as stored in the ANZSCO vector index.
pub const KEY_OCCUPATION: &str = "ANZSCO Occupation Name";
pub const KEY_CODE: &str = "ANZSCO Occupation Code";
pub const KEY_DESCRIPTION: &str = "ANZSCO Occupation Description";
pub const KEY_SKILL_LEVEL: &str = "Skill Level";
pub const KEY_TASKS: &str = "Tasks";
pub const KEY_SPECIALISATIONS: &str = "Specialisations";
pub const KEY_ASSESSING_AUTHORITY: &str = "Skill Assessing Authority";
pub const KEY_MLTSSL: &str = "MLTSSL";
pub const KEY_STSOL: &str = "STSOL";
pub const KEY_PMSOL: &str = "PMSOL";
pub const KEY_REGIONAL: &str = "Regional (494)";
pub const KEY_EARNINGS_MALE: &str = "Avg Weekly Earnings Males";
pub const KEY_EARNINGS_FEMALE: &str = "Avg Weekly Earnings Females";
pub const KEY_EARNINGS_TOTAL: &str = "Avg Weekly Earnings Persons";
pub const KEY_NSW: &str = "New South Wales";
pub const KEY_VIC: &str = "Victoria";
pub const KEY_QLD: &str = "Queensland";
pub const KEY_WA: &str = "Western Australia";
pub const KEY_SA: &str = "South Australia";
pub const KEY_TAS: &str = "Tasmania";
pub const KEY_ACT: &str = "Australian Capital Territory";
pub const KEY_NT: &str = "Northern Territory";

/// Visa-list eligibility flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisaLists {
    pub mltssl: Option<String>,
    pub stsol: Option<String>,
    pub pmsol: Option<String>,
    pub regional: Option<String>,
}

/// Average weekly earnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Earnings {
    #[serde(rename = "avgEarningsMale")]
    pub male: Option<String>,
    #[serde(rename = "avgEarningsFemale")]
    pub female: Option<String>,
    #[serde(rename = "avgEarningsTotal")]
    pub total: Option<String>,
}

/// State and territory availability flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateAvailability {
    pub nsw: Option<String>,
    pub vic: Option<String>,
    pub qld: Option<String>,
    pub wa: Option<String>,
    pub sa: Option<String>,
    pub tas: Option<String>,
    pub act: Option<String>,
    pub nt: Option<String>,
}

/// A retrieved occupation with its similarity score.
/// Every attribute is optional: index metadata is sparse.
/// Serializes flat, in the shape the chat client renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationRecord {
    pub id: String,
    pub score: f32,
    pub occupation: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub skill_level: Option<String>,
    pub tasks: Option<String>,
    pub specialisations: Option<String>,
    pub skill_assessing_authority: Option<String>,
    #[serde(flatten)]
    pub visa_lists: VisaLists,
    #[serde(flatten)]
    pub earnings: Earnings,
    #[serde(flatten)]
    pub states: StateAvailability,
}

impl OccupationRecord {
    pub fn from_match(m: &ScoredMatch) -> Self {
        let field = |key: &str| metadata_text(&m.metadata, key);
        OccupationRecord {
            id: m.id.clone(),
            score: m.score,
            occupation: field(KEY_OCCUPATION),
            description: field(KEY_DESCRIPTION),
            code: field(KEY_CODE),
            skill_level: field(KEY_SKILL_LEVEL),
            tasks: field(KEY_TASKS),
            specialisations: field(KEY_SPECIALISATIONS),
            skill_assessing_authority: field(KEY_ASSESSING_AUTHORITY),
            visa_lists: VisaLists {
                mltssl: field(KEY_MLTSSL),
                stsol: field(KEY_STSOL),
                pmsol: field(KEY_PMSOL),
                regional: field(KEY_REGIONAL),
            },
            earnings: Earnings {
                male: field(KEY_EARNINGS_MALE),
                female: field(KEY_EARNINGS_FEMALE),
                total: field(KEY_EARNINGS_TOTAL),
            },
            states: StateAvailability {
                nsw: field(KEY_NSW),
                vic: field(KEY_VIC),
                qld: field(KEY_QLD),
                wa: field(KEY_WA),
                sa: field(KEY_SA),
                tas: field(KEY_TAS),
                act: field(KEY_ACT),
                nt: field(KEY_NT),
            },
        }
    }
}

/// Renders a metadata value as prompt/display text.
/// Null, blank strings, empty lists and nested objects count as absent.
fn metadata_text(metadata: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match metadata.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scored(metadata: Value) -> ScoredMatch {
        ScoredMatch {
            id: "261313".to_string(),
            score: 0.82,
            metadata: metadata.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_from_match_reads_all_known_keys() {
        let record = OccupationRecord::from_match(&scored(json!({
            "ANZSCO Occupation Name": "Software Engineer",
            "ANZSCO Occupation Code": 261313,
            "Skill Level": 1,
            "MLTSSL": "Yes",
            "Regional (494)": true,
            "Avg Weekly Earnings Persons": 2436.5,
            "Tasks": ["Researching user needs", "Writing code"],
            "Victoria": "Yes",
        })));

        assert_eq!(record.occupation.as_deref(), Some("Software Engineer"));
        assert_eq!(record.code.as_deref(), Some("261313"));
        assert_eq!(record.skill_level.as_deref(), Some("1"));
        assert_eq!(record.visa_lists.mltssl.as_deref(), Some("Yes"));
        assert_eq!(record.visa_lists.regional.as_deref(), Some("true"));
        assert_eq!(record.earnings.total.as_deref(), Some("2436.5"));
        assert_eq!(
            record.tasks.as_deref(),
            Some("Researching user needs, Writing code")
        );
        assert_eq!(record.states.vic.as_deref(), Some("Yes"));
        assert!(record.states.nt.is_none());
    }

    #[test]
    fn test_from_match_tolerates_sparse_metadata() {
        let record = OccupationRecord::from_match(&scored(json!({
            "ANZSCO Occupation Name": "  ",
            "STSOL": null,
            "Tasks": [],
        })));
        assert!(record.occupation.is_none());
        assert!(record.visa_lists.stsol.is_none());
        assert!(record.tasks.is_none());
        assert_eq!(record.id, "261313");
    }

    #[test]
    fn test_serializes_flat_camel_case_with_nulls() {
        let record = OccupationRecord::from_match(&scored(json!({
            "ANZSCO Occupation Name": "Registered Nurse",
            "Avg Weekly Earnings Males": 1900,
        })));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["occupation"], "Registered Nurse");
        assert_eq!(json["avgEarningsMale"], "1900");
        assert!(json["skillAssessingAuthority"].is_null());
        assert!(json["mltssl"].is_null());
        assert!(json["nsw"].is_null());
        assert!(json.get("visa_lists").is_none());
    }
}
