//! Prompt composition — turns a question plus filtered occupation records into
//! the (system, user) instruction pair.

use crate::chat::prompts::{
    CHAT_SYSTEM, GROUNDED_PROMPT_TEMPLATE, NO_MATCH_TEMPLATE, OCCUPATION_BLOCK_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, GROUNDING_INSTRUCTION, NOT_PROVIDED};
use crate::models::occupation::OccupationRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub system: &'static str,
    pub user: String,
}

/// Builds the prompt pair. An empty record list switches to the no-match
/// template; a blank question is `InvalidInput`.
pub fn compose_prompt(
    question: &str,
    records: &[OccupationRecord],
) -> Result<ComposedPrompt, AppError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(AppError::InvalidInput("Message is required".to_string()));
    }

    let user = if records.is_empty() {
        fill_template(NO_MATCH_TEMPLATE, &[("question", question)])
    } else {
        let occupations = records
            .iter()
            .enumerate()
            .map(|(i, record)| occupation_block(i + 1, record))
            .collect::<Vec<_>>()
            .join("\n");
        fill_template(
            GROUNDED_PROMPT_TEMPLATE,
            &[
                ("question", question),
                ("occupations", &occupations),
                ("grounding_instruction", GROUNDING_INSTRUCTION),
            ],
        )
    };

    Ok(ComposedPrompt {
        system: CHAT_SYSTEM,
        user,
    })
}

fn occupation_block(n: usize, record: &OccupationRecord) -> String {
    let text = |value: &Option<String>| value.as_deref().unwrap_or(NOT_PROVIDED).to_string();
    let money = |value: &Option<String>| match value.as_deref() {
        Some(v) if v.starts_with('$') => v.to_string(),
        Some(v) => format!("${v}"),
        None => NOT_PROVIDED.to_string(),
    };

    let n = n.to_string();
    let visa = &record.visa_lists;
    let earnings = &record.earnings;
    let states = &record.states;

    let values = [
        ("occupation", text(&record.occupation)),
        ("code", text(&record.code)),
        ("description", text(&record.description)),
        ("skill_level", text(&record.skill_level)),
        ("tasks", text(&record.tasks)),
        ("specialisations", text(&record.specialisations)),
        ("authority", text(&record.skill_assessing_authority)),
        ("mltssl", text(&visa.mltssl)),
        ("stsol", text(&visa.stsol)),
        ("pmsol", text(&visa.pmsol)),
        ("regional", text(&visa.regional)),
        ("earnings_male", money(&earnings.male)),
        ("earnings_female", money(&earnings.female)),
        ("earnings_total", money(&earnings.total)),
        ("nsw", text(&states.nsw)),
        ("vic", text(&states.vic)),
        ("qld", text(&states.qld)),
        ("wa", text(&states.wa)),
        ("sa", text(&states.sa)),
        ("tas", text(&states.tas)),
        ("act", text(&states.act)),
        ("nt", text(&states.nt)),
    ];

    let mut pairs: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
    pairs.push(("n", &n));
    fill_template(OCCUPATION_BLOCK_TEMPLATE, &pairs)
}
