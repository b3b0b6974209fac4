// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Literal substituted for any attribute or field that has no value.
pub const NOT_PROVIDED: &str = "Not provided";

/// Instruction appended to every grounded prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    Use ONLY the data provided above. Do NOT invent occupations, codes, employers, \
    dates, figures or eligibility. Where a field is marked \"Not provided\", say the \
    information is unavailable rather than guessing.";

/// Substitutes `{key}` placeholders in a single pass, so values that happen to
/// contain placeholder syntax are never expanded. Unknown placeholders are
/// left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
