// Prompt constants for resume-section generation.

/// Heading every generated section starts with.
pub const EXPERIENCE_HEADING: &str = "## Professional Experience";

pub const RESUME_SYSTEM: &str = "You are an expert resume writer for the Australian job market. \
    Respond with the resume section only, as clean Markdown.";

/// Replace `{profile_context}`, `{job_description}`, `{heading}` and
/// `{grounding_instruction}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Rewrite the 'Work Experience' section of the user's profile so it is tailored to the job description below.

Instructions:
- Focus on quantifiable achievements. Use numbers and metrics where the profile supports them.
- Use strong action verbs.
- Rephrase the user's experience to directly match the key requirements in the job description.
- Output the result as a clean string, ready to be used. Start with the heading "{heading}".
- {grounding_instruction}

User's professional experience (for context):
{profile_context}

Target job description:
{job_description}

Generated resume section:"#;
