// Tailored "Professional Experience" section for a job description, written from
// the caller's stored profile. One LLM call per request.

pub mod generator;
pub mod handlers;
pub mod prompts;
