// Occupation chat: retrieval-augmented answers over the ANZSCO vector index.
// All LLM calls go through llm_client — no direct chat-completion calls here.

pub mod composer;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
