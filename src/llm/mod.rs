// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod openai;
pub mod provider;

pub use openai::OpenAiClient;
pub use provider::{CompletionRequest, DocumentPayload, ImagePayload, LlmProvider};
