// src/llm/provider.rs
// Provider trait and request types. The orchestrator depends on this seam,
// never on a concrete client, so tests can observe or fail the call.

use anyhow::Result;
use async_trait::async_trait;

use crate::chat::conversation::ChatMessage;

/// An image forwarded to a vision-capable model.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// An opaque document forwarded alongside the prompt.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Everything a single completion call needs.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub instructions: String,
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub images: Vec<ImagePayload>,
    pub documents: Vec<DocumentPayload>,
}

/// Universal LLM provider interface
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Run one completion and return the reply text.
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
