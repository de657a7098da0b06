// src/llm/openai.rs
// Chat-completions client for any OpenAI-compatible endpoint (Groq by
// default). Images and opaque documents travel as data-URL content parts
// on the final user message.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Client;
use serde_json::{Value, json};

use crate::config::CONFIG;

use super::provider::{CompletionRequest, LlmProvider};

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: String, api_base: String, temperature: f32, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            api_base,
            temperature,
        }
    }

    pub fn from_config() -> Result<Self> {
        if CONFIG.api_key.is_empty() {
            bail!("ATTACHE_API_KEY not set");
        }
        Ok(Self::new(
            CONFIG.api_key.clone(),
            CONFIG.api_base.clone(),
            CONFIG.temperature,
            Duration::from_secs(CONFIG.provider_timeout),
        ))
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Assemble the messages array: system instructions, prior history,
    /// then the final user turn (multimodal when attachments are present).
    pub(crate) fn build_messages(request: &CompletionRequest) -> Vec<Value> {
        let mut messages = Vec::with_capacity(request.history.len() + 2);
        messages.push(json!({
            "role": "system",
            "content": request.instructions,
        }));
        for message in &request.history {
            messages.push(json!({
                "role": message.role,
                "content": message.content,
            }));
        }

        if request.images.is_empty() && request.documents.is_empty() {
            messages.push(json!({
                "role": "user",
                "content": request.prompt,
            }));
        } else {
            let mut parts = vec![json!({ "type": "text", "text": request.prompt })];
            for image in &request.images {
                parts.push(json!({
                    "type": "image_url",
                    "image_url": { "url": data_url(&image.mime, &image.bytes) },
                }));
            }
            for document in &request.documents {
                parts.push(json!({
                    "type": "file",
                    "file": {
                        "filename": document.name,
                        "file_data": data_url(&document.mime, &document.bytes),
                    },
                }));
            }
            messages.push(json!({ "role": "user", "content": parts }));
        }

        messages
    }
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let payload = json!({
            "model": request.model,
            "messages": Self::build_messages(&request),
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Provider API error {}: {}", status, error_text));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse provider response")?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("Provider response contained no reply text"))
    }
}
