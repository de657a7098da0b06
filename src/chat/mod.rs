// src/chat/mod.rs
// Chat orchestration: turns a submitted conversation plus persona, quick
// action, and attachments into a single provider call and a
// {content, color} reply.

pub mod attachment;
pub mod conversation;
pub mod quick_action;

pub use attachment::{AttachmentKind, UploadedFile};
pub use conversation::{ChatMessage, Role, split_conversation};
pub use quick_action::QuickAction;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::CONFIG;
use crate::extract::PdfExtractor;
use crate::llm::{CompletionRequest, DocumentPayload, ImagePayload, LlmProvider};
use crate::persona;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Malformed conversation shape; reported as a client error before any
    /// side-effecting work happens.
    #[error("{0}")]
    InvalidConversation(String),

    /// Any downstream failure from the provider call.
    #[error("{0}")]
    Provider(#[from] anyhow::Error),
}

/// One submitted chat turn, already decoded from JSON or multipart.
#[derive(Debug, Default)]
pub struct ChatTurn {
    pub messages: Vec<ChatMessage>,
    pub persona: Option<String>,
    pub quick_action: Option<String>,
    pub attachments: Vec<UploadedFile>,
}

/// The reply text plus the persona's display color.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub content: String,
    pub color: String,
}

/// Stateless per-request orchestrator. The only shared pieces are the
/// provider client and the extractor configuration.
pub struct ChatOrchestrator {
    provider: Arc<dyn LlmProvider>,
    extractor: PdfExtractor,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, extractor: PdfExtractor) -> Self {
        Self {
            provider,
            extractor,
        }
    }

    pub async fn respond(&self, turn: ChatTurn) -> Result<ChatOutcome, ChatError> {
        let persona = persona::resolve(turn.persona.as_deref());
        let split = conversation::split_conversation(turn.messages)?;

        let mut prompt = split.last_user.content;
        let mut images: Vec<ImagePayload> = Vec::new();
        let mut documents: Vec<DocumentPayload> = Vec::new();

        for file in turn.attachments {
            match file.kind() {
                AttachmentKind::Image => {
                    info!("Forwarding image attachment: {} ({})", file.name, file.mime);
                    images.push(ImagePayload {
                        name: file.name,
                        mime: file.mime,
                        bytes: file.bytes,
                    });
                }
                AttachmentKind::InlineText => {
                    info!("Inlining text attachment: {} ({})", file.name, file.mime);
                    let text = String::from_utf8_lossy(&file.bytes);
                    prompt.push_str(&inline_block(&file.name, text.trim_end()));
                }
                AttachmentKind::InlinePdf => {
                    match self.extractor.extract(&file.name, &file.bytes).await {
                        Ok(text) => {
                            info!("Inlined extracted PDF text: {}", file.name);
                            prompt.push_str(&inline_block(&file.name, text.trim()));
                        }
                        Err(e) => {
                            // Degraded, not fatal: the turn still goes out.
                            warn!("PDF extraction failed for {}: {:#}", file.name, e);
                            prompt.push_str(&pdf_failure_marker(&file.name));
                        }
                    }
                }
                AttachmentKind::OpaqueDocument => {
                    info!(
                        "Forwarding opaque document attachment: {} ({})",
                        file.name, file.mime
                    );
                    documents.push(DocumentPayload {
                        name: file.name,
                        mime: file.mime,
                        bytes: file.bytes,
                    });
                }
            }
        }

        if let Some(action) = turn.quick_action.as_deref().and_then(QuickAction::parse) {
            prompt = action.apply(&prompt);
        }

        // Any image attachment moves the call to the vision-capable model.
        let model = if images.is_empty() {
            CONFIG.model.clone()
        } else {
            CONFIG.vision_model.clone()
        };

        let instructions = split
            .system_override
            .unwrap_or_else(|| persona.instructions.to_string());

        info!(
            "Dispatching chat turn: persona={}, model={}, history={}, images={}, documents={}",
            persona.id,
            model,
            split.history.len(),
            images.len(),
            documents.len()
        );

        let content = self
            .provider
            .complete(CompletionRequest {
                model,
                instructions,
                history: split.history,
                prompt,
                images,
                documents,
            })
            .await?;

        Ok(ChatOutcome {
            content,
            color: persona.color.to_string(),
        })
    }
}

fn inline_block(name: &str, text: &str) -> String {
    format!("\n\n--- Attached file: {name} ---\n{text}\n--- End of {name} ---")
}

/// Visible warning substituted for a PDF whose extraction failed.
pub fn pdf_failure_marker(name: &str) -> String {
    format!("\n\n[Could not extract text from attached PDF: {name}]")
}
