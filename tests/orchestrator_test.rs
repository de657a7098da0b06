// tests/orchestrator_test.rs
// Orchestrator behavior against a recording provider: persona resolution,
// quick actions, attachment routing, and model selection - no network, no
// real model calls.

use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use async_trait::async_trait;

use attache::chat::{ChatError, ChatMessage, ChatOrchestrator, ChatTurn, Role, UploadedFile};
use attache::config::CONFIG;
use attache::extract::PdfExtractor;
use attache::llm::{CompletionRequest, LlmProvider};
use attache::persona;

// ============================================================================
// Test Utilities
// ============================================================================

struct RecordingProvider {
    reply: String,
    fail: bool,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl RecordingProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail: false,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            fail: true,
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    fn last_request(&self) -> CompletionRequest {
        self.seen
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("provider was never called")
    }
}

#[async_trait]
impl LlmProvider for RecordingProvider {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.seen.lock().unwrap().push(request);
        if self.fail {
            bail!("model unavailable");
        }
        Ok(self.reply.clone())
    }
}

fn orchestrator(provider: Arc<RecordingProvider>) -> ChatOrchestrator {
    ChatOrchestrator::new(provider, PdfExtractor::new("/bin/false"))
}

fn user(content: &str) -> ChatMessage {
    ChatMessage::new(Role::User, content)
}

fn turn(messages: Vec<ChatMessage>) -> ChatTurn {
    ChatTurn {
        messages,
        ..Default::default()
    }
}

// ============================================================================
// Conversation validation
// ============================================================================

#[tokio::test]
async fn trailing_assistant_message_makes_no_model_call() {
    let provider = RecordingProvider::new("unused");
    let orchestrator = orchestrator(provider.clone());

    let err = orchestrator
        .respond(turn(vec![ChatMessage::new(Role::Assistant, "hi")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::InvalidConversation(_)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn empty_conversation_makes_no_model_call() {
    let provider = RecordingProvider::new("unused");
    let orchestrator = orchestrator(provider.clone());

    let err = orchestrator.respond(turn(vec![])).await.unwrap_err();

    assert!(matches!(err, ChatError::InvalidConversation(_)));
    assert_eq!(provider.calls(), 0);
}

// ============================================================================
// Persona resolution
// ============================================================================

#[tokio::test]
async fn default_persona_used_when_omitted() {
    let provider = RecordingProvider::new("Hi there!");
    let orchestrator = orchestrator(provider.clone());

    let outcome = orchestrator.respond(turn(vec![user("Hello")])).await.unwrap();

    assert_eq!(outcome.content, "Hi there!");
    assert_eq!(outcome.color, persona::resolve(None).color);

    let request = provider.last_request();
    assert_eq!(request.instructions, persona::resolve(None).instructions);
    assert_eq!(request.prompt, "Hello");
    assert_eq!(request.model, CONFIG.model);
    assert!(request.history.is_empty());
}

#[tokio::test]
async fn known_persona_supplies_instructions_and_color() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    let outcome = orchestrator
        .respond(ChatTurn {
            messages: vec![user("Hello")],
            persona: Some("tutor".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.color, "#10b981");
    assert_eq!(
        provider.last_request().instructions,
        persona::resolve(Some("tutor")).instructions
    );
}

#[tokio::test]
async fn unknown_persona_falls_back_to_default() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    let outcome = orchestrator
        .respond(ChatTurn {
            messages: vec![user("Hello")],
            persona: Some("chaos-gremlin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(outcome.color, persona::resolve(None).color);
}

#[tokio::test]
async fn system_message_overrides_persona_instructions() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(turn(vec![
            ChatMessage::new(Role::System, "Answer only in French."),
            user("Hello"),
        ]))
        .await
        .unwrap();

    let request = provider.last_request();
    assert_eq!(request.instructions, "Answer only in French.");
    assert!(request.history.is_empty());
}

// ============================================================================
// Quick actions
// ============================================================================

#[tokio::test]
async fn explain_action_prefixes_the_prompt() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(ChatTurn {
            messages: vec![user("explain quantum computing")],
            quick_action: Some("explain".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let prompt = provider.last_request().prompt;
    assert!(prompt.starts_with("Explain this like I am 5 years old:"));
    assert!(prompt.ends_with("explain quantum computing"));
}

#[tokio::test]
async fn unknown_action_leaves_prompt_unchanged() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(ChatTurn {
            messages: vec![user("explain quantum computing")],
            quick_action: Some("translate".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(provider.last_request().prompt, "explain quantum computing");
}

// ============================================================================
// Attachment routing
// ============================================================================

#[tokio::test]
async fn image_attachment_switches_to_vision_model() {
    let provider = RecordingProvider::new("a cat");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(ChatTurn {
            messages: vec![user("what is this?")],
            attachments: vec![UploadedFile::new(
                "photo.png",
                Some("image/png".to_string()),
                vec![0x89, 0x50, 0x4e, 0x47],
            )],
            ..Default::default()
        })
        .await
        .unwrap();

    let request = provider.last_request();
    assert_eq!(request.model, CONFIG.vision_model);
    assert_eq!(request.images.len(), 1);
    assert_eq!(request.images[0].name, "photo.png");
    // The text prompt itself is untouched by image attachments.
    assert_eq!(request.prompt, "what is this?");
}

#[tokio::test]
async fn text_attachment_is_inlined_into_the_prompt() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(ChatTurn {
            messages: vec![user("what does this say?")],
            attachments: vec![UploadedFile::new(
                "notes.txt",
                Some("text/plain".to_string()),
                b"meeting at noon".to_vec(),
            )],
            ..Default::default()
        })
        .await
        .unwrap();

    let request = provider.last_request();
    assert_eq!(request.model, CONFIG.model);
    assert!(request.prompt.contains("--- Attached file: notes.txt ---"));
    assert!(request.prompt.contains("meeting at noon"));
    assert!(request.images.is_empty());
    assert!(request.documents.is_empty());
}

#[tokio::test]
async fn opaque_document_is_forwarded_untouched() {
    let provider = RecordingProvider::new("ok");
    let orchestrator = orchestrator(provider.clone());

    orchestrator
        .respond(ChatTurn {
            messages: vec![user("what is in this archive?")],
            attachments: vec![UploadedFile::new(
                "bundle.zip",
                Some("application/zip".to_string()),
                vec![0x50, 0x4b],
            )],
            ..Default::default()
        })
        .await
        .unwrap();

    let request = provider.last_request();
    assert_eq!(request.documents.len(), 1);
    assert_eq!(request.documents[0].name, "bundle.zip");
    assert_eq!(request.prompt, "what is in this archive?");
}

#[tokio::test]
async fn failed_pdf_extraction_degrades_to_a_warning_marker() {
    let provider = RecordingProvider::new("ok");
    let temp_dir = tempfile::tempdir().unwrap();
    let extractor = PdfExtractor::new("/bin/false").with_temp_dir(temp_dir.path());
    let orchestrator = ChatOrchestrator::new(provider.clone(), extractor);

    let outcome = orchestrator
        .respond(ChatTurn {
            messages: vec![user("summarize this paper")],
            attachments: vec![UploadedFile::new(
                "report.pdf",
                Some("application/pdf".to_string()),
                b"%PDF-1.4 not really".to_vec(),
            )],
            ..Default::default()
        })
        .await
        .unwrap();

    // Degraded, not fatal: the turn still went out with the marker.
    assert!(!outcome.content.is_empty());
    let prompt = provider.last_request().prompt;
    assert!(prompt.contains("[Could not extract text from attached PDF: report.pdf]"));
    assert!(!prompt.contains("--- Attached file: report.pdf ---"));

    // And the scoped temp copy is gone.
    assert!(
        std::fs::read_dir(temp_dir.path())
            .unwrap()
            .next()
            .is_none()
    );
}

// ============================================================================
// Provider failure
// ============================================================================

#[tokio::test]
async fn provider_failure_surfaces_as_a_provider_error() {
    let provider = RecordingProvider::failing();
    let orchestrator = orchestrator(provider.clone());

    let err = orchestrator
        .respond(turn(vec![user("Hello")]))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Provider(_)));
    assert!(err.to_string().contains("model unavailable"));
}
