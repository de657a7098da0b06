// src/chat/attachment.rs
// MIME-based attachment classification. The classification is a pure
// function over the declared content type so the branching stays testable
// without any file system or network work.

/// A file uploaded with a chat turn. Request-scoped; never persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload, guessing the content type from the file name when
    /// the client did not declare one.
    pub fn new(name: impl Into<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
            mime_guess::from_path(&name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string()
        });
        Self { name, mime, bytes }
    }

    pub fn kind(&self) -> AttachmentKind {
        classify(&self.mime)
    }
}

/// How an attachment is routed into the model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Forwarded as a vision payload; switches the call to the vision model.
    Image,
    /// Raw bytes read as text and inlined into the prompt.
    InlineText,
    /// Text extracted by the external PDF tool and inlined into the prompt.
    InlinePdf,
    /// Forwarded untouched as a document attachment.
    OpaqueDocument,
}

/// Classify a declared MIME type. Parameters ("; charset=...") are ignored.
pub fn classify(mime: &str) -> AttachmentKind {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if essence.starts_with("image/") {
        AttachmentKind::Image
    } else if essence.starts_with("text/") || essence == "application/json" {
        AttachmentKind::InlineText
    } else if essence == "application/pdf" {
        AttachmentKind::InlinePdf
    } else {
        AttachmentKind::OpaqueDocument
    }
}
