// src/chat/quick_action.rs
// Canned prompt-prefix transforms, selected per request. Unknown ids leave
// the prompt untouched.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Summarize,
    Explain,
    Grammar,
}

impl QuickAction {
    /// Parse a quick-action id. Unknown ids are simply absent, not errors.
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "summarize" => Some(QuickAction::Summarize),
            "explain" => Some(QuickAction::Explain),
            "grammar" => Some(QuickAction::Grammar),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            QuickAction::Summarize => "summarize",
            QuickAction::Explain => "explain",
            QuickAction::Grammar => "grammar",
        }
    }

    /// Fixed instruction template prepended to the prompt text.
    pub fn template(&self) -> &'static str {
        match self {
            QuickAction::Summarize => "Summarize the following text in a few short sentences:",
            QuickAction::Explain => "Explain this like I am 5 years old:",
            QuickAction::Grammar => {
                "Fix the grammar and spelling in the following text and reply with the corrected version only:"
            }
        }
    }

    pub fn apply(&self, prompt: &str) -> String {
        format!("{}\n\n{}", self.template(), prompt)
    }
}
