// src/persona/mod.rs
// Persona presets: a system instruction string plus a UI display color.
// The registry is immutable, built once at startup, and unknown ids fall
// back to the default persona without error.

pub mod default;
pub mod skeptic;
pub mod tutor;

pub use default::DEFAULT_PERSONA_PROMPT;
pub use skeptic::SKEPTIC_PERSONA_PROMPT;
pub use tutor::TUTOR_PERSONA_PROMPT;

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::config::CONFIG;

pub const DEFAULT_PERSONA_ID: &str = "default";

/// A named preset bundling system instructions and a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub display_name: &'static str,
    pub instructions: &'static str,
    pub color: &'static str,
}

static REGISTRY: Lazy<HashMap<&'static str, Persona>> = Lazy::new(|| {
    let personas = [
        Persona {
            id: DEFAULT_PERSONA_ID,
            display_name: "Assistant",
            instructions: DEFAULT_PERSONA_PROMPT,
            color: "#6366f1",
        },
        Persona {
            id: "tutor",
            display_name: "Tutor",
            instructions: TUTOR_PERSONA_PROMPT,
            color: "#10b981",
        },
        Persona {
            id: "skeptic",
            display_name: "Skeptic",
            instructions: SKEPTIC_PERSONA_PROMPT,
            color: "#f59e0b",
        },
    ];
    personas.into_iter().map(|p| (p.id, p)).collect()
});

/// Resolve a persona id to its preset.
/// Missing or unknown ids fall back to the configured default persona,
/// and from there to the built-in default.
pub fn resolve(id: Option<&str>) -> &'static Persona {
    let id = id.unwrap_or(&CONFIG.default_persona);
    REGISTRY
        .get(id)
        .or_else(|| REGISTRY.get(DEFAULT_PERSONA_ID))
        .expect("default persona is always registered")
}

/// All registered personas, for listing in the console.
pub fn all() -> impl Iterator<Item = &'static Persona> {
    REGISTRY.values()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_persona() {
        let persona = resolve(Some("tutor"));
        assert_eq!(persona.id, "tutor");
        assert_eq!(persona.color, "#10b981");
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_default() {
        let persona = resolve(Some("no-such-persona"));
        assert_eq!(persona.id, DEFAULT_PERSONA_ID);
        assert_eq!(persona.color, resolve(None).color);
    }

    #[test]
    fn test_persona_colors_are_distinct() {
        let mut colors: Vec<&str> = all().map(|p| p.color).collect();
        colors.sort();
        colors.dedup();
        assert_eq!(colors.len(), all().count());
    }
}
