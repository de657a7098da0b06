// src/persona/default.rs
//! The plain assistant persona - the fallback for every request.

pub const DEFAULT_PERSONA_PROMPT: &str = "You are a helpful assistant.";
