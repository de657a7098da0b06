// src/lib.rs

pub mod api;
pub mod chat;
pub mod config;
pub mod console;
pub mod extract;
pub mod llm;
pub mod persona;
pub mod state;
