// src/console/formatter.rs
//! Markdown formatter for terminal output with ANSI colors
//!
//! Whole-message rendering: fenced code blocks are dimmed, `inline code`
//! is cyan, and **bold** spans are bold. Anything fancier stays literal.

use super::colors::ansi::{BOLD, CYAN, DIM, RESET};

/// Render a complete markdown reply for the terminal.
pub fn render(text: &str) -> String {
    let mut out = String::new();
    let mut in_code_block = false;

    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if line.trim_start().starts_with("```") {
            // Fence lines stay visible but dim, like the block they wrap.
            out.push_str(DIM);
            out.push_str(line);
            out.push_str(RESET);
            in_code_block = !in_code_block;
        } else if in_code_block {
            out.push_str(DIM);
            out.push_str(line);
            out.push_str(RESET);
        } else {
            out.push_str(&format_inline(line));
        }
    }

    out
}

/// Apply inline styles to one line of prose.
fn format_inline(line: &str) -> String {
    let mut out = String::new();
    let mut bold = false;
    let mut code = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if !code && chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str(if bold { RESET } else { BOLD });
                bold = !bold;
            }
            '`' if !bold => {
                out.push_str(if code { RESET } else { CYAN });
                code = !code;
            }
            _ => out.push(c),
        }
    }

    // Unterminated spans must not bleed into the next line.
    if bold || code {
        out.push_str(RESET);
    }
    out
}
