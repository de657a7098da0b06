// src/console/mod.rs
//! Interactive chat console
//!
//! A readline-based front end for the relay server: keeps the transcript in
//! memory, stages attachments before sending, and posts the full history on
//! every turn. One submission is in flight at a time by construction - the
//! loop awaits each response before reading the next line.

pub mod colors;
pub mod formatter;

use std::path::PathBuf;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde_json::Value;
use tracing::debug;

use crate::chat::{ChatMessage, QuickAction, Role};
use crate::persona;

/// A not-yet-sent attachment. The bytes are read when the file is staged
/// and dropped when it is detached or sent.
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// One parsed console input line.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Send {
        text: &'a str,
        action: Option<QuickAction>,
    },
    Persona(&'a str),
    Personas,
    Attach(&'a str),
    Detach(usize),
    Attachments,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
}

/// Parse a console line. Anything not starting with `/` is a plain turn.
pub fn parse_command(line: &str) -> Command<'_> {
    if !line.starts_with('/') {
        return Command::Send {
            text: line,
            action: None,
        };
    }

    let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        "/quit" | "/exit" => Command::Quit,
        "/help" => Command::Help,
        "/clear" => Command::Clear,
        "/personas" => Command::Personas,
        "/persona" => Command::Persona(rest),
        "/attach" => Command::Attach(rest),
        "/attachments" => Command::Attachments,
        "/detach" => match rest.parse::<usize>() {
            Ok(index) => Command::Detach(index),
            Err(_) => Command::Unknown(line),
        },
        "/summarize" | "/explain" | "/grammar" => Command::Send {
            text: rest,
            action: QuickAction::parse(&cmd[1..]),
        },
        _ => Command::Unknown(line),
    }
}

pub struct Console {
    editor: DefaultEditor,
    client: reqwest::Client,
    server_url: String,
    persona: String,
    messages: Vec<ChatMessage>,
    staged: Vec<StagedFile>,
    history_path: PathBuf,
}

impl Console {
    pub fn new(server_url: String) -> Result<Self> {
        let editor = DefaultEditor::new()?;

        // History file in ~/.attache/history
        let history_path = dirs::home_dir()
            .unwrap_or_default()
            .join(".attache")
            .join("history");

        Ok(Self {
            editor,
            client: reqwest::Client::new(),
            server_url,
            persona: persona::DEFAULT_PERSONA_ID.to_string(),
            messages: Vec::new(),
            staged: Vec::new(),
            history_path,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.load_history(&self.history_path);

        self.print_banner();

        loop {
            let prompt = if self.staged.is_empty() {
                "you > ".to_string()
            } else {
                format!("you [{} staged] > ", self.staged.len())
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(&line);
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        let _ = self.editor.save_history(&self.history_path);
        Ok(())
    }

    /// Returns false when the console should exit.
    async fn handle_line(&mut self, line: &str) -> bool {
        match parse_command(line) {
            Command::Quit => return false,
            Command::Help => self.print_help(),
            Command::Clear => {
                self.messages.clear();
                println!("{}", colors::status("Transcript cleared."));
            }
            Command::Personas => {
                for p in persona::all() {
                    let marker = if p.id == self.persona { "*" } else { " " };
                    println!(
                        "{} {} - {}",
                        marker,
                        colors::colored_label(p.id, p.color),
                        p.display_name
                    );
                }
            }
            Command::Persona(id) => {
                // Unknown ids are accepted; the server falls back to default.
                if id.is_empty() {
                    println!("{}", colors::warning("Usage: /persona <id>"));
                } else {
                    self.persona = id.to_string();
                    println!("{}", colors::status(&format!("Persona set to {id}.")));
                }
            }
            Command::Attach(path) => self.stage_attachment(path),
            Command::Detach(index) => self.detach(index),
            Command::Attachments => {
                if self.staged.is_empty() {
                    println!("{}", colors::status("No staged attachments."));
                }
                for (i, f) in self.staged.iter().enumerate() {
                    println!(
                        "  {}. {} ({}, {} bytes)",
                        i + 1,
                        f.name,
                        f.mime,
                        f.bytes.len()
                    );
                }
            }
            Command::Send { text, action } => {
                // Nothing to act on: no text and nothing staged.
                if text.is_empty() && self.staged.is_empty() {
                    println!(
                        "{}",
                        colors::warning("Type a message or /attach a file first.")
                    );
                } else {
                    self.send_turn(text, action).await;
                }
            }
            Command::Unknown(line) => {
                println!(
                    "{}",
                    colors::warning(&format!("Unknown command: {line} (see /help)"))
                );
            }
        }
        true
    }

    fn stage_attachment(&mut self, path: &str) {
        if path.is_empty() {
            println!("{}", colors::warning("Usage: /attach <path>"));
            return;
        }
        match std::fs::read(path) {
            Ok(bytes) => {
                let name = std::path::Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                let mime = mime_guess::from_path(path)
                    .first_raw()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                println!(
                    "{}",
                    colors::success(&format!("Staged {name} ({mime}, {} bytes)", bytes.len()))
                );
                self.staged.push(StagedFile { name, mime, bytes });
            }
            Err(e) => println!("{}", colors::error(&format!("Cannot read {path}: {e}"))),
        }
    }

    fn detach(&mut self, index: usize) {
        if index == 0 || index > self.staged.len() {
            println!(
                "{}",
                colors::warning(&format!(
                    "No staged attachment {index} (have {})",
                    self.staged.len()
                ))
            );
            return;
        }
        // Dropping the entry releases the staged bytes.
        let removed = self.staged.remove(index - 1);
        println!("{}", colors::status(&format!("Detached {}.", removed.name)));
    }

    async fn send_turn(&mut self, text: &str, action: Option<QuickAction>) {
        let previews: Vec<String> = self
            .staged
            .iter()
            .map(|f| format!("[attached: {} ({}, {} bytes)]", f.name, f.mime, f.bytes.len()))
            .collect();

        let content = if previews.is_empty() {
            text.to_string()
        } else if text.is_empty() {
            previews.join("\n")
        } else {
            format!("{}\n{}", text, previews.join("\n"))
        };
        self.messages.push(ChatMessage::new(Role::User, content));

        println!("{}", colors::status("thinking..."));

        let url = format!("{}/chat", self.server_url.trim_end_matches('/'));
        let result = if self.staged.is_empty() {
            self.client
                .post(&url)
                .json(&serde_json::json!({
                    "messages": self.messages,
                    "persona": self.persona,
                    "quick_action": action.map(|a| a.id()),
                }))
                .send()
                .await
        } else {
            match self.build_multipart(action) {
                Ok(form) => self.client.post(&url).multipart(form).send().await,
                Err(e) => {
                    self.push_error(&e.to_string());
                    return;
                }
            }
        };

        match result {
            Ok(response) if response.status().is_success() => {
                match response.json::<Value>().await {
                    Ok(body) => self.show_reply(&body),
                    Err(e) => self.push_error(&format!("Malformed server response: {e}")),
                }
            }
            Ok(response) => {
                let status = response.status();
                let message = response
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("error")?.as_str().map(String::from))
                    .unwrap_or_else(|| status.to_string());
                self.push_error(&message);
            }
            Err(e) => self.push_error(&e.to_string()),
        }
    }

    /// Drains the staged list: the files belong to this turn now.
    fn build_multipart(&mut self, action: Option<QuickAction>) -> Result<Form> {
        let mut form = Form::new()
            .text("messages", serde_json::to_string(&self.messages)?)
            .text("persona", self.persona.clone());
        if let Some(action) = action {
            form = form.text("quick_action", action.id());
        }
        for file in self.staged.drain(..) {
            debug!("Sending attachment {} ({})", file.name, file.mime);
            form = form.part(
                "attachments",
                Part::bytes(file.bytes)
                    .file_name(file.name)
                    .mime_str(&file.mime)?,
            );
        }
        Ok(form)
    }

    fn show_reply(&mut self, body: &Value) {
        let content = body
            .get("content")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let color = body
            .get("color")
            .and_then(Value::as_str)
            .unwrap_or("#ffffff");

        self.messages
            .push(ChatMessage::new(Role::Assistant, content));

        let label = persona::resolve(Some(&self.persona)).display_name;
        println!(
            "\n{}\n{}\n",
            colors::colored_label(label, color),
            formatter::render(content)
        );
    }

    /// Transport and server errors become system-role rows in the
    /// transcript, mirroring how the turn is shown; nothing is rolled back.
    fn push_error(&mut self, message: &str) {
        let text = format!("Error: {message}");
        self.messages
            .push(ChatMessage::new(Role::System, text.clone()));
        println!("{}", colors::error(&text));
    }

    fn print_banner(&self) {
        println!("attache console - {}", self.server_url);
        println!(
            "{}",
            colors::status("Type a message, or /help for commands.")
        );
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  /persona <id>      switch persona (/personas to list)");
        println!("  /attach <path>     stage a file for the next turn");
        println!("  /detach <n>        remove staged attachment n");
        println!("  /attachments       list staged attachments");
        println!("  /summarize <text>  send with the summarize quick action");
        println!("  /explain <text>    send with the explain quick action");
        println!("  /grammar <text>    send with the grammar quick action");
        println!("  /clear             clear the transcript");
        println!("  /quit              exit");
    }
}
