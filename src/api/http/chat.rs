// src/api/http/chat.rs
// The single chat endpoint. Accepts either a JSON body or a multipart form
// (attachments are multipart-only) and replies with {content, color}.

use axum::{
    Json,
    extract::{FromRequest, Multipart, Request, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::chat::{ChatMessage, ChatTurn, UploadedFile};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequestBody {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub quick_action: Option<String>,
}

#[derive(Serialize)]
pub struct ChatResponseBody {
    pub content: String,
    pub color: String,
}

pub async fn chat_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let result: ApiResult<_> = async {
        let turn = parse_chat_request(request, &state).await?;

        info!(
            "Chat request: {} messages, persona={:?}, quick_action={:?}, {} attachments",
            turn.messages.len(),
            turn.persona,
            turn.quick_action,
            turn.attachments.len()
        );

        let outcome = state
            .orchestrator
            .respond(turn)
            .await
            .map_err(ApiError::from)?;

        Ok(Json(ChatResponseBody {
            content: outcome.content,
            color: outcome.color,
        }))
    }
    .await;

    match result {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("Chat request failed: {}", e.message);
            e.into_response()
        }
    }
}

/// Decode a chat turn from either wire shape.
async fn parse_chat_request(request: Request, state: &Arc<AppState>) -> ApiResult<ChatTurn> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid multipart request: {e}")))?;
        parse_multipart(multipart).await
    } else {
        let Json(body) = Json::<ChatRequestBody>::from_request(request, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))?;
        Ok(ChatTurn {
            messages: body.messages,
            persona: body.persona,
            quick_action: body.quick_action,
            attachments: Vec::new(),
        })
    }
}

async fn parse_multipart(mut multipart: Multipart) -> ApiResult<ChatTurn> {
    let mut messages: Option<Vec<ChatMessage>> = None;
    let mut persona = None;
    let mut quick_action = None;
    let mut attachments = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "messages" => {
                let raw = read_text(field, "messages").await?;
                messages = Some(serde_json::from_str(&raw).map_err(|e| {
                    ApiError::bad_request(format!("Invalid messages payload: {e}"))
                })?);
            }
            "persona" => {
                persona = Some(read_text(field, "persona").await?).filter(|s| !s.is_empty());
            }
            "quick_action" => {
                quick_action =
                    Some(read_text(field, "quick_action").await?).filter(|s| !s.is_empty());
            }
            "attachments" => {
                let name = field.file_name().unwrap_or("attachment").to_string();
                let mime = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        ApiError::bad_request(format!("Failed to read attachment {name}: {e}"))
                    })?
                    .to_vec();
                attachments.push(UploadedFile::new(name, mime, bytes));
            }
            other => debug!("Ignoring unknown multipart field: {}", other),
        }
    }

    Ok(ChatTurn {
        messages: messages.ok_or_else(|| ApiError::bad_request("Missing messages field"))?,
        persona,
        quick_action,
        attachments,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read {name} field: {e}")))
}
