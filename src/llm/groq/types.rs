//! Wire types for Groq's OpenAI-compatible chat completions API

use serde::{Deserialize, Serialize};

use crate::llm::core::types::ChatMessage;

/// Request body for `POST /openai/v1/chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct GroqRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// One `data:` payload of the completion stream
#[derive(Debug, Clone, Deserialize)]
pub struct GroqChunk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub choices: Vec<GroqChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: GroqDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroqDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Error envelope, both as an HTTP error body and as an in-stream event
#[derive(Debug, Clone, Deserialize)]
pub struct GroqErrorEnvelope {
    pub error: GroqErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroqErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

/// A parsed server-sent event from the completion stream
#[derive(Debug, Clone)]
pub enum GroqStreamEvent {
    Chunk(GroqChunk),
    Error(GroqErrorBody),
    /// The `data: [DONE]` terminator
    Done,
}
