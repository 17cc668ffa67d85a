//! LLM Abstraction Layer
//!
//! A provider-neutral interface for streamed chat completions, with a
//! Groq implementation speaking the OpenAI-compatible wire format.

pub mod core;
pub mod groq;

// Re-export commonly used types
pub use core::{
    error::LlmError,
    provider::{ChatProvider, EventStream},
    types::{ChatMessage, ChatRequest, MessageRole, StreamEvent},
};

pub use groq::{GroqClient, GroqModel};
