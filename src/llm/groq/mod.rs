//! Groq provider implementation

pub mod client;
pub mod sse;
pub mod types;

pub use client::{GroqClient, GroqModel};
