//! Groq client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::llm::core::{
    error::LlmError,
    provider::{ChatProvider, EventStream},
    types::{ChatRequest, StreamEvent},
};

use super::sse::parse_sse_stream;
use super::types::{GroqErrorEnvelope, GroqRequest, GroqStreamEvent};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq model identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroqModel {
    /// Llama 4 Scout 17B, 16 experts
    #[default]
    Llama4Scout,
}

impl GroqModel {
    pub fn as_str(&self) -> &str {
        match self {
            GroqModel::Llama4Scout => "meta-llama/llama-4-scout-17b-16e-instruct",
        }
    }
}

/// Client for Groq's OpenAI-compatible chat completions endpoint
pub struct GroqClient {
    http_client: Client,
    api_key: String,
    /// API root, without trailing slash
    base_url: String,
    model: GroqModel,
}

impl std::fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GroqClient {
    /// Create a new Groq client
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: GroqModel) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::AuthenticationError(
                "Groq API key is empty".to_string(),
            ));
        }

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::HttpError {
                status: 0,
                body: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Point the client at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> GroqModel {
        self.model
    }

    fn build_endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_groq_request(&self, request: ChatRequest) -> GroqRequest {
        GroqRequest {
            model: self.model.as_str().to_string(),
            messages: request.messages,
            stream: true,
        }
    }

    async fn make_streaming_request(&self, request: ChatRequest) -> Result<EventStream, LlmError> {
        if request.messages.is_empty() {
            return Err(LlmError::InvalidRequest(
                "at least one message is required".to_string(),
            ));
        }

        let groq_request = self.to_groq_request(request);

        let response = self
            .http_client
            .post(self.build_endpoint_url())
            .bearer_auth(&self.api_key)
            .json(&groq_request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body, retry_after));
        }

        let sse_stream = parse_sse_stream(Box::pin(response.bytes_stream()));

        let event_stream = sse_stream.flat_map(|result| {
            let events = match result {
                Ok(event) => from_groq_event(event),
                Err(e) => vec![Err(e)],
            };
            futures::stream::iter(events)
        });

        Ok(Box::pin(event_stream))
    }
}

#[async_trait]
impl ChatProvider for GroqClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, LlmError> {
        self.make_streaming_request(request).await
    }
}

/// Map a non-success response to an error
fn status_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> LlmError {
    let message = serde_json::from_str::<GroqErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.clone());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthenticationError(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded { retry_after },
        _ => LlmError::HttpError {
            status: status.as_u16(),
            body: message,
        },
    }
}

/// Convert one parsed SSE event into zero or more stream events
fn from_groq_event(event: GroqStreamEvent) -> Vec<Result<StreamEvent, LlmError>> {
    match event {
        GroqStreamEvent::Chunk(chunk) => {
            let mut events = Vec::new();
            for choice in chunk.choices {
                if let Some(text) = choice.delta.content {
                    events.push(Ok(StreamEvent::TextDelta { text }));
                }
                if let Some(reason) = choice.finish_reason {
                    events.push(Ok(StreamEvent::Done {
                        finish_reason: Some(reason),
                    }));
                }
            }
            events
        }
        GroqStreamEvent::Done => vec![Ok(StreamEvent::Done {
            finish_reason: None,
        })],
        GroqStreamEvent::Error(error) => vec![Err(LlmError::ProviderError {
            code: error
                .code
                .or(error.error_type)
                .unwrap_or_else(|| "unknown".to_string()),
            message: error.message,
        })],
    }
}
