//! Provider trait for completion API implementations

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

use super::{
    error::LlmError,
    types::{ChatRequest, StreamEvent},
};

/// Stream of incremental completion events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send>>;

/// Interface every completion provider implements
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Open a streamed completion
    ///
    /// Returns once the provider accepted the request; generated text then
    /// arrives through the stream in order. Dropping the stream closes the
    /// upstream connection.
    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, LlmError>;
}
