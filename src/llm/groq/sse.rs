//! Server-Sent Events (SSE) parser for Groq completion streams

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;
use std::pin::Pin;

use crate::llm::core::error::LlmError;

use super::types::{GroqChunk, GroqErrorEnvelope, GroqStreamEvent};

/// Parse a stream of bytes as Groq SSE events
///
/// Groq's SSE format is one JSON chunk per event, terminated by a literal
/// `[DONE]`:
/// ```text
/// data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"content":"Hi"}}]}
///
/// data: [DONE]
/// ```
///
/// Bytes are buffered until a blank line closes an event, so events and
/// multi-byte characters split across network chunks are reassembled.
pub fn parse_sse_stream<E>(
    byte_stream: Pin<Box<dyn Stream<Item = Result<Bytes, E>> + Send>>,
) -> Pin<Box<dyn Stream<Item = Result<GroqStreamEvent, LlmError>> + Send>>
where
    E: std::fmt::Display + 'static,
{
    let mut buffer: Vec<u8> = Vec::new();

    let event_stream = byte_stream.flat_map(move |chunk_result| {
        let chunk = match chunk_result {
            Ok(bytes) => bytes,
            Err(e) => {
                return futures::stream::iter(vec![Err(LlmError::StreamError(e.to_string()))]);
            }
        };

        buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(event_end) = find_event_end(&buffer) {
            let event_bytes: Vec<u8> = buffer.drain(..event_end + 2).collect();

            match std::str::from_utf8(&event_bytes[..event_end]) {
                Ok(event_text) => {
                    if let Some(parsed_event) = parse_event(event_text) {
                        events.push(parsed_event);
                    }
                }
                Err(e) => events.push(Err(LlmError::StreamError(format!(
                    "Invalid UTF-8 in stream: {}",
                    e
                )))),
            }
        }

        futures::stream::iter(events)
    });

    Box::pin(event_stream)
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parse a single SSE event from its text representation
///
/// Comment lines (`: keep-alive`) and events without data are skipped.
fn parse_event(event_text: &str) -> Option<Result<GroqStreamEvent, LlmError>> {
    let data_lines: Vec<&str> = event_text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .collect();

    if data_lines.is_empty() {
        return None;
    }
    let data = data_lines.join("\n");

    if data.is_empty() {
        return None;
    }

    if data == "[DONE]" {
        return Some(Ok(GroqStreamEvent::Done));
    }

    if let Ok(envelope) = serde_json::from_str::<GroqErrorEnvelope>(&data) {
        return Some(Ok(GroqStreamEvent::Error(envelope.error)));
    }

    match serde_json::from_str::<GroqChunk>(&data) {
        Ok(chunk) => Some(Ok(GroqStreamEvent::Chunk(chunk))),
        Err(e) => Some(Err(LlmError::SerializationError(format!(
            "Failed to parse Groq SSE event: {}. Data: {}",
            e, data
        )))),
    }
}
