use std::convert::Infallible;
use warp::sse::Event;

use crate::chat::ChatEvent;

/// Build an unnamed event whose frame reads `data: <json>`
///
/// warp writes `data:` with no separator, so the payload carries the space.
/// JSON never contains a raw newline, so the frame is always a single line.
fn data_event(payload: serde_json::Value) -> Event {
    Event::default().data(format!(" {}", payload))
}

/// Create an unnamed SSE event carrying one generated token
pub fn create_content_event(token: &str) -> Result<Event, Infallible> {
    Ok(data_event(ChatEvent::Content(token.to_string()).to_json()))
}

/// Create an unnamed SSE event carrying a terminal error
pub fn create_error_event(message: &str) -> Result<Event, Infallible> {
    Ok(data_event(ChatEvent::Error(message.to_string()).to_json()))
}

/// Convert a relay event into its SSE frame
pub fn chat_event_to_sse(event: ChatEvent) -> Result<Event, Infallible> {
    match event {
        ChatEvent::Content(token) => create_content_event(&token),
        ChatEvent::Error(message) => create_error_event(&message),
    }
}
