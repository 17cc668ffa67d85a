// POST /api/chat handler

use futures_util::stream::StreamExt;

use crate::error::AppError;
use crate::models::ChatRequestBody;
use crate::sse::chat_event_to_sse;
use crate::state::AppState;

pub async fn chat_handler(
    state: AppState,
    request: ChatRequestBody,
) -> Result<impl warp::Reply, warp::Rejection> {
    if request.messages.is_empty() {
        return Err(AppError::BadRequest("messages must not be empty".to_string()).into());
    }

    tracing::debug!("POST /api/chat with {} messages", request.messages.len());
    let event_stream = state.chat.start(request.messages).map(chat_event_to_sse);

    Ok(warp::sse::reply(
        warp::sse::keep_alive().stream(event_stream),
    ))
}
