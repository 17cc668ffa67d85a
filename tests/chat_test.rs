use std::sync::Arc;

use async_trait::async_trait;
use blog_api::chat::{ChatEvent, ChatRelay};
use blog_api::llm::{
    ChatMessage, ChatProvider, ChatRequest, EventStream, LlmError, MessageRole, StreamEvent,
};
use blog_api::sse::chat_event_to_sse;
use futures::StreamExt;
use tokio::sync::Mutex;

/// Provider that replays a fixed token list and records the request it got
struct ScriptedProvider {
    tokens: Vec<&'static str>,
    fail_with: Option<&'static str>,
    seen: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(tokens: Vec<&'static str>) -> Self {
        Self {
            tokens,
            fail_with: None,
            seen: Mutex::new(None),
        }
    }

    fn failing_after(tokens: Vec<&'static str>, message: &'static str) -> Self {
        Self {
            fail_with: Some(message),
            ..Self::new(tokens)
        }
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn stream_chat(&self, request: ChatRequest) -> Result<EventStream, LlmError> {
        *self.seen.lock().await = Some(request);

        let tokens = self.tokens.clone();
        let fail_with = self.fail_with;
        let stream = async_stream::stream! {
            for token in tokens {
                yield Ok(StreamEvent::TextDelta { text: token.to_string() });
            }
            match fail_with {
                Some(message) => {
                    yield Err(LlmError::StreamError(message.to_string()));
                }
                None => {
                    yield Ok(StreamEvent::Done { finish_reason: Some("stop".to_string()) });
                }
            }
        };
        Ok(Box::pin(stream))
    }
}

fn conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a helpful assistant"),
        ChatMessage::user("Hello"),
    ]
}

#[tokio::test]
async fn test_chat_streams_two_content_events_then_closes() {
    let provider = Arc::new(ScriptedProvider::new(vec!["Hi", " there"]));
    let relay = ChatRelay::new(provider.clone());

    let events: Vec<ChatEvent> = relay.start(conversation()).collect().await;

    assert_eq!(
        events,
        vec![
            ChatEvent::Content("Hi".to_string()),
            ChatEvent::Content(" there".to_string()),
        ]
    );

    let seen = provider.seen.lock().await.clone().expect("provider not called");
    assert_eq!(seen.messages.len(), 2);
    assert_eq!(seen.messages[0].role, MessageRole::System);
    assert_eq!(seen.messages[1].content, "Hello");
}

#[tokio::test]
async fn test_chat_failure_after_one_token() {
    let relay = ChatRelay::new(Arc::new(ScriptedProvider::failing_after(
        vec!["Hi"],
        "upstream went away",
    )));

    let frames: Vec<String> = relay
        .start(conversation())
        .map(chat_event_to_sse)
        .map(|event| event.unwrap().to_string())
        .collect()
        .await;

    assert_eq!(frames.len(), 2);
    assert!(frames[0].contains(r#"{"content":"Hi"}"#));
    assert!(frames[1].contains(r#""error""#));
    assert!(frames[1].contains("upstream went away"));
}

#[tokio::test]
async fn test_concurrent_relays_are_independent() {
    let relay = ChatRelay::new(Arc::new(ScriptedProvider::new(vec!["a", "b", "c"])));

    let (first, second) = tokio::join!(
        relay.start(conversation()).collect::<Vec<_>>(),
        relay.start(conversation()).collect::<Vec<_>>(),
    );

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}
