//! Relays a streamed completion to a single client

use futures::StreamExt;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use crate::llm::{ChatMessage, ChatProvider, ChatRequest, StreamEvent};

/// One event delivered to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A generated token
    Content(String),
    /// Terminal failure; nothing follows it
    Error(String),
}

impl ChatEvent {
    /// JSON payload carried in the SSE `data:` field
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ChatEvent::Content(token) => json!({ "content": token }),
            ChatEvent::Error(message) => json!({ "error": message }),
        }
    }
}

/// Lifecycle of a relay
///
/// `Open -> Streaming -> {Complete | Failed | Cancelled}`; an upstream
/// failure before the first token goes straight from `Open` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Open,
    Streaming,
    Complete,
    Failed,
    Cancelled,
}

/// Starts one relay per chat request
#[derive(Clone)]
pub struct ChatRelay {
    provider: Arc<dyn ChatProvider>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Spawn the upstream request and return the client-facing event stream
    ///
    /// The stream ends after the last token, or right after an error event.
    /// Dropping it cancels the upstream request.
    pub fn start(&self, messages: Vec<ChatMessage>) -> ReceiverStream<ChatEvent> {
        // Capacity 1 keeps at most one token queued ahead of a slow client.
        let (tx, rx) = mpsc::channel(1);
        let provider = Arc::clone(&self.provider);
        let request = ChatRequest::new(messages);

        tokio::spawn(async move {
            let state = run(provider.as_ref(), request, tx).await;
            debug!(?state, "chat relay finished");
        });

        ReceiverStream::new(rx)
    }
}

/// Drive one upstream completion into `tx` until it finishes, fails, or the
/// receiver goes away
pub async fn run(
    provider: &dyn ChatProvider,
    request: ChatRequest,
    tx: mpsc::Sender<ChatEvent>,
) -> RelayState {
    let opened = tokio::select! {
        _ = tx.closed() => return RelayState::Cancelled,
        opened = provider.stream_chat(request) => opened,
    };

    let mut upstream = match opened {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "chat completion request failed");
            let _ = tx.send(ChatEvent::Error(e.to_string())).await;
            return RelayState::Failed;
        }
    };

    let mut state = RelayState::Open;
    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                info!("chat client disconnected, cancelling upstream");
                return RelayState::Cancelled;
            }
            next = upstream.next() => next,
        };

        match next {
            Some(Ok(StreamEvent::TextDelta { text })) => {
                if text.is_empty() {
                    continue;
                }
                state = RelayState::Streaming;
                if tx.send(ChatEvent::Content(text)).await.is_err() {
                    return RelayState::Cancelled;
                }
            }
            Some(Ok(StreamEvent::Done { finish_reason })) => {
                debug!(?finish_reason, "chat completion done");
                return RelayState::Complete;
            }
            Some(Err(e)) => {
                warn!(error = %e, ?state, "chat completion stream failed");
                let _ = tx.send(ChatEvent::Error(e.to_string())).await;
                return RelayState::Failed;
            }
            None => return RelayState::Complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{EventStream, LlmError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    enum Script {
        Tokens(Vec<&'static str>),
        FailAfter(Vec<&'static str>, &'static str),
        Refuse(&'static str),
        Endless(Arc<AtomicBool>),
    }

    struct StubProvider {
        script: Script,
    }

    /// Sets the flag when the upstream stream is dropped
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        async fn stream_chat(&self, _request: ChatRequest) -> Result<EventStream, LlmError> {
            let delta = |t: &str| -> Result<StreamEvent, LlmError> {
                Ok(StreamEvent::TextDelta {
                    text: t.to_string(),
                })
            };
            match &self.script {
                Script::Tokens(tokens) => {
                    let mut events: Vec<_> = tokens.iter().map(|t| delta(*t)).collect();
                    events.push(Ok(StreamEvent::Done {
                        finish_reason: Some("stop".to_string()),
                    }));
                    Ok(Box::pin(futures::stream::iter(events)))
                }
                Script::FailAfter(tokens, message) => {
                    let mut events: Vec<_> = tokens.iter().map(|t| delta(*t)).collect();
                    events.push(Err(LlmError::StreamError(message.to_string())));
                    Ok(Box::pin(futures::stream::iter(events)))
                }
                Script::Refuse(message) => Err(LlmError::HttpError {
                    status: 503,
                    body: message.to_string(),
                }),
                Script::Endless(dropped) => {
                    let guard = DropFlag(Arc::clone(dropped));
                    let stream = async_stream::stream! {
                        let _guard = guard;
                        loop {
                            yield Ok::<_, LlmError>(StreamEvent::TextDelta { text: "tick".to_string() });
                            tokio::time::sleep(Duration::from_millis(5)).await;
                        }
                    };
                    Ok(Box::pin(stream))
                }
            }
        }
    }

    fn relay(script: Script) -> ChatRelay {
        ChatRelay::new(Arc::new(StubProvider { script }))
    }

    async fn collect(relay: &ChatRelay) -> Vec<ChatEvent> {
        relay
            .start(vec![ChatMessage::user("Hello")])
            .collect::<Vec<_>>()
            .await
    }

    #[tokio::test]
    async fn test_tokens_are_relayed_in_order() {
        let events = collect(&relay(Script::Tokens(vec!["Hi", " there"]))).await;
        assert_eq!(
            events,
            vec![
                ChatEvent::Content("Hi".to_string()),
                ChatEvent::Content(" there".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_deltas_are_skipped() {
        let events = collect(&relay(Script::Tokens(vec!["", "a", "", "b"]))).await;
        assert_eq!(
            events,
            vec![
                ChatEvent::Content("a".to_string()),
                ChatEvent::Content("b".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_mid_stream_ends_with_error() {
        let events = collect(&relay(Script::FailAfter(vec!["Hi"], "connection reset"))).await;
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ChatEvent::Content("Hi".to_string()));
        match &events[1] {
            ChatEvent::Error(message) => assert!(message.contains("connection reset")),
            other => panic!("Expected error event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_before_first_token_sends_single_error() {
        let events = collect(&relay(Script::Refuse("service unavailable"))).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], ChatEvent::Error(m) if m.contains("service unavailable")));
    }

    #[tokio::test]
    async fn test_run_reports_terminal_state() {
        let stub = StubProvider {
            script: Script::Tokens(vec!["x"]),
        };
        let (tx, mut rx) = mpsc::channel(1);
        let request = ChatRequest::new(vec![ChatMessage::user("Hello")]);

        let handle = tokio::spawn(async move { run(&stub, request, tx).await });
        assert_eq!(rx.recv().await, Some(ChatEvent::Content("x".to_string())));
        assert_eq!(handle.await.unwrap(), RelayState::Complete);

        let stub = StubProvider {
            script: Script::FailAfter(vec![], "boom"),
        };
        let (tx, _rx) = mpsc::channel(1);
        let request = ChatRequest::new(vec![ChatMessage::user("Hello")]);
        assert_eq!(run(&stub, request, tx).await, RelayState::Failed);
    }

    #[tokio::test]
    async fn test_client_disconnect_cancels_upstream() {
        let dropped = Arc::new(AtomicBool::new(false));
        let stub = StubProvider {
            script: Script::Endless(Arc::clone(&dropped)),
        };
        let (tx, mut rx) = mpsc::channel(1);
        let request = ChatRequest::new(vec![ChatMessage::user("Hello")]);

        let handle = tokio::spawn(async move { run(&stub, request, tx).await });
        assert!(rx.recv().await.is_some());
        drop(rx);

        let state = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("relay did not stop after disconnect")
            .unwrap();
        assert_eq!(state, RelayState::Cancelled);
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn test_event_payloads() {
        assert_eq!(
            ChatEvent::Content("Hi".to_string()).to_json().to_string(),
            r#"{"content":"Hi"}"#
        );
        assert_eq!(
            ChatEvent::Error("boom".to_string()).to_json().to_string(),
            r#"{"error":"boom"}"#
        );
    }
}
