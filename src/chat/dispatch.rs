//! Result dispatch: one engine result, one wire response
//!
//! Streams are relayed chunk by chunk, documents pass through byte for byte
//! and plain values are JSON-encoded exactly once.

use crate::chat::engine::{ChatResult, EventStream};
use crate::error::Error;
use axum::{
    body::Body,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

pub const EVENT_STREAM: &str = "text/event-stream";
pub const APPLICATION_JSON: &str = "application/json";

pub const X_ACCEL_BUFFERING: &str = "x-accel-buffering";

/// Wire representation of a chat result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Streaming,
    Document,
    Value,
}

/// Classify raw engine output by its media type.
///
/// Checked in order: event stream, then JSON document, then anything else
/// as a plain value.
pub fn classify_content_type(content_type: Option<&str>) -> ResultKind {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some(EVENT_STREAM) => ResultKind::Streaming,
        Some(media) if media == APPLICATION_JSON || media.ends_with("+json") => {
            ResultKind::Document
        }
        _ => ResultKind::Value,
    }
}

/// Turns a [`ChatResult`] into exactly one HTTP response
pub struct ResultDispatcher {
    cancel: CancellationToken,
}

impl ResultDispatcher {
    /// Create a dispatcher bound to the request's cancellation token
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Turn an engine result into the HTTP response for its kind
    pub fn dispatch(self, result: ChatResult) -> Response {
        match result {
            ChatResult::Streaming(events) => {
                let body = relay(events, self.cancel);
                (
                    [
                        (header::CONTENT_TYPE, EVENT_STREAM),
                        (header::CACHE_CONTROL, "no-cache"),
                        (HeaderName::from_static(X_ACCEL_BUFFERING), "no"),
                    ],
                    body,
                )
                    .into_response()
            }
            ChatResult::Document(bytes) => {
                ([(header::CONTENT_TYPE, APPLICATION_JSON)], bytes).into_response()
            }
            ChatResult::Value(value) => Json(value).into_response(),
        }
    }
}

/// Relay engine events into a response body.
///
/// The body ends when the engine finishes or `cancel` fires. Dropping the
/// body before that (client disconnect) cancels `cancel`. A producer error
/// aborts the body; nothing is sent after it.
fn relay(mut events: EventStream, cancel: CancellationToken) -> Body {
    let guard = cancel.clone().drop_guard();

    let relayed = async_stream::stream! {
        let guard = guard;
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                next = events.next() => next,
            };
            match next {
                Some(Ok(chunk)) => yield Ok::<Bytes, Error>(chunk),
                Some(Err(err)) => {
                    yield Err(err);
                    break;
                }
                None => break,
            }
        }
        guard.disarm();
    };

    Body::from_stream(relayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tokio::sync::mpsc;
    use tokio_stream::wrappers::ReceiverStream;
    use tokio_test::{assert_pending, assert_ready};

    fn channel_stream() -> (mpsc::Sender<crate::Result<Bytes>>, EventStream) {
        let (tx, rx) = mpsc::channel(4);
        (tx, ReceiverStream::new(rx).boxed())
    }

    #[test]
    fn test_classify_content_type() {
        assert_eq!(
            classify_content_type(Some("text/event-stream")),
            ResultKind::Streaming
        );
        assert_eq!(
            classify_content_type(Some("Text/Event-Stream; charset=utf-8")),
            ResultKind::Streaming
        );
        assert_eq!(
            classify_content_type(Some("application/json")),
            ResultKind::Document
        );
        assert_eq!(
            classify_content_type(Some("application/problem+json")),
            ResultKind::Document
        );
        assert_eq!(
            classify_content_type(Some("text/plain; charset=utf-8")),
            ResultKind::Value
        );
        assert_eq!(classify_content_type(None), ResultKind::Value);
    }

    #[tokio::test]
    async fn test_document_passes_through_unchanged() {
        let doc = Bytes::from_static(br#"{"a":1}"#);
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Document(doc.clone()));

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], APPLICATION_JSON);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, doc);
    }

    #[tokio::test]
    async fn test_document_with_escapes_is_not_reencoded() {
        let doc = Bytes::from_static(br#"{"text":"line\nbreak \"quoted\""}"#);
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Document(doc.clone()));
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, doc);
    }

    #[tokio::test]
    async fn test_value_is_json_encoded() {
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Value(serde_json::json!({"answer": 42})));

        assert_eq!(resp.headers()[header::CONTENT_TYPE], APPLICATION_JSON);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["answer"], 42);
    }

    #[tokio::test]
    async fn test_string_value_is_quoted() {
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Value(serde_json::Value::String("hi".into())));
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"\"hi\"");
    }

    #[tokio::test]
    async fn test_streaming_relays_each_chunk_as_produced() {
        let (tx, events) = channel_stream();
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Streaming(events));

        assert_eq!(resp.headers()[header::CONTENT_TYPE], EVENT_STREAM);
        assert_eq!(resp.headers()[header::CACHE_CONTROL], "no-cache");
        let mut body = resp.into_body().into_data_stream();

        for chunk in ["a", "b", "c"] {
            let mut next = tokio_test::task::spawn(body.next());
            assert_pending!(next.poll());

            tx.send(Ok(Bytes::from(chunk))).await.unwrap();
            assert!(next.is_woken());
            let got = assert_ready!(next.poll()).unwrap().unwrap();
            assert_eq!(got, chunk);
        }

        drop(tx);
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_streaming_with_delays_keeps_chunk_boundaries() {
        let (tx, events) = channel_stream();
        tokio::spawn(async move {
            for chunk in ["data: a\n\n", "data: b\n\n", "data: c\n\n"] {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                if tx.send(Ok(Bytes::from(chunk))).await.is_err() {
                    break;
                }
            }
        });

        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Streaming(events));
        let chunks: Vec<Bytes> = resp
            .into_body()
            .into_data_stream()
            .map(|c| c.unwrap())
            .collect()
            .await;

        assert_eq!(
            chunks,
            vec![
                Bytes::from("data: a\n\n"),
                Bytes::from("data: b\n\n"),
                Bytes::from("data: c\n\n"),
            ]
        );
    }

    #[tokio::test]
    async fn test_dropping_body_cancels_token() {
        let (tx, events) = channel_stream();
        let cancel = CancellationToken::new();
        let resp = ResultDispatcher::new(cancel.clone()).dispatch(ChatResult::Streaming(events));

        let mut body = resp.into_body().into_data_stream();
        tx.send(Ok(Bytes::from("a"))).await.unwrap();
        assert_eq!(body.next().await.unwrap().unwrap(), "a");
        assert!(!cancel.is_cancelled());

        drop(body);
        assert!(cancel.is_cancelled());
        // Producer observes the closed channel
        assert!(tx.send(Ok(Bytes::from("b"))).await.is_err());
    }

    #[tokio::test]
    async fn test_completed_stream_does_not_cancel() {
        let (tx, events) = channel_stream();
        let cancel = CancellationToken::new();
        let resp = ResultDispatcher::new(cancel.clone()).dispatch(ChatResult::Streaming(events));

        tx.send(Ok(Bytes::from("only"))).await.unwrap();
        drop(tx);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(body, "only");
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_ends_relay() {
        let (_tx, events) = channel_stream();
        let cancel = CancellationToken::new();
        let resp = ResultDispatcher::new(cancel.clone()).dispatch(ChatResult::Streaming(events));

        cancel.cancel();
        let mut body = resp.into_body().into_data_stream();
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_mid_stream_error_terminates_body() {
        let (tx, events) = channel_stream();
        let resp = ResultDispatcher::new(CancellationToken::new())
            .dispatch(ChatResult::Streaming(events));

        tx.send(Ok(Bytes::from("a"))).await.unwrap();
        tx.send(Err(Error::UpstreamFailure("engine crashed".into())))
            .await
            .unwrap();

        let mut body = resp.into_body().into_data_stream();
        assert_eq!(body.next().await.unwrap().unwrap(), "a");
        assert!(body.next().await.unwrap().is_err());
    }
}
