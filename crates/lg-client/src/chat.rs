//! Chat stream consumer for `POST /api/chat/stream`.

use async_stream::stream;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use lg_protocol::{ChatEvent, ChatRequest};
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::http::{build_http_client, check_status, endpoint};
use crate::sse::data_lines;

const CHAT_PATH: &str = "/api/chat/stream";

/// Client for the streaming chat endpoint.
#[derive(Clone)]
pub struct ChatClient {
    base_url: String,
    http: Client,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_http(base_url, build_http_client()?))
    }

    pub fn with_http(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one user message and stream the backend's events.
    ///
    /// Nothing is sent until the stream is first polled, and each call opens
    /// a fresh request. The stream ends after a `done` event or when the
    /// response closes. A failed request or a broken connection is yielded
    /// once as `Err`, after which the stream ends. Dropping the stream drops
    /// the response and aborts the request.
    pub fn stream(
        &self,
        message: &str,
        session_id: &str,
    ) -> impl Stream<Item = Result<ChatEvent, ClientError>> + Send + 'static {
        let http = self.http.clone();
        let url = endpoint(&self.base_url, CHAT_PATH);
        let body = ChatRequest::new(message, session_id);

        stream! {
            debug!(%url, session_id = %body.session_id, "opening chat stream");
            let sent = http.post(&url).json(&body).send().await;
            let response = match sent {
                Ok(response) => check_status(response).await,
                Err(e) => Err(ClientError::from(e)),
            };

            match response {
                Ok(response) => {
                    let mut events = Box::pin(decode_events(response.bytes_stream()));
                    while let Some(item) = events.next().await {
                        yield item;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "chat request failed");
                    yield Err(e);
                }
            }
        }
    }
}

/// Decode a chat response body into events.
///
/// Malformed lines are logged and skipped. The stream stops after `done`
/// even if the server keeps the connection open.
pub fn decode_events<S, E>(bytes: S) -> impl Stream<Item = Result<ChatEvent, ClientError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    stream! {
        let mut lines = data_lines(Box::pin(bytes));
        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    yield Err(ClientError::Stream(e.to_string()));
                    return;
                }
            };

            match serde_json::from_str::<ChatEvent>(&line) {
                Ok(event) => {
                    let done = event == ChatEvent::Done;
                    yield Ok(event);
                    if done {
                        return;
                    }
                }
                Err(e) => {
                    warn!(error = %e, line = %line, "skipping malformed chat event");
                }
            }
        }
    }
}
