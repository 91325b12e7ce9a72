//! Mock chat backend for offline use and testing.
//!
//! Produces the same `ChatEvent` sequence the real stream consumer yields,
//! so the reducer and the CLI can run without a backend. [`to_sse_body`]
//! renders a scripted turn in the wire format for HTTP fixtures.

use std::time::Duration;

use async_stream::stream;
use futures::Stream;
use lg_protocol::ChatEvent;
use tokio::time::sleep;

use crate::error::ClientError;

/// Configurable mock responses.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Hand the conversation to another agent.
    Transfer { agent: String, message: String },
    /// Emit a content chunk from the current agent.
    Text { content: String },
    /// Emit a backend error event.
    Error { message: String },
    /// Fail the transport mid-turn.
    Disconnect { reason: String },
    /// Delay before next event (for timing tests).
    Delay { ms: u64 },
}

/// Configuration for a mock turn.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Sequence of responses to emit.
    pub responses: Vec<MockResponse>,
    /// Optional delay between each event (ms).
    pub chunk_delay_ms: Option<u64>,
}

impl MockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(mut self, responses: Vec<MockResponse>) -> Self {
        self.responses = responses;
        self
    }

    pub fn with_chunk_delay(mut self, ms: u64) -> Self {
        self.chunk_delay_ms = Some(ms);
        self
    }
}

/// Stream the configured turn, ending with `done` unless it disconnects.
pub fn mock_stream(config: MockConfig) -> impl Stream<Item = Result<ChatEvent, ClientError>> {
    stream! {
        for response in config.responses {
            if let Some(delay_ms) = config.chunk_delay_ms {
                sleep(Duration::from_millis(delay_ms)).await;
            }

            match response {
                MockResponse::Transfer { agent, message } => {
                    yield Ok(ChatEvent::transfer(agent, message));
                }
                MockResponse::Text { content } => {
                    yield Ok(ChatEvent::content(content));
                }
                MockResponse::Error { message } => {
                    yield Ok(ChatEvent::error(message));
                }
                MockResponse::Disconnect { reason } => {
                    yield Err(ClientError::Stream(reason));
                    return;
                }
                MockResponse::Delay { ms } => {
                    sleep(Duration::from_millis(ms)).await;
                }
            }
        }

        yield Ok(ChatEvent::Done);
    }
}

/// Render events as a `data: <json>\n` response body.
pub fn to_sse_body(events: &[ChatEvent]) -> String {
    events
        .iter()
        .filter_map(|event| serde_json::to_string(event).ok())
        .map(|json| format!("data: {json}\n"))
        .collect()
}

/// Built-in scripted turns.
pub mod fixtures {
    use super::*;
    use lg_protocol::{encode_preview_link, PreviewKind};
    use serde_json::json;

    /// Stream text from the current agent in chunks.
    pub fn streaming_text(chunks: &[&str]) -> MockConfig {
        let responses = chunks
            .iter()
            .map(|chunk| MockResponse::Text {
                content: (*chunk).to_string(),
            })
            .collect();

        MockConfig::new().with_responses(responses)
    }

    /// The coordinator hands off to a specialist who answers.
    pub fn handoff(intro: &str, agent: &str, answer: &str) -> MockConfig {
        MockConfig::new().with_responses(vec![
            MockResponse::Text {
                content: intro.to_string(),
            },
            MockResponse::Transfer {
                agent: agent.to_string(),
                message: format!("Transferring you to {agent}"),
            },
            MockResponse::Text {
                content: answer.to_string(),
            },
        ])
    }

    /// Emit text, then an error event.
    pub fn error_mid_stream(text_before: &str, error: &str) -> MockConfig {
        MockConfig::new().with_responses(vec![
            MockResponse::Text {
                content: text_before.to_string(),
            },
            MockResponse::Error {
                message: error.to_string(),
            },
        ])
    }

    /// A travel-planning turn whose answer carries preview links.
    pub fn travel_demo() -> MockConfig {
        let flight = encode_preview_link(
            &PreviewKind::Flight,
            &json!({
                "flight_number": "LG204",
                "airline": "Aurelian Air",
                "origin": "JFK",
                "destination": "FCO",
                "departure_date": "2025-06-12",
                "departure_time": "18:40",
                "arrival_time": "09:05",
                "duration": "8h 25m",
                "price": 842,
                "direct": true,
                "stops": 0,
                "seats_available": 7
            }),
        );
        let hotel = encode_preview_link(
            &PreviewKind::Accommodation,
            &json!({
                "id": "H-118",
                "name": "Albergo del Senato",
                "type": "Hotel",
                "destination": "Rome",
                "price_per_night": 310,
                "rating": 4.7,
                "reviews_count": 1284,
                "check_in": "2025-06-13",
                "check_out": "2025-06-18",
                "amenities": ["Rooftop terrace", "Breakfast", "Wi-Fi"]
            }),
        );

        MockConfig::new().with_responses(vec![
            MockResponse::Text {
                content: "Let me bring in our flight specialist.".to_string(),
            },
            MockResponse::Transfer {
                agent: "Jenny".to_string(),
                message: "Transferring you to Jenny".to_string(),
            },
            MockResponse::Text {
                content: format!("I found a direct option: [LG204 to Rome]({flight})."),
            },
            MockResponse::Transfer {
                agent: "Marcus".to_string(),
                message: "Transferring you to Marcus".to_string(),
            },
            MockResponse::Text {
                content: format!("For your stay, consider [Albergo del Senato]({hotel})."),
            },
        ])
    }
}
