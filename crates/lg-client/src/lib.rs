//! lg-client: HTTP adapters for the Legion concierge backend.
//!
//! This crate streams chat turns from the multi-agent backend and wraps the
//! account endpoints (login, profile, card application).

pub mod account;
pub mod chat;
pub mod error;
mod http;
pub mod mock;
pub mod sse;

pub use account::AccountClient;
pub use chat::ChatClient;
pub use error::ClientError;
pub use mock::{MockConfig, MockResponse};
