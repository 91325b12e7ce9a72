//! lg-protocol: Shared types for the Legion concierge client.
//!
//! This crate defines the wire types exchanged with the concierge backend
//! (chat events, account and application payloads), the display message
//! model, the static card catalog and the `preview://` link format.

pub mod account;
pub mod card;
pub mod event;
pub mod message;
pub mod preview;

pub use account::{
    Address, ApplicationRequest, ApplicationResponse, ApplicationStatus, LoginRequest,
    LoginResponse, User,
};
pub use card::{find_card, ApprovalThresholds, ApprovalTier, CardSlug, CreditCard, TierThresholds, CARDS};
pub use event::{ChatEvent, ChatRequest};
pub use message::{Message, MessageKind};
pub use preview::{decode_preview_link, encode_preview_link, PreviewError, PreviewKind, PreviewPayload};
