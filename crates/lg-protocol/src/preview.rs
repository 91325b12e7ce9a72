//! The `preview://` link micro-format.
//!
//! Agents embed structured records in chat markdown as
//! `[label](preview://<type>/<percent-encoded JSON>)`. The client decodes
//! the link into a [`PreviewPayload`] and opens a detail panel for it.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use thiserror::Error;

pub const PREVIEW_SCHEME: &str = "preview://";

/// `encodeURIComponent`'s unreserved set, minus the parentheses that would
/// close a markdown link target early.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'');

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("not a preview link: {0}")]
    NotPreview(String),
    #[error("preview link has no type segment")]
    MissingType,
    #[error("invalid percent-encoding at byte {0}")]
    InvalidEncoding(usize),
    #[error("preview payload is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("preview payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// The record types the backend knows how to preview.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewKind {
    Flight,
    Accommodation,
    Attraction,
    Restaurant,
    Itinerary,
    Budget,
    /// A tag this client has no dedicated layout for.
    Unknown(String),
}

impl PreviewKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "flight" => Self::Flight,
            "accommodation" => Self::Accommodation,
            "attraction" => Self::Attraction,
            "restaurant" => Self::Restaurant,
            "itinerary" => Self::Itinerary,
            "budget" => Self::Budget,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Flight => "flight",
            Self::Accommodation => "accommodation",
            Self::Attraction => "attraction",
            Self::Restaurant => "restaurant",
            Self::Itinerary => "itinerary",
            Self::Budget => "budget",
            Self::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded preview link.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPayload {
    pub kind: PreviewKind,
    pub data: Value,
}

/// Decode a `preview://<type>/<percent-encoded JSON>` link.
///
/// Everything after the first `/` following the type belongs to the payload,
/// so encoded JSON that happens to contain raw slashes still decodes.
pub fn decode_preview_link(href: &str) -> Result<PreviewPayload, PreviewError> {
    let rest = href
        .strip_prefix(PREVIEW_SCHEME)
        .ok_or_else(|| PreviewError::NotPreview(href.to_string()))?;

    let (tag, encoded) = rest.split_once('/').unwrap_or((rest, ""));
    if tag.is_empty() {
        return Err(PreviewError::MissingType);
    }

    check_percent_escapes(encoded)?;
    let json = percent_decode_str(encoded).decode_utf8()?;
    let data = serde_json::from_str(&json)?;

    Ok(PreviewPayload {
        kind: PreviewKind::parse(tag),
        data,
    })
}

/// Build a preview link the way the backend does.
pub fn encode_preview_link(kind: &PreviewKind, data: &Value) -> String {
    let json = data.to_string();
    format!(
        "{PREVIEW_SCHEME}{}/{}",
        kind.as_str(),
        utf8_percent_encode(&json, COMPONENT)
    )
}

/// Reject `%` not followed by two hex digits; `percent_decode_str` would
/// otherwise pass such sequences through untouched.
fn check_percent_escapes(s: &str) -> Result<(), PreviewError> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(PreviewError::InvalidEncoding(i));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
