//! Account and card-application payloads.

use serde::{Deserialize, Serialize};

use crate::card::{ApprovalTier, CardSlug};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// Profile returned by `/api/auth/me` and on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub salary: f64,
    pub net_worth: f64,
    pub credit_score: u32,
    pub address: Address,
    #[serde(default)]
    pub current_card: Option<CardSlug>,
    /// ISO 8601
    #[serde(default)]
    pub rejection_date: Option<String>,
    #[serde(default)]
    pub interest_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub card_slug: CardSlug,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub success: bool,
    pub status: ApplicationStatus,
    pub approval_tier: ApprovalTier,
    pub interest_rate: Option<f64>,
    pub message: String,
    pub rejection_date: Option<String>,
}
