//! Authentication and card-application endpoints.

use std::time::Duration;

use lg_protocol::{
    ApplicationRequest, ApplicationResponse, CardSlug, LoginRequest, LoginResponse, User,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::error::ClientError;
use crate::http::{build_http_client, check_status, endpoint};

const LOGIN_PATH: &str = "/api/auth/login";
const ME_PATH: &str = "/api/auth/me";
const APPLY_PATH: &str = "/api/cards/apply";

/// Client for the bearer-authenticated account API.
///
/// The client holds no token; callers pass the one from their session and
/// must drop it when a call returns [`ClientError::Unauthorized`].
#[derive(Clone)]
pub struct AccountClient {
    base_url: String,
    http: Client,
    timeout: Duration,
}

impl AccountClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into(),
            http: build_http_client()?,
            timeout,
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(endpoint(&self.base_url, LOGIN_PATH))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        let login: LoginResponse = check_status(response).await?.json().await?;
        info!(user = %login.user.username, "logged in");
        Ok(login)
    }

    pub async fn me(&self, token: &str) -> Result<User, ClientError> {
        let response = self
            .http
            .get(endpoint(&self.base_url, ME_PATH))
            .timeout(self.timeout)
            .bearer_auth(token)
            .send()
            .await?;
        let user = check_status(response).await?.json().await?;
        Ok(user)
    }

    pub async fn apply_for_card(
        &self,
        token: &str,
        card: CardSlug,
    ) -> Result<ApplicationResponse, ClientError> {
        debug!(%card, "submitting card application");
        let response = self
            .http
            .post(endpoint(&self.base_url, APPLY_PATH))
            .timeout(self.timeout)
            .bearer_auth(token)
            .json(&ApplicationRequest { card_slug: card })
            .send()
            .await?;
        let result = check_status(response).await?.json().await?;
        Ok(result)
    }
}
