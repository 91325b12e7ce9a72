use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::ClientError;

/// Build an HTTP client with a connect timeout and a small idle pool.
///
/// No overall timeout is set here: chat responses stream for as long as the
/// agents keep talking. Plain JSON calls set a per-request timeout instead.
pub(crate) fn build_http_client() -> Result<Client, ClientError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(2)
        .build()?;
    Ok(client)
}

/// Join a base URL and an absolute API path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Map non-success statuses to errors; 401 becomes [`ClientError::Unauthorized`].
pub(crate) async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    #[test]
    fn endpoint_joins_cleanly() {
        assert_eq!(
            endpoint("http://localhost:8000/", "/api/chat/stream"),
            "http://localhost:8000/api/chat/stream"
        );
        assert_eq!(
            endpoint("http://localhost:8000", "/api/auth/me"),
            "http://localhost:8000/api/auth/me"
        );
    }

    #[tokio::test]
    async fn success_passes_through() {
        let resp = check_status(response(200, "ok")).await.unwrap();
        assert_eq!(resp.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn unauthorized_is_distinct() {
        let err = check_status(response(401, "nope")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn other_failures_carry_body() {
        let err = check_status(response(500, "boom")).await.unwrap_err();
        match err {
            ClientError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn build_http_client_succeeds() {
        assert!(build_http_client().is_ok());
    }
}
