//! HTTP client for the remote MKT Lab backend.
//!
//! Calls are synchronous from the page's point of view: one bounded
//! attempt, no retries, no cancellation. Failures are returned to the
//! caller, which decides whether to display them or fail the request.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// Result of one backend call, as displayed by the debug console.
#[derive(Debug, Clone, Serialize)]
pub struct Probe {
    /// HTTP status code returned by the backend.
    pub status: u16,
    /// Body parsed as JSON, when it parses.
    pub json: Option<Value>,
    /// Raw body text.
    pub text: String,
}

impl Probe {
    /// Whether the backend answered with a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors from the backend HTTP layer (connection refused, DNS, timeout).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// HTTP client for the remote backend, with a bounded per-request timeout.
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (no trailing slash).
    pub fn new(base_url: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout,
        }
    }

    /// Base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /auth/login` with an email + password payload.
    pub async fn login(&self, email: &str, password: &str) -> Result<Probe, BackendError> {
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(format!("{}/auth/login", self.base_url))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        Self::into_probe(response).await
    }

    /// `GET /users` with the given auth headers (empty map = anonymous).
    pub async fn list_users(
        &self,
        headers: &HashMap<String, String>,
    ) -> Result<Probe, BackendError> {
        let mut request = self
            .client
            .get(format!("{}/users", self.base_url))
            .timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        Self::into_probe(response).await
    }

    /// Capture status and body; the body is kept raw alongside its JSON
    /// parse so callers can display either.
    async fn into_probe(response: reqwest::Response) -> Result<Probe, BackendError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let json = serde_json::from_str(&text).ok();
        Ok(Probe { status, json, text })
    }
}
