//! Debug console: session dump and raw backend probes.
//!
//! Everything here exists for manual inspection. Probe failures are
//! reported inside the response body instead of failing the request, the
//! same way the page keeps rendering after a backend error.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use mktlab_core::gate::auth_headers;
use mktlab_core::session::SessionData;

use crate::backend::Probe;
use crate::middleware::auth::ClientSession;
use crate::response::DataResponse;
use crate::state::AppState;

/// Prefilled probe credentials, matching the page defaults.
const DEFAULT_PROBE_EMAIL: &str = "login_test@mktlab.com";
const DEFAULT_PROBE_PASSWORD: &str = "Test123!";

/// Response for `GET /debug/session`.
#[derive(Debug, Serialize)]
pub struct SessionDump {
    /// Backend base URL the console resolved at startup.
    pub backend_url: String,
    /// Complete session record for this browser.
    pub session: SessionData,
}

/// Request body for the login probe; fields fall back to the prefilled
/// test credentials.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Outcome of a probe as displayed by the console: either a status + body
/// pair, or the error message from the failed call.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    fn success(probe: Probe) -> Self {
        Self {
            status: Some(probe.status),
            json: probe.json,
            raw: Some(probe.text),
            error: None,
        }
    }

    fn failure(message: String) -> Self {
        Self {
            status: None,
            json: None,
            raw: None,
            error: Some(message),
        }
    }
}

/// GET /debug/session -- resolved backend URL plus the full session record.
pub async fn session_dump(
    State(state): State<AppState>,
    session: ClientSession,
) -> Json<DataResponse<SessionDump>> {
    Json(DataResponse {
        data: SessionDump {
            backend_url: state.config.backend_url.clone(),
            session: session.data,
        },
    })
}

/// POST /debug/login-probe -- raw `POST {backend}/auth/login`.
pub async fn login_probe(
    State(state): State<AppState>,
    body: Option<Json<ProbeRequest>>,
) -> Json<DataResponse<ProbeReport>> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let email = input
        .email
        .unwrap_or_else(|| DEFAULT_PROBE_EMAIL.to_string());
    let password = input
        .password
        .unwrap_or_else(|| DEFAULT_PROBE_PASSWORD.to_string());

    let report = match state.backend.login(&email, &password).await {
        Ok(probe) => ProbeReport::success(probe),
        Err(e) => ProbeReport::failure(format!("Error llamando al backend: {e}")),
    };

    Json(DataResponse { data: report })
}

/// POST /debug/users-probe -- raw `GET {backend}/users`.
///
/// Uses this session's auth headers; anonymous when not logged in, so the
/// backend's own 401 shows up in the report.
pub async fn users_probe(
    State(state): State<AppState>,
    session: ClientSession,
) -> Json<DataResponse<ProbeReport>> {
    let headers = auth_headers(&session.data);

    let report = match state.backend.list_users(&headers).await {
        Ok(probe) => ProbeReport::success(probe),
        Err(e) => ProbeReport::failure(format!("Error llamando al backend (users): {e}")),
    };

    Json(DataResponse { data: report })
}
