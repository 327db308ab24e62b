//! Handlers for the `/auth` resource (login, session view, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use mktlab_core::error::CoreError;
use mktlab_core::session::SessionData;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientSession;
use crate::response::DataResponse;
use crate::sessions::SESSION_COOKIE;
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
///
/// Forwards the credentials to the backend. A successful response is
/// normalized into this browser's session record, and the session cookie
/// is (re)issued.
pub async fn login(
    State(state): State<AppState>,
    session: ClientSession,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    // 1. Forward credentials to the backend.
    let probe = state.backend.login(&input.email, &input.password).await?;

    // 2. A non-2xx backend answer is a failed login.
    if !probe.is_success() {
        let message = probe
            .json
            .as_ref()
            .and_then(|v| v.get("detail").or_else(|| v.get("error")))
            .and_then(Value::as_str)
            .unwrap_or("Credenciales inválidas")
            .to_string();
        return Err(AppError::Core(CoreError::Unauthorized(message)));
    }

    // 3. Normalize the response body into the session record. A body that
    //    is not JSON falls through as a no-op (the session stays clean).
    let sid = session.id.unwrap_or_else(Uuid::new_v4);
    let body = probe.json.unwrap_or(Value::Null);
    let data = state.sessions.apply_login_response(sid, &body).await;

    tracing::info!(user = ?data.auth_user_email, "Login succeeded");

    // 4. (Re)issue the session cookie.
    let cookie = format!("{SESSION_COOKIE}={sid}; Path=/; HttpOnly; SameSite=Lax");
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(DataResponse { data }),
    ))
}

/// POST /auth/logout
///
/// Clears this browser's session record. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    session: ClientSession,
) -> AppResult<StatusCode> {
    if let Some(id) = session.id {
        state.sessions.clear(id).await;
        tracing::debug!(session_id = %id, "Session cleared");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/session
///
/// The current session record (fresh and unauthenticated when the browser
/// has no session yet).
pub async fn session(session: ClientSession) -> Json<DataResponse<SessionData>> {
    Json(DataResponse { data: session.data })
}
