//! Session-cookie extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use uuid::Uuid;

use mktlab_core::session::SessionData;

use crate::error::AppError;
use crate::sessions::SESSION_COOKIE;
use crate::state::AppState;

/// The caller's browser session, resolved from the session-id cookie.
///
/// `id` is `None` when the request carries no valid session cookie; `data`
/// is then a fresh unauthenticated [`SessionData`]. Use this in handlers
/// that read the session without gating on it:
///
/// ```ignore
/// async fn my_handler(session: ClientSession) -> Json<DataResponse<SessionData>> {
///     Json(DataResponse { data: session.data })
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientSession {
    pub id: Option<Uuid>,
    pub data: SessionData,
}

impl FromRequestParts<AppState> for ClientSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = session_id_from_cookies(parts);
        let data = match id {
            Some(id) => state.sessions.snapshot(id).await,
            None => SessionData::default(),
        };
        Ok(ClientSession { id, data })
    }
}

/// Parse the session cookie out of the `Cookie` header(s).
fn session_id_from_cookies(parts: &Parts) -> Option<Uuid> {
    parts.headers.get_all(COOKIE).iter().find_map(|value| {
        let raw = value.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (name, val) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE)
                .then(|| Uuid::parse_str(val.trim()).ok())
                .flatten()
        })
    })
}
