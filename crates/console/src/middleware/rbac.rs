//! Gate extractors built on [`ClientSession`].
//!
//! Each extractor runs the corresponding core gate and converts a failed
//! outcome into the HTTP response the page shows: 401 with the login link,
//! or 403 with the denial message. Use these in route handlers to enforce
//! the gates at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mktlab_core::error::CoreError;
use mktlab_core::gate::{self, Gate};
use mktlab_core::session::SessionData;

use super::auth::ClientSession;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an active login. Responds 401 with the login link otherwise.
///
/// ```ignore
/// async fn gated(RequireLogin(session): RequireLogin) -> AppResult<Json<()>> {
///     // session is guaranteed to hold a token here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireLogin(pub SessionData);

impl FromRequestParts<AppState> for RequireLogin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = ClientSession::from_request_parts(parts, state).await?;
        let data = check(gate::require_login(&session.data), session.data)?;
        Ok(RequireLogin(data))
    }
}

/// Requires the ADMIN role. Runs the login gate first, like the pages do.
pub struct RequireAdmin(pub SessionData);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = ClientSession::from_request_parts(parts, state).await?;
        let data = check(gate::require_admin(&session.data), session.data)?;
        Ok(RequireAdmin(data))
    }
}

/// Convert a gate outcome into the session data or the matching response.
fn check(outcome: Gate, data: SessionData) -> Result<SessionData, AppError> {
    match outcome {
        Gate::Authorized => Ok(data),
        Gate::Redirect { location } => Err(AppError::LoginRequired {
            message: gate::LOGIN_NOTICE.to_string(),
            location,
        }),
        Gate::Forbidden { message } => Err(AppError::Core(CoreError::Forbidden(message))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
