//! Route definitions for the debug console.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::debug;
use crate::state::AppState;

/// Routes mounted at `/debug`.
///
/// ```text
/// GET  /session       -> backend URL + session dump
/// POST /login-probe   -> raw backend login call
/// POST /users-probe   -> raw backend users call
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(debug::session_dump))
        .route("/login-probe", post(debug::login_probe))
        .route("/users-probe", post(debug::users_probe))
}
