pub mod admin;
pub mod auth;
pub mod debug;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the console route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login            login via the backend (public)
/// /auth/logout           clear this browser's session
/// /auth/session          current session record
///
/// /debug/session         resolved backend URL + session dump
/// /debug/login-probe     raw POST {backend}/auth/login
/// /debug/users-probe     raw GET {backend}/users with session auth
///
/// /admin/tests           test-runner status (admin only)
/// /admin/tests/run       execute the suite (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Session bookkeeping (login, logout, session view).
        .nest("/auth", auth::router())
        // Debug console for probing the backend.
        .nest("/debug", debug::router())
        // Admin test-runner page.
        .nest("/admin", admin::router())
}
