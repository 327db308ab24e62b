//! Login / admin gates and the auth header helper.
//!
//! A page that fails a gate does not render. The check returns a [`Gate`]
//! outcome and the HTTP layer decides how to answer: send the user to the
//! login page, or show the denial message.

use std::collections::HashMap;

use crate::roles::ROLE_ADMIN;
use crate::session::SessionData;

/// Path of the login page unauthenticated users are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Notice shown when a page requires a login.
pub const LOGIN_NOTICE: &str = "Tenés que iniciar sesión.";

/// Message shown when a page requires the admin role.
pub const ADMIN_DENIED: &str = "No tenés permisos para acceder a este panel.";

/// Outcome of a page gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// The check passed; the page may render.
    Authorized,
    /// No active login; send the user to `location`.
    Redirect { location: &'static str },
    /// Logged in but not allowed; show `message` and stop.
    Forbidden { message: String },
}

/// Gate a page on an active login.
pub fn require_login(session: &SessionData) -> Gate {
    if !session.is_logged_in() {
        return Gate::Redirect {
            location: LOGIN_PATH,
        };
    }
    Gate::Authorized
}

/// Gate a page on the admin role. Runs the login gate first.
///
/// Roles are re-upper-cased before the comparison; an absent or empty role
/// list simply fails the check.
pub fn require_admin(session: &SessionData) -> Gate {
    match require_login(session) {
        Gate::Authorized => {}
        other => return other,
    }

    let is_admin = session.roles.iter().any(|r| r.to_uppercase() == ROLE_ADMIN);
    if !is_admin {
        return Gate::Forbidden {
            message: ADMIN_DENIED.to_string(),
        };
    }
    Gate::Authorized
}

/// `Authorization` header for authenticated backend requests.
///
/// Empty when there is no active login. No side effects.
pub fn auth_headers(session: &SessionData) -> HashMap<String, String> {
    match &session.auth_token {
        Some(token) => HashMap::from([("Authorization".to_string(), format!("Bearer {token}"))]),
        None => HashMap::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
