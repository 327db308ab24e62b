//! Route definitions for the admin test-runner page.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::testrun;
use crate::state::AppState;

/// Routes mounted at `/admin` (all admin-gated).
///
/// ```text
/// GET  /tests      -> runner status
/// POST /tests/run  -> execute the suite
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tests", get(testrun::status))
        .route("/tests/run", post(testrun::run))
}
