use std::sync::Arc;

use crate::backend::BackendClient;
use crate::config::ConsoleConfig;
use crate::sessions::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ConsoleConfig>,
    /// Per-browser session records, process lifetime only.
    pub sessions: SessionStore,
    /// HTTP client for the remote backend.
    pub backend: Arc<BackendClient>,
}
