//! In-memory per-browser session store.
//!
//! Each browser is identified by an opaque session-id cookie; the store
//! maps that id to its [`SessionData`] record. State lives for the
//! process lifetime only -- there is no persistence and no expiry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use mktlab_core::session::SessionData;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "mktlab_session";

/// Process-lifetime store of per-browser [`SessionData`] records.
///
/// A missing entry is the unauthenticated state; logout removes the
/// entry. Cheaply cloneable.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the record for `id`; fresh unauthenticated data when absent.
    pub async fn snapshot(&self, id: Uuid) -> SessionData {
        self.inner.read().await.get(&id).cloned().unwrap_or_default()
    }

    /// Normalize a login response into the record for `id` and return the
    /// updated snapshot.
    pub async fn apply_login_response(&self, id: Uuid, data: &Value) -> SessionData {
        let mut guard = self.inner.write().await;
        let record = guard.entry(id).or_default();
        record.apply_login_response(data);
        record.clone()
    }

    /// Drop the record for `id` (logout).
    pub async fn clear(&self, id: Uuid) {
        self.inner.write().await.remove(&id);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
