//! Admin-session UI marker.
//!
//! The backend is the authority on whether an admin session is active. The
//! marker only lets the client remember, across restarts, that it logged in
//! at some point so the admin console can be offered before the first
//! round-trip completes.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{KeyValueStore, StoreError, StoreExt};

/// Storage key of the marker.
pub const ADMIN_SESSION_KEY: &str = "admin_session_ui_state";

/// What is written under [`ADMIN_SESSION_KEY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSessionMarker {
    /// When the session was marked (Unix millis).
    pub timestamp: i64,
}

/// Reads and writes the admin-session marker.
#[derive(Clone)]
pub struct AdminSessionHint {
    storage: Arc<dyn KeyValueStore>,
}

impl AdminSessionHint {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Record that an admin session was started now.
    pub fn mark(&self) -> Result<AdminSessionMarker, StoreError> {
        let marker = AdminSessionMarker {
            timestamp: Utc::now().timestamp_millis(),
        };
        self.storage.set(ADMIN_SESSION_KEY, &marker)?;
        Ok(marker)
    }

    /// The stored marker, if any. Unreadable entries count as absent.
    pub fn get(&self) -> Option<AdminSessionMarker> {
        match self.storage.get::<AdminSessionMarker>(ADMIN_SESSION_KEY) {
            Ok(marker) => marker,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable admin session marker");
                None
            }
        }
    }

    pub fn is_marked(&self) -> bool {
        self.get().is_some()
    }

    /// Remove the marker.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.delete(ADMIN_SESSION_KEY)
    }
}

impl std::fmt::Debug for AdminSessionHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSessionHint").finish_non_exhaustive()
    }
}
