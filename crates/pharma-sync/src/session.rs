//! Admin session state machine.
//!
//! Login and logout outcomes are fed in as events. The resulting state is
//! what the client writes into the cached `adminSessionActive` flag, so a
//! failed login forces the flag to `false` immediately instead of waiting
//! for the next fetch.

use std::sync::{Mutex, PoisonError};

use pharma_store::AdminSessionHint;
use serde::{Deserialize, Serialize};

/// Whether the client believes an admin session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminSessionState {
    Active,
    #[default]
    Inactive,
}

impl AdminSessionState {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }

    /// Next state after `event`.
    pub fn on(self, event: AdminSessionEvent) -> Self {
        match event {
            AdminSessionEvent::LoginSucceeded => Self::Active,
            AdminSessionEvent::LoginRejected
            | AdminSessionEvent::LoginFailed
            | AdminSessionEvent::LoggedOut => Self::Inactive,
        }
    }
}

/// Outcomes of admin login and logout mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSessionEvent {
    /// The backend accepted the credentials.
    LoginSucceeded,
    /// The backend answered and refused the credentials.
    LoginRejected,
    /// The login call itself failed.
    LoginFailed,
    /// Logout completed.
    LoggedOut,
}

/// Holds the current state and mirrors it into the local UI marker.
#[derive(Debug, Default)]
pub struct AdminSession {
    state: Mutex<AdminSessionState>,
    hint: Option<AdminSessionHint>,
}

impl AdminSession {
    /// A session that keeps no local marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session that writes the marker on login and clears it on logout.
    pub fn with_hint(hint: AdminSessionHint) -> Self {
        Self {
            state: Mutex::default(),
            hint: Some(hint),
        }
    }

    pub fn state(&self) -> AdminSessionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a marker from an earlier run is present.
    pub fn previously_marked(&self) -> bool {
        self.hint.as_ref().is_some_and(AdminSessionHint::is_marked)
    }

    /// Apply `event` and return the new state.
    pub fn apply(&self, event: AdminSessionEvent) -> AdminSessionState {
        let (from, to) = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let from = *state;
            *state = from.on(event);
            (from, *state)
        };

        tracing::info!(?event, ?from, ?to, "admin session transition");
        self.sync_hint(to);
        to
    }

    fn sync_hint(&self, state: AdminSessionState) {
        let Some(hint) = &self.hint else {
            return;
        };

        let result = match state {
            AdminSessionState::Active => hint.mark().map(|_| ()),
            AdminSessionState::Inactive => hint.clear(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to update admin session marker");
        }
    }
}
