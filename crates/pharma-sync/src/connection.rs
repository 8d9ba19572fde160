//! Backend connection handle.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{Backend, SyncError};

/// Where the connection to the backend stands.
#[derive(Clone, Default)]
pub enum ConnectionState {
    /// No backend handle yet.
    #[default]
    Disconnected,
    /// A handle is being set up; queries stay disabled until it is ready.
    Connecting,
    /// Ready for calls.
    Connected(Arc<dyn Backend>),
}

impl std::fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected(_) => write!(f, "Connected"),
        }
    }
}

/// Shared, swappable handle to the backend.
///
/// Clones share the same underlying state.
#[derive(Clone, Default, Debug)]
pub struct Connection {
    state: Arc<RwLock<ConnectionState>>,
}

impl Connection {
    /// A handle with no backend yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is already connected.
    pub fn connected(backend: Arc<dyn Backend>) -> Self {
        let connection = Self::new();
        connection.set(ConnectionState::Connected(backend));
        connection
    }

    pub fn set(&self, state: ConnectionState) {
        tracing::debug!(state = ?state, "connection state changed");
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn state(&self) -> ConnectionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The backend, if the connection is ready.
    pub fn backend(&self) -> Option<Arc<dyn Backend>> {
        match self.state() {
            ConnectionState::Connected(backend) => Some(backend),
            _ => None,
        }
    }

    /// The backend, or [`SyncError::ActorNotAvailable`].
    pub fn require(&self) -> Result<Arc<dyn Backend>, SyncError> {
        self.backend().ok_or(SyncError::ActorNotAvailable)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), ConnectionState::Connected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryBackend;

    #[test]
    fn test_lifecycle() {
        let connection = Connection::new();
        assert!(!connection.is_ready());
        assert!(matches!(connection.require(), Err(SyncError::ActorNotAvailable)));

        connection.set(ConnectionState::Connecting);
        assert!(connection.backend().is_none());

        connection.set(ConnectionState::Connected(Arc::new(InMemoryBackend::new())));
        assert!(connection.is_ready());
        assert!(connection.require().is_ok());

        connection.set(ConnectionState::Disconnected);
        assert!(!connection.is_ready());
    }

    #[test]
    fn test_clones_share_state() {
        let a = Connection::new();
        let b = a.clone();
        a.set(ConnectionState::Connected(Arc::new(InMemoryBackend::new())));
        assert!(b.is_ready());
    }
}
