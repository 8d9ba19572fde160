//! Error types for the synchronization layer.

use pharma_commerce::CommerceError;
use thiserror::Error;

/// Failures reported by the backend collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller lacks permission for the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The call never produced a reply.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend rejected the call for another reason.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Errors surfaced by queries and mutations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// No backend connection has been established yet.
    #[error("Actor not available")]
    ActorNotAvailable,

    /// Admin login reached the backend and the credentials were refused.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Client-side validation failed before any call was made.
    #[error("Validation failed: {0}")]
    Validation(#[from] CommerceError),

    /// A cached value could not be encoded or decoded.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        Self::Cache(e.to_string())
    }
}

impl SyncError {
    /// Whether the caller was refused for lack of permission or credentials.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::Backend(BackendError::Unauthorized(_))
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Backend(BackendError::NotFound(_)))
    }

    /// Text for the transient notification shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ActorNotAvailable => {
                "Not connected to the server yet. Please try again in a moment.".to_string()
            }
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::Backend(BackendError::Unauthorized(_)) => {
                "You are not authorized to perform this action.".to_string()
            }
            Self::Backend(BackendError::NotFound(what)) => format!("Not found: {}", what),
            Self::Backend(BackendError::Transport(_)) => {
                "Could not reach the server. Please check your connection.".to_string()
            }
            Self::Backend(BackendError::Rejected(reason)) => reason.clone(),
            Self::Validation(e) => e.to_string(),
            Self::Cache(_) => "Something went wrong. Please reload.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_taxonomy() {
        assert!(SyncError::InvalidCredentials.is_authorization());
        assert!(SyncError::from(BackendError::Unauthorized("admin only".into())).is_authorization());
        assert!(!SyncError::from(BackendError::Transport("reset".into())).is_authorization());
        assert!(!SyncError::ActorNotAvailable.is_authorization());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SyncError::InvalidCredentials.user_message(),
            "Invalid email or password."
        );
        assert_eq!(
            SyncError::from(CommerceError::MissingField("email")).user_message(),
            CommerceError::MissingField("email").to_string()
        );
        assert!(SyncError::from(BackendError::NotFound("order 7".into()))
            .user_message()
            .contains("order 7"));
    }

    #[test]
    fn test_display_distinguishes_credentials_from_transport() {
        assert_eq!(SyncError::InvalidCredentials.to_string(), "Invalid credentials");
        assert_eq!(
            SyncError::from(BackendError::Transport("timeout".into())).to_string(),
            "transport error: timeout"
        );
    }
}
