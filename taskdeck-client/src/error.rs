/// Client error types
///
/// Fetch operations absorb their errors into the owning container's state;
/// everything else (mutations, settings updates) returns a `ClientError` to
/// the caller.

use taskdeck_shared::auth::authorization::AuthzError;

/// Client result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Unified client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure (connection refused, timeout, bad body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// Input rejected before any request was made
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Current role may not perform the action
    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    /// No signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Identity provider failure
    #[error("Session provider error: {0}")]
    Session(String),
}

impl ClientError {
    /// HTTP status of a server-side failure, if any
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdeck_shared::models::user::UserRole;

    #[test]
    fn test_error_display() {
        let err = ClientError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            message: "Insufficient permissions".to_string(),
        };
        assert_eq!(err.to_string(), "Server returned 403 Forbidden: Insufficient permissions");
        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));

        let err: ClientError = AuthzError::Forbidden {
            role: UserRole::Admin,
            permitted: vec![UserRole::Owner],
        }
        .into();
        assert!(err.to_string().contains("Admin"));
        assert_eq!(err.status(), None);
    }
}
