//! Error types for the MusicApp client.

use thiserror::Error;

/// Errors that can occur when talking to the MusicApp backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (request could not be completed)
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// The session can no longer be recovered; the user must log in again.
    ///
    /// Raised when the refresh exchange fails or a request is rejected twice.
    /// Stored credentials have already been discarded when this is returned.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Credentials rejected by the token or registration endpoint (401)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Request rejected with a 4xx status other than 401
    #[error("Request rejected ({status}): {body}")]
    Validation { status: u16, body: String },

    /// The resource already exists on the server
    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Server returned a 5xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// File not found for upload
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IO error while reading an upload
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map a transport error, separating connection failures from the rest.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::ServerUnreachable(err.to_string())
        } else {
            Self::Network(err)
        }
    }

    /// Whether this is a transport-level failure.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::ServerUnreachable(_))
    }

    /// Whether the caller has to re-authenticate.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::SessionExpired | Self::AuthFailed(_) => Some(401),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_http_errors() {
        let err = ClientError::Validation {
            status: 404,
            body: "Not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));

        let err = ClientError::Server {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.status(), Some(502));

        assert_eq!(ClientError::InvalidInput("x".into()).status(), None);
    }

    #[test]
    fn session_expired_is_not_a_network_error() {
        assert!(ClientError::SessionExpired.is_session_expired());
        assert!(!ClientError::SessionExpired.is_network());
        assert!(ClientError::ServerUnreachable("down".into()).is_network());
    }
}
