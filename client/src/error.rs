//! Error types for the ArenaTicket API client

use thiserror::Error;

/// Result type alias for API calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the ArenaTicket API
///
/// The adapter never retries. [`ApiError::is_retryable`] tells the caller
/// whether trying again could help.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status
    ///
    /// `message` is the server's `message` field after cleanup and the
    /// friendly remap, or `HTTP <status>` when the body had none.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Human-readable message
        message: String,
    },

    /// No response was received (connection refused, DNS, reset, ...)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body does not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Protocol(String),
}

impl ApiError {
    /// HTTP status, if the server answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Transport(_) | Self::Protocol(_) => None,
        }
    }

    /// Returns `true` when repeating the same call may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use arenaticket_client::ApiError;
    /// assert!(ApiError::Transport("connection refused".into()).is_retryable());
    /// assert!(!ApiError::RequestFailed { status: 404, message: "x".into() }.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            Self::Protocol(_) => false,
        }
    }

    /// Returns `true` for a 404 answer
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RequestFailed { status: 404, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Protocol(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_only_known_for_server_answers() {
        let failed = ApiError::RequestFailed {
            status: 409,
            message: "Bilhetes insuficientes".into(),
        };
        assert_eq!(failed.status(), Some(409));
        assert_eq!(ApiError::Transport("reset".into()).status(), None);
        assert_eq!(ApiError::Protocol("bad json".into()).status(), None);
    }

    #[test]
    fn server_faults_are_retryable() {
        let failed = ApiError::RequestFailed {
            status: 503,
            message: "HTTP 503".into(),
        };
        assert!(failed.is_retryable());
        assert!(!ApiError::Protocol("bad json".into()).is_retryable());
    }

    #[test]
    fn display_shows_message_only() {
        let failed = ApiError::RequestFailed {
            status: 404,
            message: "Bilhete não encontrado ou código inválido".into(),
        };
        assert_eq!(failed.to_string(), "Bilhete não encontrado ou código inválido");
        assert!(failed.is_not_found());
    }
}
