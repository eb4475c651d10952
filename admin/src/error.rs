//! Error types for the staff client.

use arenaticket_client::ApiError;
use thiserror::Error;

/// Result type alias for staff client operations.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Error taxonomy surfaced to screens and CLI commands.
///
/// Every variant carries the operator-facing message; `Display` prints only
/// that message so it can be shown inline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════

    /// Login rejected, or an operation needs a session that is not there.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The session's role may not open the requested screen.
    ///
    /// The route guard redirects instead of raising this; the CLI reports it
    /// when a command is refused.
    #[error("Acesso negado (redirecionado para {redirect})")]
    AuthorizationDenied {
        /// Where the guard sent the operator instead
        redirect: String,
    },

    /// Persisted session could not be parsed; storage was cleared.
    #[error("Sessão guardada inválida: {0}")]
    StorageCorrupted(String),

    /// Durable storage could not be read or written.
    #[error("Erro de armazenamento: {0}")]
    Storage(String),

    // ═══════════════════════════════════════════════════════════
    // Business Outcomes
    // ═══════════════════════════════════════════════════════════

    /// The server rejected the ticket code (used, expired, cancelled, invalid).
    #[error("{0}")]
    ValidationRejected(String),

    /// No ticket matches the code.
    #[error("{0}")]
    NotFound(String),

    /// Input rejected before any request was made.
    #[error("{0}")]
    InvalidInput(String),

    // ═══════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════

    /// Non-2xx answer.
    #[error("{message}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Operator-facing message
        message: String,
    },

    /// No answer received.
    #[error("Falha de ligação ao servidor: {0}")]
    Transport(String),

    /// 2xx answer with a body of the wrong shape.
    #[error("Resposta inesperada do servidor: {0}")]
    Protocol(String),

    // ═══════════════════════════════════════════════════════════
    // Printer Errors
    // ═══════════════════════════════════════════════════════════

    /// No print device was found.
    #[error("{0}")]
    DeviceUnavailable(String),

    /// A device was found but printing failed.
    #[error("{0}")]
    PrintFailed(String),
}

impl AdminError {
    /// HTTP status for server answers.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when retrying the same call might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::RequestFailed { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<ApiError> for AdminError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::RequestFailed { status, message } => Self::RequestFailed { status, message },
            ApiError::Transport(message) => Self::Transport(message),
            ApiError::Protocol(message) => Self::Protocol(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_keep_status_and_message() {
        let error = AdminError::from(ApiError::RequestFailed {
            status: 409,
            message: "Este bilhete já foi utilizado".into(),
        });
        assert_eq!(error.status(), Some(409));
        assert_eq!(error.to_string(), "Este bilhete já foi utilizado");
        assert!(!error.is_retryable());
    }

    #[test]
    fn transport_errors_are_retryable() {
        let error = AdminError::from(ApiError::Transport("connection refused".into()));
        assert!(error.is_retryable());
        assert_eq!(error.status(), None);
    }
}
