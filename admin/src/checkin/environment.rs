//! Check-in environment and outcome classification.

use crate::constants::INVALID_TICKET_MESSAGE;
use crate::error::AdminError;
use crate::providers::CheckInApi;
use arenaticket_client::types::{CheckInResponse, Ticket};
use std::sync::Arc;

/// Dependencies of the check-in reducer.
#[derive(Debug)]
pub struct CheckInEnvironment<A: CheckInApi> {
    /// Check-in endpoints
    pub api: Arc<A>,
}

impl<A: CheckInApi> Clone for CheckInEnvironment<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: CheckInApi> CheckInEnvironment<A> {
    /// Environment over `api`.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self { api: Arc::new(api) }
    }

    /// Environment sharing an existing `api`.
    #[must_use]
    pub const fn shared(api: Arc<A>) -> Self {
        Self { api }
    }
}

/// Map a transport-level error to the check-in taxonomy.
///
/// 404 means no ticket matches; 400/409/410/422 are business rejections
/// (used, expired, cancelled, invalid); everything else stays a request or
/// transport failure.
#[must_use]
pub fn classify(error: AdminError) -> AdminError {
    match error {
        AdminError::RequestFailed { status: 404, message } => AdminError::NotFound(message),
        AdminError::RequestFailed {
            status: 400 | 409 | 410 | 422,
            message,
        } => AdminError::ValidationRejected(message),
        other => other,
    }
}

/// Interpret a check-in answer: a ticket, or a rejection carrying the
/// server's message.
///
/// # Errors
///
/// Returns `AdminError::ValidationRejected` when the answer has no ticket.
pub fn resolve(response: CheckInResponse) -> Result<Ticket, AdminError> {
    response.ticket.ok_or_else(|| {
        AdminError::ValidationRejected(
            response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| INVALID_TICKET_MESSAGE.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_business_outcomes() {
        let failed = |status| AdminError::RequestFailed {
            status,
            message: "m".into(),
        };
        assert_eq!(classify(failed(404)), AdminError::NotFound("m".into()));
        for status in [400, 409, 410, 422] {
            assert_eq!(classify(failed(status)), AdminError::ValidationRejected("m".into()));
        }
        assert_eq!(classify(failed(500)), failed(500));
        assert_eq!(
            classify(AdminError::Transport("reset".into())),
            AdminError::Transport("reset".into())
        );
    }

    #[test]
    fn answer_without_ticket_is_rejected() {
        let with_message = CheckInResponse {
            ticket: None,
            message: Some("Bilhete já utilizado".into()),
        };
        assert_eq!(
            resolve(with_message),
            Err(AdminError::ValidationRejected("Bilhete já utilizado".into()))
        );

        let bare = CheckInResponse {
            ticket: None,
            message: None,
        };
        assert_eq!(
            resolve(bare),
            Err(AdminError::ValidationRejected("Bilhete inválido".into()))
        );
    }
}
