//! Check-in workflow state.

use super::history::TicketHistory;
use crate::error::AdminError;
use arenaticket_client::types::Ticket;

/// Where the single validation slot stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckInPhase {
    /// Nothing loaded, no error
    #[default]
    Idle,
    /// Request in flight for `code`
    Validating {
        /// Code being validated
        code: String,
    },
    /// Server returned a ticket (whatever its status)
    Valid(Ticket),
    /// Server rejected the code or the request failed
    Failed(AdminError),
}

impl CheckInPhase {
    /// Ticket on display.
    #[must_use]
    pub const fn ticket(&self) -> Option<&Ticket> {
        match self {
            Self::Valid(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Error on display.
    #[must_use]
    pub const fn error(&self) -> Option<&AdminError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Door screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckInState {
    /// Validation slot
    pub phase: CheckInPhase,
    /// Recent successful validations
    pub history: TicketHistory,
}

impl CheckInState {
    /// A validation request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, CheckInPhase::Validating { .. })
    }
}
