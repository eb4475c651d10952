//! Check-in actions.

use crate::error::AdminError;
use arenaticket_client::types::Ticket;

/// Operator intents and server outcomes for the door screen.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInAction {
    // Commands
    /// Validate a scanned or typed code
    Submit {
        /// Ticket code
        code: String,
        /// Restrict to this event
        event_id: Option<String>,
    },
    /// Reset the validation slot (history is kept)
    Clear,

    // Outcomes
    /// The server returned a ticket
    Validated {
        /// Resolved ticket
        ticket: Ticket,
    },
    /// The code was rejected or the request failed
    Rejected {
        /// Classified error
        error: AdminError,
    },
    /// The server confirmed a previously validated ticket
    Confirmed {
        /// Updated ticket
        ticket: Ticket,
    },
}
