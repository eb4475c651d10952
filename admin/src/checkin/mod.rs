//! Door check-in workflow.
//!
//! The server owns ticket status transitions; this module submits codes,
//! shows what the server answered and keeps a short history of recent
//! validations. The state machine lives in [`CheckInReducer`] and runs in an
//! `arenaticket_runtime::Store`; [`CheckInWorkflow`] is the screen-facing API.

pub mod actions;
pub mod environment;
pub mod history;
pub mod reducer;
pub mod state;
pub mod workflow;

pub use actions::CheckInAction;
pub use environment::{classify, resolve, CheckInEnvironment};
pub use history::TicketHistory;
pub use reducer::CheckInReducer;
pub use state::{CheckInPhase, CheckInState};
pub use workflow::CheckInWorkflow;
