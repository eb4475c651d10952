//! # ArenaTicket staff client
//!
//! Door staff, box-office sellers and administrators share this client. It
//! holds the signed-in session, decides which screens a role may open, runs
//! door check-in, keeps cached copies of server resources and prints tickets
//! and receipts on point-of-sale terminals.
//!
//! ## Architecture
//!
//! ```text
//! RouteGuard ─▶ command ─▶ store / workflow ─▶ ApiClient ─▶ server
//!      │                        │
//!      └──── SessionManager ◀───┘ (token source)
//! ```
//!
//! The check-in workflow is a reducer running in an
//! `arenaticket_runtime::Store`; the resource stores are thin cached
//! wrappers over the API client.
//!
//! ## Example: door check-in
//!
//! ```rust,ignore
//! use arenaticket_admin::checkin::{CheckInPhase, CheckInWorkflow};
//! use arenaticket_admin::providers::HttpCheckInApi;
//!
//! let door = CheckInWorkflow::new(HttpCheckInApi::new(session.api().clone()));
//! match door.submit("ABC123", None).await {
//!     CheckInPhase::Valid(ticket) => println!("{} {}", ticket.code, ticket.status),
//!     CheckInPhase::Failed(error) => eprintln!("{error}"),
//!     _ => {},
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod checkin;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod printer;
pub mod providers;
pub mod router;
pub mod session;
pub mod stores;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use checkin::{CheckInPhase, CheckInWorkflow};
pub use cli::{App, Cli, Command};
pub use config::Config;
pub use error::{AdminError, Result};
pub use router::{Navigation, RouteGuard};
pub use session::{Credentials, RestoreOutcome, SessionHandle, SessionManager, SessionState};
