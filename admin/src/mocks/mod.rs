//! In-memory providers for tests.
//!
//! Available under `cfg(test)` and the default `test-utils` feature so the
//! integration tests in `tests/` can use them too.

pub mod checkin;
pub mod printer;
pub mod storage;

pub use checkin::{sample_ticket, MockCheckInApi};
pub use printer::{RecordingHost, RecordingPrinter};
pub use storage::MemoryStorage;
