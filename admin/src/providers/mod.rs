//! Provider traits and their production implementations.
//!
//! Screens and workflows depend on these traits; tests swap in the types
//! from [`crate::mocks`].

pub mod checkin_api;
pub mod file_storage;
pub mod storage;

pub use checkin_api::{CheckInApi, HttpCheckInApi};
pub use file_storage::FileStorage;
pub use storage::SessionStorage;
