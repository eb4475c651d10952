//! # ArenaTicket API Client
//!
//! HTTP adapter for the ArenaTicket backend: base URL handling, bearer
//! authentication, JSON bodies, multipart uploads and normalization of
//! server errors into a single [`ApiError`] type.
//!
//! ## Example
//!
//! ```no_run
//! use arenaticket_client::{ApiClient, StaticToken};
//! use arenaticket_client::types::Event;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), arenaticket_client::ApiError> {
//!     let client = ApiClient::from_env()
//!         .with_token_source(Arc::new(StaticToken("token".into())));
//!
//!     let events: Vec<Event> = client.get("/admin/eventos").await?;
//!     println!("{} events", events.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod types;

pub use client::{ApiClient, StaticToken, TokenSource, DEFAULT_BASE_URL};
pub use error::{ApiError, Result};
