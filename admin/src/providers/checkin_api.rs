//! Check-in endpoints.

use crate::error::Result;
use arenaticket_client::types::{CheckInRequest, CheckInResponse, Ticket};
use arenaticket_client::ApiClient;
use std::future::Future;

/// Door check-in calls.
///
/// Errors are the transport-level mapping of [`arenaticket_client::ApiError`];
/// the check-in workflow classifies them into business outcomes.
pub trait CheckInApi: Send + Sync {
    /// Validate (and mark as used) the ticket with `code`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn validate(
        &self,
        code: &str,
        event_id: Option<&str>,
    ) -> impl Future<Output = Result<CheckInResponse>> + Send;

    /// Ask the server to confirm a previously validated ticket.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    fn confirm(&self, ticket_id: &str) -> impl Future<Output = Result<CheckInResponse>> + Send;

    /// Read a ticket by code without checking it in.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or no ticket matches.
    fn lookup(&self, code: &str) -> impl Future<Output = Result<Ticket>> + Send;
}

/// [`CheckInApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCheckInApi {
    client: ApiClient,
}

impl HttpCheckInApi {
    /// Wrap an authenticated API client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CheckInApi for HttpCheckInApi {
    fn validate(
        &self,
        code: &str,
        event_id: Option<&str>,
    ) -> impl Future<Output = Result<CheckInResponse>> + Send {
        let request = CheckInRequest {
            code: code.to_string(),
            event_id: event_id.map(str::to_string),
        };
        async move { Ok(self.client.post("/porteiro/checkin", &request).await?) }
    }

    fn confirm(&self, ticket_id: &str) -> impl Future<Output = Result<CheckInResponse>> + Send {
        let path = format!("/admin/checkin/{}/confirmar", urlencoding::encode(ticket_id));
        async move {
            let response = self.client.post_empty::<CheckInResponse>(&path).await?;
            Ok(response.unwrap_or(CheckInResponse {
                ticket: None,
                message: None,
            }))
        }
    }

    fn lookup(&self, code: &str) -> impl Future<Output = Result<Ticket>> + Send {
        let path = format!("/public/bilhete/{}", urlencoding::encode(code));
        async move { Ok(self.client.get(&path).await?) }
    }
}
