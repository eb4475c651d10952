//! Mock check-in endpoints.

use crate::error::{AdminError, Result};
use crate::providers::CheckInApi;
use arenaticket_client::types::{CheckInResponse, Ticket, TicketStatus};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// Ticket with fixed order, event and batch ids.
#[must_use]
pub fn sample_ticket(id: &str, code: &str, status: TicketStatus) -> Ticket {
    Ticket {
        id: id.to_string(),
        order_id: "pedido-1".to_string(),
        event_id: "evento-1".to_string(),
        batch_id: "lote-1".to_string(),
        code: code.to_string(),
        compact_code: None,
        qr_image: None,
        holder_name: Some("Maria Santos".to_string()),
        holder_phone: None,
        status,
        sold_at: Some("2025-05-20T10:00:00".to_string()),
        used_at: None,
    }
}

#[derive(Debug, Default)]
struct Script {
    tickets: HashMap<String, Ticket>,
    rejections: HashMap<String, String>,
    failures: HashMap<String, AdminError>,
    calls: Vec<String>,
}

/// Mock check-in API.
///
/// Known codes answer with their ticket, scripted codes answer with a
/// ticket-less rejection or an error, and anything else is a 404. Clones
/// share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct MockCheckInApi {
    script: Arc<Mutex<Script>>,
}

impl MockCheckInApi {
    /// Mock that knows no tickets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `ticket.code` with `ticket`.
    #[must_use]
    pub fn with_ticket(self, ticket: Ticket) -> Self {
        self.lock().tickets.insert(ticket.code.clone(), ticket);
        self
    }

    /// Answer `code` with no ticket and `message`.
    #[must_use]
    pub fn with_rejection(self, code: &str, message: &str) -> Self {
        self.lock()
            .rejections
            .insert(code.to_string(), message.to_string());
        self
    }

    /// Fail requests for `code` with `error`.
    #[must_use]
    pub fn with_failure(self, code: &str, error: AdminError) -> Self {
        self.lock().failures.insert(code.to_string(), error);
        self
    }

    /// Calls received so far, as `"validate:CODE"`, `"confirm:ID"` or
    /// `"lookup:CODE"`.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, call: String, code: &str) -> Result<CheckInResponse> {
        let mut script = self.lock();
        script.calls.push(call);

        if let Some(error) = script.failures.get(code) {
            return Err(error.clone());
        }
        if let Some(message) = script.rejections.get(code) {
            return Ok(CheckInResponse {
                ticket: None,
                message: Some(message.clone()),
            });
        }
        script
            .tickets
            .get(code)
            .cloned()
            .map(|ticket| CheckInResponse {
                ticket: Some(ticket),
                message: None,
            })
            .ok_or_else(not_found)
    }
}

fn not_found() -> AdminError {
    AdminError::RequestFailed {
        status: 404,
        message: "Bilhete não encontrado".to_string(),
    }
}

impl CheckInApi for MockCheckInApi {
    fn validate(
        &self,
        code: &str,
        _event_id: Option<&str>,
    ) -> impl Future<Output = Result<CheckInResponse>> + Send {
        let outcome = self.answer(format!("validate:{code}"), code);
        async move { outcome }
    }

    fn confirm(&self, ticket_id: &str) -> impl Future<Output = Result<CheckInResponse>> + Send {
        let outcome = {
            let mut script = self.lock();
            script.calls.push(format!("confirm:{ticket_id}"));
            script
                .tickets
                .values_mut()
                .find(|ticket| ticket.id == ticket_id)
                .map(|ticket| {
                    ticket.status = TicketStatus::Used;
                    CheckInResponse {
                        ticket: Some(ticket.clone()),
                        message: Some("Entrada confirmada".to_string()),
                    }
                })
                .ok_or_else(not_found)
        };
        async move { outcome }
    }

    fn lookup(&self, code: &str) -> impl Future<Output = Result<Ticket>> + Send {
        let outcome = {
            let mut script = self.lock();
            script.calls.push(format!("lookup:{code}"));
            script.tickets.get(code).cloned().ok_or_else(not_found)
        };
        async move { outcome }
    }
}
