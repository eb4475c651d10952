//! In-person sales store.

use super::{lock, LoadingGuard, Tracked};
use crate::error::{AdminError, Result};
use arenaticket_client::types::{Batch, Event, Listing, SaleRequest, SaleResponse};
use arenaticket_client::ApiClient;
use arenaticket_core::environment::{Clock, SystemClock};
use std::sync::{Arc, Mutex};

const SALES_ORDERS: &str = "/vendas/pedidos";

/// Sales screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesSnapshot {
    /// A request is in flight
    pub loading: bool,
    /// Message of the last failure
    pub error: Option<String>,
    /// Answer of the last successful sale
    pub last_sale: Option<SaleResponse>,
    /// Sales made in this session
    pub sales_today: u32,
    /// Amount sold in this session, in kwanza
    pub total_today: f64,
}

impl Tracked for SalesSnapshot {
    fn loading_mut(&mut self) -> &mut bool {
        &mut self.loading
    }

    fn error_mut(&mut self) -> &mut Option<String> {
        &mut self.error
    }
}

/// Operator-facing message for a refused sale.
#[must_use]
pub fn sale_error_message(error: &AdminError) -> String {
    match error.status() {
        Some(400) => "Dados inválidos. Verifique o formulário.".to_string(),
        Some(401) => "Sessão expirada. Faça login novamente.".to_string(),
        Some(403) => "Você não tem permissão para realizar vendas.".to_string(),
        Some(404) => "Evento, lote ou vendedor não encontrado.".to_string(),
        Some(409) => "Bilhetes insuficientes ou lote fora do período de venda.".to_string(),
        _ => error.to_string(),
    }
}

/// Box-office sales: what can be sold now, and selling it.
#[derive(Clone)]
pub struct SalesStore {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<SalesSnapshot>>,
}

impl std::fmt::Debug for SalesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesStore")
            .field("api", &self.api)
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SalesStore {
    /// Store over `api` using the wall clock.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    /// Store over `api` checking sale windows against `clock`.
    #[must_use]
    pub fn with_clock(api: ApiClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            state: Arc::new(Mutex::new(SalesSnapshot::default())),
        }
    }

    /// Copy of the screen state.
    #[must_use]
    pub fn snapshot(&self) -> SalesSnapshot {
        lock(&self.state).clone()
    }

    /// Events open for sale. Empty on failure, with the message recorded.
    pub async fn available_events(&self) -> Vec<Event> {
        let guard = LoadingGuard::begin(&self.state);
        match self.api.get::<Listing<Event>>("/admin/eventos").await {
            Ok(listing) => {
                let (mut events, _) = listing.into_parts();
                events.retain(|e| e.open_for_sale);
                events
            },
            Err(e) => {
                let e = AdminError::from(e);
                tracing::warn!(error = %e, "Could not load events for sale");
                guard.fail(e.to_string());
                Vec::new()
            },
        }
    }

    /// Batches of `event_id` with stock and an open sale window. Empty on
    /// failure, with the message recorded.
    pub async fn available_batches(&self, event_id: &str) -> Vec<Batch> {
        let guard = LoadingGuard::begin(&self.state);
        let query = [("eventoId", Some(event_id.to_string()))];
        match self.api.get_query::<Listing<Batch>>("/admin/lotes", &query).await {
            Ok(listing) => {
                let now = self.clock.now();
                let (mut batches, _) = listing.into_parts();
                batches.retain(|b| b.is_on_sale(now));
                batches
            },
            Err(e) => {
                let e = AdminError::from(e);
                tracing::warn!(event_id, error = %e, "Could not load batches for sale");
                guard.fail(e.to_string());
                Vec::new()
            },
        }
    }

    /// Register an in-person sale and update the session totals.
    ///
    /// # Errors
    ///
    /// Returns the request error. Refusals with a known status carry the
    /// operator-facing message from [`sale_error_message`].
    pub async fn sell(&self, request: &SaleRequest) -> Result<SaleResponse> {
        let guard = LoadingGuard::begin(&self.state);
        match self.api.post::<_, SaleResponse>(SALES_ORDERS, request).await {
            Ok(response) => {
                tracing::info!(
                    order_id = %response.order_id,
                    tickets = response.tickets.len(),
                    total = response.total,
                    "Sale registered"
                );
                let mut state = lock(&self.state);
                state.sales_today += 1;
                state.total_today += response.total;
                state.last_sale = Some(response.clone());
                Ok(response)
            },
            Err(e) => {
                let e = AdminError::from(e);
                let message = sale_error_message(&e);
                tracing::warn!(error = %e, "Sale refused");
                guard.fail(message.clone());
                Err(match e {
                    AdminError::RequestFailed { status, .. } => AdminError::RequestFailed { status, message },
                    other => other,
                })
            },
        }
    }

    /// Forget the last sale and its error, ready for the next one.
    pub fn clear_last_sale(&self) {
        let mut state = lock(&self.state);
        state.last_sale = None;
        state.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_get_friendly_messages() {
        let refused = |status| AdminError::RequestFailed {
            status,
            message: "raw".into(),
        };
        assert_eq!(
            sale_error_message(&refused(409)),
            "Bilhetes insuficientes ou lote fora do período de venda."
        );
        assert_eq!(sale_error_message(&refused(500)), "raw");
        assert_eq!(
            sale_error_message(&AdminError::Transport("reset".into())),
            "Falha de ligação ao servidor: reset"
        );
    }
}
