//! Door check-in facade over the reducer store.

use super::actions::CheckInAction;
use super::environment::{classify, CheckInEnvironment};
use super::reducer::CheckInReducer;
use super::state::{CheckInPhase, CheckInState};
use crate::error::Result;
use crate::providers::CheckInApi;
use arenaticket_client::types::{CheckInResponse, Ticket};
use arenaticket_runtime::Store;
use std::sync::Arc;

type CheckInStore<A> = Store<CheckInState, CheckInAction, CheckInEnvironment<A>, CheckInReducer<A>>;

/// Door check-in workflow.
///
/// `submit` never fails: every outcome lands in [`CheckInPhase`]. The
/// secondary actions (`confirm`, `consult`) return their errors.
pub struct CheckInWorkflow<A: CheckInApi + 'static> {
    store: CheckInStore<A>,
    api: Arc<A>,
}

impl<A: CheckInApi + 'static> Clone for CheckInWorkflow<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: CheckInApi + 'static> CheckInWorkflow<A> {
    /// Workflow over `api` with an empty history.
    #[must_use]
    pub fn new(api: A) -> Self {
        let api = Arc::new(api);
        let store = Store::new(
            CheckInState::default(),
            CheckInReducer::new(),
            CheckInEnvironment::shared(Arc::clone(&api)),
        );
        Self { store, api }
    }

    /// Validate `code` and wait for the outcome.
    ///
    /// Returns the resulting phase: `Valid` with the server's ticket, or
    /// `Failed` with a `ValidationRejected`, `NotFound` or transport error.
    pub async fn submit(&self, code: &str, event_id: Option<&str>) -> CheckInPhase {
        let mut handle = self.store.send(CheckInAction::Submit {
            code: code.trim().to_string(),
            event_id: event_id.map(str::to_string),
        });
        handle.wait().await;
        self.phase()
    }

    /// Confirm a previously validated ticket.
    ///
    /// Any 2xx answer is a success. When it carries the ticket, the matching
    /// history entry is refreshed; an answer with only a message, or no body,
    /// leaves state alone.
    ///
    /// # Errors
    ///
    /// Returns the classified error (`NotFound`, `ValidationRejected`, ...)
    /// when the server refuses or cannot be reached.
    pub async fn confirm(&self, ticket_id: &str) -> Result<CheckInResponse> {
        let response = self.api.confirm(ticket_id).await.map_err(classify)?;
        if let Some(ticket) = &response.ticket {
            self.store.send(CheckInAction::Confirmed {
                ticket: ticket.clone(),
            });
        }
        Ok(response)
    }

    /// Read a ticket without checking it in. State and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::NotFound` when no ticket matches.
    pub async fn consult(&self, code: &str) -> Result<Ticket> {
        self.api.lookup(code.trim()).await.map_err(classify)
    }

    /// Reset the validation slot; history is kept.
    pub fn clear(&self) {
        self.store.send(CheckInAction::Clear);
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> CheckInPhase {
        self.store.state(|s| s.phase.clone())
    }

    /// Recent validations, most recent first.
    #[must_use]
    pub fn history(&self) -> Vec<Ticket> {
        self.store.state(|s| s.history.iter().cloned().collect())
    }

    /// A validation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.store.state(CheckInState::is_loading)
    }
}
