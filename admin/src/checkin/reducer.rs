//! Check-in reducer.

use super::actions::CheckInAction;
use super::environment::{classify, resolve, CheckInEnvironment};
use super::state::{CheckInPhase, CheckInState};
use crate::providers::CheckInApi;
use arenaticket_core::effect::Effect;
use arenaticket_core::reducer::Reducer;
use arenaticket_core::{smallvec, SmallVec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Door check-in state machine.
///
/// ```text
/// Idle / Valid / Failed --Submit--> Validating --Validated--> Valid
///                                              --Rejected---> Failed
/// any --Clear--> Idle            (history untouched)
/// any --Confirmed--> same phase  (history entry replaced by id)
/// ```
///
/// The reducer holds no queue: a second `Submit` while validating simply
/// starts another request and the last outcome wins.
pub struct CheckInReducer<A> {
    _api: PhantomData<fn() -> A>,
}

impl<A> CheckInReducer<A> {
    /// Create a reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _api: PhantomData }
    }
}

impl<A> Default for CheckInReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for CheckInReducer<A> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for CheckInReducer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CheckInReducer")
    }
}

impl<A> Reducer for CheckInReducer<A>
where
    A: CheckInApi + 'static,
{
    type State = CheckInState;
    type Action = CheckInAction;
    type Environment = CheckInEnvironment<A>;

    fn reduce(
        &self,
        state: &mut CheckInState,
        action: CheckInAction,
        env: &CheckInEnvironment<A>,
    ) -> SmallVec<[Effect<CheckInAction>; 4]> {
        match action {
            CheckInAction::Submit { code, event_id } => {
                tracing::debug!(%code, ?event_id, "Validating ticket");
                state.phase = CheckInPhase::Validating { code: code.clone() };

                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    let outcome = api
                        .validate(&code, event_id.as_deref())
                        .await
                        .map_err(classify)
                        .and_then(resolve);
                    Some(match outcome {
                        Ok(ticket) => CheckInAction::Validated { ticket },
                        Err(error) => CheckInAction::Rejected { error },
                    })
                })]
            },

            CheckInAction::Validated { ticket } => {
                tracing::info!(code = %ticket.code, status = %ticket.status, "Ticket validated");
                state.history.push(ticket.clone());
                state.phase = CheckInPhase::Valid(ticket);
                smallvec![Effect::None]
            },

            CheckInAction::Rejected { error } => {
                tracing::warn!(error = %error, "Ticket not validated");
                state.phase = CheckInPhase::Failed(error);
                smallvec![Effect::None]
            },

            CheckInAction::Confirmed { ticket } => {
                if let CheckInPhase::Valid(current) = &mut state.phase {
                    if current.id == ticket.id {
                        *current = ticket.clone();
                    }
                }
                if !state.history.replace(ticket) {
                    tracing::debug!("Confirmed ticket is not in the history");
                }
                smallvec![Effect::None]
            },

            CheckInAction::Clear => {
                state.phase = CheckInPhase::Idle;
                smallvec![Effect::None]
            },
        }
    }
}
