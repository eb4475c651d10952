//! # ArenaTicket Runtime
//!
//! The [`Store`] owns a reducer's state, runs the reducer for every action
//! and executes the returned effects. Actions produced by effects are fed
//! back into the same store.
//!
//! The execution model mirrors the admin client's needs: every request is an
//! independent suspended operation, nothing is queued, cancelled or timed
//! out, and the last write to state wins.

use arenaticket_core::effect::Effect;
use arenaticket_core::reducer::Reducer;
use futures::future::{join_all, BoxFuture};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::watch;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Waiting on it resolves once every effect
/// spawned for the action has finished, including the reductions of the
/// actions those effects fed back (and their own effects).
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(CheckInAction::Submit { code, event_id: None });
/// handle.wait().await;
/// // The validation request has completed and its outcome was reduced.
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };
        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracker is gone, so nothing can still be running.
                break;
            }
        }
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending())
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context shared by every effect of one `send()`
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// The counter is released even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

struct Inner<S, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
}

/// The Store - runtime coordinator for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// The reducer runs synchronously under the state write lock; effects
    /// run on spawned tasks. Must be called from within a Tokio runtime.
    ///
    /// `send()` returns after starting effect execution, not completion.
    /// Use the returned [`EffectHandle`] to wait.
    pub fn send(&self, action: A) -> EffectHandle {
        let (handle, tracking) = EffectHandle::new();
        self.dispatch(action, &tracking);
        handle
    }

    /// Read state via a closure
    pub fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Access the injected environment
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.inner.environment
    }

    fn dispatch(&self, action: A, tracking: &EffectTracking) {
        let effects = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            self.inner
                .reducer
                .reduce(&mut state, action, &self.inner.environment)
        };

        for effect in effects {
            if effect.is_none() {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                continue;
            }

            tracking.increment();
            let guard = DecrementGuard(tracking.clone());
            let store = self.clone();
            let tracking = tracking.clone();

            tokio::spawn(async move {
                let _guard = guard;
                store.run(effect, tracking).await;
            });
        }
    }

    /// Execute an effect to completion
    fn run(&self, effect: Effect<A>, tracking: EffectTracking) -> BoxFuture<'static, ()> {
        let store = self.clone();

        Box::pin(async move {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action, sending to store");
                        store.dispatch(action, &tracking);
                    } else {
                        tracing::trace!("Effect::Future completed with no action");
                    }
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    join_all(
                        effects
                            .into_iter()
                            .map(|effect| store.run(effect, tracking.clone())),
                    )
                    .await;
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    for effect in effects {
                        store.run(effect, tracking.clone()).await;
                    }
                },
            }
        })
    }
}
