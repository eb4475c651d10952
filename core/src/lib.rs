//! # ArenaTicket Core
//!
//! Reducer and effect abstractions for the ArenaTicket admin client.
//!
//! Client-side workflows with real state-machine semantics (door check-in)
//! are written as reducers: a pure function that updates state in place and
//! returns descriptions of the side effects to run. The runtime crate
//! executes those effects and feeds the resulting actions back in.
//!
//! ## Core Concepts
//!
//! - **State**: What the screen shows (current ticket, history, error)
//! - **Action**: Operator intents and server outcomes
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits (API, clock)
//!
//! ## Example
//!
//! ```ignore
//! use arenaticket_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CheckInReducer {
//!     type State = CheckInState;
//!     type Action = CheckInAction;
//!     type Environment = CheckInEnvironment<ApiClient>;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CheckInState,
//!         action: CheckInAction,
//!         env: &Self::Environment,
//!     ) -> SmallVec<[Effect<CheckInAction>; 4]> {
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

/// State transitions.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Turns one action into a state change plus the work that follows it.
    ///
    /// Implementations stay synchronous and free of I/O so a test can drive
    /// them action by action.
    pub trait Reducer {
        /// Screen state owned by the store
        type State;

        /// Operator intents and server outcomes
        type Action;

        /// Services the effects call into
        type Environment;

        /// Apply `action` to `state`.
        ///
        /// Requests to the API are returned as [`Effect::Future`] values and
        /// run by the store afterwards.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Deferred work returned by reducers.
pub mod effect {
    use futures::future::BoxFuture;

    /// Work the store runs once the reducer returns.
    ///
    /// A finished [`Effect::Future`] may yield an `Action`, which the store
    /// sends back through the reducer.
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Start all at once, finish when all are done
        Parallel(Vec<Effect<Action>>),

        /// One after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Async work with an optional follow-up action
        Future(BoxFuture<'static, Option<Action>>),
    }

    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// [`Effect::Parallel`] over `effects`
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// [`Effect::Sequential`] over `effects`
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation whose output is fed back as an action
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: std::future::Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }

        /// Returns `true` for [`Effect::None`]
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Injected services shared by reducers and stores.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Source of the current instant.
    ///
    /// Batch sale windows are checked against it and receipts are stamped
    /// with it.
    pub trait Clock: Send + Sync {
        /// Current instant in UTC
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
