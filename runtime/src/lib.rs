//! # Tasklist Runtime
//!
//! Runtime implementation for the Tasklist architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling, plus a durable file-backed
//! [`KeyValueStore`](tasklist_core::storage::KeyValueStore).
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects in order
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//! - **`FileKeyValueStore`**: One JSON file per storage slot
//!
//! ## Execution Model
//!
//! Everything is synchronous and single-threaded. `send` runs the reducer to
//! completion, so the new state is in place before any effect executes.
//! Effects then run in program order; actions they return are queued and
//! processed after the current action's effects finish.
//!
//! ## Example
//!
//! ```
//! use tasklist_core::{effect::Effect, reducer::Reducer, SmallVec};
//! use tasklist_runtime::Store;
//!
//! struct Adder;
//!
//! impl Reducer for Adder {
//!     type State = i64;
//!     type Action = i64;
//!     type Environment = ();
//!
//!     fn reduce(&self, state: &mut i64, action: i64, _env: &()) -> SmallVec<[Effect<i64>; 4]> {
//!         *state += action;
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut store = Store::new(0, Adder, ());
//! store.send(2)?;
//! store.send(3)?;
//! assert_eq!(store.state(|s| *s), 5);
//! # Ok::<(), tasklist_runtime::StoreError>(())
//! ```

use tasklist_core::{effect::Effect, reducer::Reducer};

/// Metric names and descriptions
pub mod metrics;

/// File-backed key-value storage
pub mod file_store;

pub use file_store::FileKeyValueStore;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Effects kept feeding actions back past the configured limit
        ///
        /// The state reflects every action processed before the limit was
        /// hit; remaining queued actions are dropped.
        #[error("Feedback limit exceeded: more than {0} actions chained from one send")]
        FeedbackLimitExceeded(usize),
    }
}

pub use error::StoreError;

/// Default number of actions one `send` may process, counting the action
/// sent plus every action fed back by its effects.
pub const DEFAULT_FEEDBACK_LIMIT: usize = 32;

/// Store module - The runtime for reducers
pub mod store {
    use super::{DEFAULT_FEEDBACK_LIMIT, Effect, Reducer, StoreError, metrics};
    use std::collections::VecDeque;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (owned exclusively; readers borrow it)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
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
        state: S,
        reducer: R,
        environment: E,
        feedback_limit: usize,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The feedback limit defaults to [`DEFAULT_FEEDBACK_LIMIT`].
        #[must_use]
        pub const fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self {
                state: initial_state,
                reducer,
                environment,
                feedback_limit: DEFAULT_FEEDBACK_LIMIT,
            }
        }

        /// Set how many actions a single `send` may process
        ///
        /// A limit of zero is treated as one: the sent action always runs.
        #[must_use]
        pub const fn with_feedback_limit(mut self, limit: usize) -> Self {
            self.feedback_limit = if limit == 0 { 1 } else { limit };
            self
        }

        /// Send an action to the store
        ///
        /// Runs the reducer, then executes the returned effects in order.
        /// Actions produced by effects are processed after the current
        /// action's effects have all run.
        ///
        /// # Returns
        ///
        /// A reference to the state after every queued action was processed.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::FeedbackLimitExceeded`] if effects keep
        /// producing actions beyond the configured limit.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&mut self, action: A) -> Result<&S, StoreError> {
            let mut queue = VecDeque::from([action]);
            let mut processed = 0usize;

            while let Some(action) = queue.pop_front() {
                if processed == self.feedback_limit {
                    tracing::warn!(
                        limit = self.feedback_limit,
                        dropped = queue.len() + 1,
                        "Feedback limit reached, dropping queued actions"
                    );
                    metrics::counter!(metrics::FEEDBACK_LIMIT_HIT).increment(1);
                    return Err(StoreError::FeedbackLimitExceeded(self.feedback_limit));
                }
                processed += 1;

                tracing::debug!("Processing action");
                metrics::counter!(metrics::ACTIONS_TOTAL).increment(1);

                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();

                    let start = std::time::Instant::now();
                    let effects = self.reducer.reduce(&mut self.state, action, &self.environment);
                    metrics::histogram!(metrics::REDUCER_DURATION)
                        .record(start.elapsed().as_secs_f64());

                    tracing::trace!("Reducer completed, returned {} effects", effects.len());
                    effects
                };

                for effect in effects {
                    Self::execute_effect(effect, &mut queue);
                }
            }

            Ok(&self.state)
        }

        fn execute_effect(effect: Effect<A>, queue: &mut VecDeque<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "none").increment(1);
                },
                Effect::Sequential(effects) => {
                    tracing::trace!("Executing Effect::Sequential with {} effects", effects.len());
                    metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "sequential")
                        .increment(1);
                    for effect in effects {
                        Self::execute_effect(effect, queue);
                    }
                },
                Effect::Run(work) => {
                    tracing::trace!("Executing Effect::Run");
                    metrics::counter!(metrics::EFFECTS_EXECUTED, "type" => "run").increment(1);
                    if let Some(action) = work() {
                        tracing::trace!("Effect::Run produced an action, queueing it");
                        queue.push_back(action);
                    }
                },
            }
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.state)
        }

        /// Borrow the current state
        #[must_use]
        pub const fn current(&self) -> &S {
            &self.state
        }

        /// Borrow the injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }

        /// Consume the store and return its state
        #[must_use]
        pub fn into_state(self) -> S {
            self.state
        }
    }
}

pub use store::Store;
