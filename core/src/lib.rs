//! # Tasklist Core
//!
//! Core traits and types for the Tasklist reducer architecture.
//!
//! This crate provides the fundamental abstractions the todo domain is built
//! on: a pure reducer that turns actions into state changes, and effect
//! descriptions that the runtime executes afterwards.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state owned by a store
//! - **Action**: All possible inputs to a reducer (commands and events)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies, such as a [`storage::KeyValueStore`]
//!
//! ## Example
//!
//! ```
//! use tasklist_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! #[derive(Clone, Debug, Default)]
//! struct CounterState {
//!     count: i64,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum CounterAction {
//!     Increment,
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<CounterAction>; 4]> {
//!         match action {
//!             CounterAction::Increment => state.count += 1,
//!         }
//!         SmallVec::new()
//!     }
//! }
//!
//! let mut state = CounterState::default();
//! let effects = CounterReducer.reduce(&mut state, CounterAction::Increment, &());
//! assert_eq!(state.count, 1);
//! assert!(effects.is_empty());
//! ```

pub use smallvec::{smallvec, SmallVec};

pub mod storage;

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// The state change is complete when this returns; effects run
        /// afterwards and observe the new state.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values, not execution.
pub mod effect {
    /// A deferred synchronous computation that may feed an action back
    pub type Work<Action> = Box<dyn FnOnce() -> Option<Action>>;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed by the reducer. They are returned from
    /// reducers and executed by the Store in program order, after the state
    /// transition is visible.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects one after another, in order
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary synchronous computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Run(Work<Action>),
    }

    // Manual Debug implementation since closures don't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Run(_) => write!(f, "Effect::Run(<closure>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Wrap a closure as an effect
        #[must_use]
        pub fn run<F>(work: F) -> Self
        where
            F: FnOnce() -> Option<Action> + 'static,
        {
            Effect::Run(Box::new(work))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether executing this effect does nothing at all
        #[must_use]
        pub fn is_noop(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_noop),
                Effect::Run(_) => false,
            }
        }
    }
}
