//! Construction errors.
//!
//! All of these are fatal to building the machine: on failure no machine
//! value exists, so a half-configured graph can never be driven.

use thiserror::Error;

/// Errors that can occur when building a machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no states declared, add at least one state")]
    NoStates,

    #[error("no transitions declared, add at least one transition")]
    NoTransitions,

    #[error("initial state not specified, call .initial(name) before .build()")]
    MissingInitialState,

    #[error("initial state '{name}' is not in the declared state set")]
    UnknownInitialState { name: String },

    #[error("state '{name}' is declared more than once")]
    DuplicateState { name: String },

    #[error("transition '{transition}' references undeclared state '{state}'")]
    UnknownState { transition: String, state: String },

    #[error("transition '{name}' is declared more than once for source state '{source_state}'")]
    DuplicateTransition { name: String, source_state: String },

    #[error(
        "implied self-transition '{name}' for state '{source_state}' collides with a declared transition"
    )]
    SelfTransitionCollision { name: String, source_state: String },
}
