//! Operation-time errors returned by machine dispatch.
//!
//! Every variant is recoverable: the caller decides whether to retry or
//! abort, and unless noted on [`crate::Machine::transition`] no state
//! change has occurred. The machine never retries on its own.

use crate::core::CallbackError;
use std::fmt;
use thiserror::Error;

/// Phase of the four-phase callback sequence in which a failure occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackPhase {
    TransitionEnter,
    SourceExit,
    DestinationEnter,
    TransitionExit,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            Self::TransitionEnter => "transition-enter",
            Self::SourceExit => "source-exit",
            Self::DestinationEnter => "destination-enter",
            Self::TransitionExit => "transition-exit",
        };
        f.write_str(phase)
    }
}

/// Errors returned by [`crate::Machine`] dispatch and introspection.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("transition '{name}' not known")]
    UnknownTransition { name: String },

    #[error("state '{name}' not known")]
    UnknownState { name: String },

    #[error("transition '{name}' not valid for current state '{current}'")]
    NotValidForState { name: String, current: String },

    #[error("current state '{current}' is not active")]
    InactiveState { current: String },

    #[error("no transition permits a change from '{from}' to '{to}'")]
    ChangeNotPermitted { from: String, to: String },

    #[error(
        "multiple transitions permit a change from '{from}' to '{to}', \
         dispatch by transition name instead"
    )]
    AmbiguousChange { from: String, to: String },

    #[error("transition '{name}' is declared for multiple source states")]
    AmbiguousTransition { name: String },

    #[error("callback failed during {phase} of transition '{name}': {source}")]
    Callback {
        name: String,
        phase: CallbackPhase,
        #[source]
        source: CallbackError,
    },
}
