//! Core building blocks of the runtime.
//!
//! This module holds the data + callback holders the machine is assembled
//! from: the callback contract ([`Scope`], [`Context`]), named [`State`]s
//! with idempotent enter/exit sequences, named directed [`Transition`]s,
//! and the [`MachineHistory`] log. None of these understand legality on
//! their own; the machine is the sole arbiter of which transitions may run.

mod context;
mod history;
mod state;
mod transition;

pub use context::{Callback, CallbackError, CallbackResult, Context, Scope};
pub use history::{MachineHistory, TransitionRecord};
pub use state::State;
pub use transition::Transition;
