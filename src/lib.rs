//! Statecraft: a thread-safe finite state machine runtime.
//!
//! A caller declares a set of named [`State`]s, a set of named
//! [`Transition`]s between them, and callback hooks fired on state
//! entry/exit and on transition start/end, then drives the machine safely
//! from concurrent callers. Statecraft backs lifecycle modeling for
//! stateful domain objects (a device, a session, a protocol endpoint)
//! without each of them re-implementing locking, validation, or callback
//! ordering.
//!
//! # Core Concepts
//!
//! - **Machine**: owner of a fixed, validated state/transition graph and
//!   the single source of truth for "where are we now"; serializes all
//!   dispatch through one internal lock
//! - **State**: a named point in the graph with idempotent enter/exit
//!   callback sequences and an active flag
//! - **Transition**: a named, directed edge with its own enter/exit
//!   callback sequences; self-transitions skip state-level callbacks
//! - **Scope / Context**: the per-operation bundle handed to every
//!   callback, carrying an append-only key/value bag through the chain
//!
//! # Example
//!
//! ```rust
//! use statecraft::{Context, Machine, State, Transition};
//!
//! let machine = Machine::builder("session")
//!     .states([
//!         State::new("idle"),
//!         State::new("running").on_enter(|scope| {
//!             let job = scope.context.get_as::<String>("job").unwrap_or_default();
//!             Ok(scope.context.with("started", job))
//!         }),
//!     ])
//!     .transitions([
//!         Transition::new("start", "idle", "running"),
//!         Transition::new("stop", "running", "idle"),
//!     ])
//!     .initial("idle")
//!     .build()
//!     .unwrap();
//!
//! let out = machine
//!     .transition("start", Context::new().with("job", "resync"))
//!     .unwrap();
//!
//! assert_eq!(machine.current_state_name(), "running");
//! assert_eq!(out.get_as::<String>("started").as_deref(), Some("resync"));
//! ```

pub mod builder;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use self::builder::{BuildError, MachineBuilder};
pub use self::core::{
    Callback, CallbackError, CallbackResult, Context, MachineHistory, Scope, State, Transition,
    TransitionRecord,
};
pub use self::machine::{CallbackPhase, Machine, TransitionError};
