//! Named states with idempotent enter/exit callback sequences.
//!
//! A state tracks whether it is currently "active" (entered but not yet
//! exited). Entering an active state or exiting an inactive one is a
//! success no-op with zero callback invocations, so for any sequence of
//! enter/exit calls the paired callback sets fire exactly once per genuine
//! activation cycle.

use crate::core::context::{run_chain, Callback, CallbackResult, Context, Scope};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A named point in a machine's graph.
///
/// States are declared up front, handed to the builder by value, and owned
/// by the machine for its whole life. The `active` flag is only ever
/// mutated while the owning machine's lock is held; it is atomic so
/// introspection handles stay readable outside the lock.
///
/// # Example
///
/// ```rust
/// use statecraft::State;
///
/// let state = State::new("charging")
///     .on_enter(|scope| Ok(scope.context.with("entered", true)));
///
/// assert_eq!(state.name(), "charging");
/// assert!(!state.is_active());
/// ```
pub struct State {
    name: String,
    active: AtomicBool,
    enter_callbacks: Vec<Callback>,
    exit_callbacks: Vec<Callback>,
}

impl State {
    /// Declare a state with no callbacks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: AtomicBool::new(false),
            enter_callbacks: Vec::new(),
            exit_callbacks: Vec::new(),
        }
    }

    /// Append an enter callback; callbacks fire in declaration order.
    pub fn on_enter<F>(mut self, callback: F) -> Self
    where
        F: Fn(Scope) -> CallbackResult + Send + Sync + 'static,
    {
        self.enter_callbacks.push(Arc::new(callback));
        self
    }

    /// Append an exit callback; callbacks fire in declaration order.
    pub fn on_exit<F>(mut self, callback: F) -> Self
    where
        F: Fn(Scope) -> CallbackResult + Send + Sync + 'static,
    {
        self.exit_callbacks.push(Arc::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the state is currently entered but not yet exited.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Mark the state active without firing enter callbacks.
    ///
    /// Used for a machine's initial state and for re-occupying the source
    /// after a failed destination entry.
    pub(crate) fn force_active(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Run the enter sequence.
    ///
    /// No-op when already active. Marks the state active only once every
    /// enter callback has succeeded; a failure leaves it inactive.
    pub(crate) fn enter<F>(&self, scope: &F, context: Context) -> CallbackResult
    where
        F: Fn(Context) -> Scope,
    {
        if self.is_active() {
            return Ok(context);
        }

        let context = run_chain(&self.enter_callbacks, scope, context)?;
        self.active.store(true, Ordering::Release);
        Ok(context)
    }

    /// Run the exit sequence.
    ///
    /// No-op when not active. Marks the state inactive only once every exit
    /// callback has succeeded; a failure leaves it active, truthfully
    /// reflecting that the state is still occupied.
    pub(crate) fn exit<F>(&self, scope: &F, context: Context) -> CallbackResult
    where
        F: Fn(Context) -> Scope,
    {
        if !self.is_active() {
            return Ok(context);
        }

        let context = run_chain(&self.exit_callbacks, scope, context)?;
        self.active.store(false, Ordering::Release);
        Ok(context)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("active", &self.is_active())
            .field("enter_callbacks", &self.enter_callbacks.len())
            .field("exit_callbacks", &self.exit_callbacks.len())
            .finish()
    }
}
