//! Named, directed edges between states.

use crate::core::context::{run_chain, Callback, CallbackResult, Context, Scope};
use std::fmt;
use std::sync::Arc;

/// A directed edge with an explicit source and destination state, plus its
/// own enter/exit callback lists.
///
/// Transitions are declared by state name; the machine resolves the names
/// and rejects any transition referencing a state outside its declared set.
/// A transition's name need not be unique machine-wide, but at most one
/// transition may carry a given (name, source) pair.
///
/// Unlike a state, a transition has no idempotence bookkeeping: its enter
/// and exit phases both fire on every dispatch in which it runs.
pub struct Transition {
    name: String,
    source: String,
    destination: String,
    enter_callbacks: Vec<Callback>,
    exit_callbacks: Vec<Callback>,
}

impl Transition {
    /// Declare a transition with no callbacks.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            destination: destination.into(),
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

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whether this transition starts and ends at the same state.
    ///
    /// Self-transitions skip the state enter/exit phases when dispatched;
    /// only the transition's own callbacks fire.
    pub fn is_self_transition(&self) -> bool {
        self.source == self.destination
    }

    /// Fire the transition-enter callbacks.
    pub(crate) fn run_enter<F>(&self, scope: &F, context: Context) -> CallbackResult
    where
        F: Fn(Context) -> Scope,
    {
        run_chain(&self.enter_callbacks, scope, context)
    }

    /// Fire the transition-exit callbacks.
    pub(crate) fn run_exit<F>(&self, scope: &F, context: Context) -> CallbackResult
    where
        F: Fn(Context) -> Scope,
    {
        run_chain(&self.exit_callbacks, scope, context)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("enter_callbacks", &self.enter_callbacks.len())
            .field("exit_callbacks", &self.exit_callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn scope(context: Context) -> Scope {
        Scope {
            transition: "transition_a_b".to_owned(),
            source: "state_a".to_owned(),
            destination: "state_b".to_owned(),
            context,
        }
    }

    #[test]
    fn accessors_reflect_declaration() {
        let transition = Transition::new("transition_a_b", "state_a", "state_b");

        assert_eq!(transition.name(), "transition_a_b");
        assert_eq!(transition.source(), "state_a");
        assert_eq!(transition.destination(), "state_b");
        assert!(!transition.is_self_transition());

        let refresh = Transition::new("refresh", "state_a", "state_a");
        assert!(refresh.is_self_transition());
    }

    #[test]
    fn enter_and_exit_fire_every_time() {
        let enter_count = Arc::new(AtomicUsize::new(0));
        let exit_count = Arc::new(AtomicUsize::new(0));
        let enter = Arc::clone(&enter_count);
        let exit = Arc::clone(&exit_count);

        let transition = Transition::new("transition_a_b", "state_a", "state_b")
            .on_enter(move |scope| {
                enter.fetch_add(1, Ordering::SeqCst);
                Ok(scope.context)
            })
            .on_exit(move |scope| {
                exit.fetch_add(1, Ordering::SeqCst);
                Ok(scope.context)
            });

        for _ in 0..3 {
            transition.run_enter(&scope, Context::new()).unwrap();
            transition.run_exit(&scope, Context::new()).unwrap();
        }

        assert_eq!(enter_count.load(Ordering::SeqCst), 3);
        assert_eq!(exit_count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn callbacks_thread_context_in_declaration_order() {
        let transition = Transition::new("transition_a_b", "state_a", "state_b")
            .on_enter(|scope| Ok(scope.context.with("data", 1)))
            .on_enter(|scope| {
                let data = scope.context.get_as::<i64>("data").unwrap();
                Ok(scope.context.with("data", data + 1))
            });

        let out = transition.run_enter(&scope, Context::new()).unwrap();
        assert_eq!(out.get_as::<i64>("data"), Some(2));
    }

    #[test]
    fn failed_enter_callback_aborts_the_chain() {
        let ran_after = Arc::new(AtomicUsize::new(0));
        let ran = Arc::clone(&ran_after);

        let transition = Transition::new("transition_a_b", "state_a", "state_b")
            .on_enter(|_scope| Err("boom".into()))
            .on_enter(move |scope| {
                ran.fetch_add(1, Ordering::SeqCst);
                Ok(scope.context)
            });

        assert!(transition.run_enter(&scope, Context::new()).is_err());
        assert_eq!(ran_after.load(Ordering::SeqCst), 0);
    }
}
