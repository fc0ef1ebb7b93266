//! The machine: owner of a fixed state/transition graph and the single
//! source of truth for "where are we now".
//!
//! A machine is built once, via [`crate::MachineBuilder`], from a validated
//! list of states and transitions plus an initial state; the graph is
//! immutable afterwards. All dispatch is serialized through one internal
//! lock held for the full callback sequence, so callback sequences from
//! concurrent callers never interleave. Callbacks run synchronously on the
//! calling thread while the lock is held; they are expected to be fast,
//! non-blocking, in-process logic.

mod error;

pub use error::{CallbackPhase, TransitionError};

use crate::builder::MachineBuilder;
use crate::core::{Context, MachineHistory, Scope, State, Transition, TransitionRecord};
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;

pub(crate) type StateId = usize;
pub(crate) type TransitionId = usize;

/// A transition's resolved (source, destination) indices, parallel to the
/// machine's transition list.
#[derive(Clone, Copy)]
pub(crate) struct Edge {
    pub(crate) source: StateId,
    pub(crate) destination: StateId,
}

/// The mutable half of a machine: everything behind the lock.
struct Occupancy {
    current: StateId,
    history: MachineHistory,
}

/// Owner of the full state set, the full transition set, and the single
/// current-state pointer.
///
/// # Example
///
/// ```rust
/// use statecraft::{Context, Machine, State, Transition};
///
/// let machine = Machine::builder("door")
///     .states([State::new("open"), State::new("closed")])
///     .transitions([
///         Transition::new("close", "open", "closed"),
///         Transition::new("open", "closed", "open"),
///     ])
///     .initial("open")
///     .build()
///     .unwrap();
///
/// machine.transition("close", Context::new()).unwrap();
/// assert_eq!(machine.current_state_name(), "closed");
/// ```
pub struct Machine {
    name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    edges: Vec<Edge>,
    state_ids: HashMap<String, StateId>,
    transition_ids: HashMap<String, Vec<TransitionId>>,
    inner: Mutex<Occupancy>,
}

impl Machine {
    /// Start declaring a machine. The name is used for diagnostics only.
    pub fn builder(name: impl Into<String>) -> MachineBuilder {
        MachineBuilder::new(name)
    }

    /// Assemble a machine from builder-validated parts and force-activate
    /// the initial state without firing its enter callbacks.
    pub(crate) fn from_parts(
        name: String,
        states: Vec<State>,
        transitions: Vec<Transition>,
        edges: Vec<Edge>,
        state_ids: HashMap<String, StateId>,
        transition_ids: HashMap<String, Vec<TransitionId>>,
        initial: StateId,
    ) -> Self {
        states[initial].force_active();
        Self {
            name,
            states,
            transitions,
            edges,
            state_ids,
            transition_ids,
            inner: Mutex::new(Occupancy {
                current: initial,
                history: MachineHistory::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state the machine currently occupies.
    pub fn current_state(&self) -> &State {
        let id = self.inner.lock().current;
        &self.states[id]
    }

    /// Name of the state the machine currently occupies.
    pub fn current_state_name(&self) -> &str {
        self.current_state().name()
    }

    /// Look up a state by name.
    pub fn get_state(&self, name: &str) -> Result<&State, TransitionError> {
        self.state_ids
            .get(name)
            .map(|id| &self.states[*id])
            .ok_or_else(|| TransitionError::UnknownState {
                name: name.to_owned(),
            })
    }

    /// Look up a transition by name.
    ///
    /// Fails with [`TransitionError::AmbiguousTransition`] when the name is
    /// declared for more than one source state; iterate [`Self::transitions`]
    /// to pick a specific edge.
    pub fn get_transition(&self, name: &str) -> Result<&Transition, TransitionError> {
        let ids = self
            .transition_ids
            .get(name)
            .ok_or_else(|| TransitionError::UnknownTransition {
                name: name.to_owned(),
            })?;

        match ids.as_slice() {
            [id] => Ok(&self.transitions[*id]),
            _ => Err(TransitionError::AmbiguousTransition {
                name: name.to_owned(),
            }),
        }
    }

    /// All declared states, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// All transitions, declared ones first, implied self-transitions after.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Snapshot of the log of fully successful operations.
    pub fn history(&self) -> MachineHistory {
        self.inner.lock().history.clone()
    }

    /// Execute the transition with the given name from the current state.
    ///
    /// Resolves the unique transition carrying `name` whose source is the
    /// current state, then fires the callback sequence [transition-enter,
    /// source-exit, destination-enter, transition-exit], threading `context`
    /// through every callback. Self-transitions skip the two state phases.
    ///
    /// On any error the machine is still positioned at an active state:
    /// failures before the destination-enter phase leave it untouched, a
    /// destination-enter failure rolls the pointer back to the source and
    /// re-occupies it without firing enter callbacks, and a transition-exit
    /// failure is reported from the already-committed destination.
    pub fn transition(&self, name: &str, context: Context) -> Result<Context, TransitionError> {
        let mut inner = self.inner.lock();
        let current = inner.current;

        let candidates =
            self.transition_ids
                .get(name)
                .ok_or_else(|| TransitionError::UnknownTransition {
                    name: name.to_owned(),
                })?;

        let id = candidates
            .iter()
            .copied()
            .find(|id| self.edges[*id].source == current)
            .ok_or_else(|| TransitionError::NotValidForState {
                name: name.to_owned(),
                current: self.states[current].name().to_owned(),
            })?;

        self.fire(&mut inner, id, context)
    }

    /// Execute the single transition leading from the current state to the
    /// named destination.
    ///
    /// Fails when the destination is unknown, when no transition connects
    /// the current state to it, or when more than one does (in which case
    /// name-based dispatch disambiguates). Otherwise behaves exactly like
    /// [`Self::transition`].
    pub fn change_state(&self, state: &str, context: Context) -> Result<Context, TransitionError> {
        let mut inner = self.inner.lock();
        let current = inner.current;

        let target = *self
            .state_ids
            .get(state)
            .ok_or_else(|| TransitionError::UnknownState {
                name: state.to_owned(),
            })?;

        let mut candidates = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.source == current && edge.destination == target)
            .map(|(id, _)| id);

        let id = match (candidates.next(), candidates.next()) {
            (Some(id), None) => id,
            (Some(_), Some(_)) => {
                return Err(TransitionError::AmbiguousChange {
                    from: self.states[current].name().to_owned(),
                    to: state.to_owned(),
                })
            }
            (None, _) => {
                return Err(TransitionError::ChangeNotPermitted {
                    from: self.states[current].name().to_owned(),
                    to: state.to_owned(),
                })
            }
        };

        self.fire(&mut inner, id, context)
    }

    /// Run the four-phase callback sequence for a resolved transition.
    ///
    /// Caller holds the lock and has already matched the transition's
    /// source against the current state.
    fn fire(
        &self,
        inner: &mut Occupancy,
        id: TransitionId,
        context: Context,
    ) -> Result<Context, TransitionError> {
        let transition = &self.transitions[id];
        let edge = self.edges[id];
        let source = &self.states[edge.source];
        let destination = &self.states[edge.destination];

        if !source.is_active() {
            return Err(TransitionError::InactiveState {
                current: source.name().to_owned(),
            });
        }

        let scope = |context: Context| Scope {
            transition: transition.name().to_owned(),
            source: source.name().to_owned(),
            destination: destination.name().to_owned(),
            context,
        };

        let fail = |phase: CallbackPhase, source_err| TransitionError::Callback {
            name: transition.name().to_owned(),
            phase,
            source: source_err,
        };

        let context = transition
            .run_enter(&scope, context)
            .map_err(|e| fail(CallbackPhase::TransitionEnter, e))?;

        let context = if edge.source != edge.destination {
            let context = source
                .exit(&scope, context)
                .map_err(|e| fail(CallbackPhase::SourceExit, e))?;

            match destination.enter(&scope, context) {
                Ok(context) => {
                    inner.current = edge.destination;
                    context
                }
                Err(e) => {
                    // the source's exit callbacks have already run and cannot
                    // be unrun; re-occupy it so the machine stays at an
                    // active state, beginning a new activation cycle
                    source.force_active();
                    return Err(fail(CallbackPhase::DestinationEnter, e));
                }
            }
        } else {
            context
        };

        let context = transition
            .run_exit(&scope, context)
            .map_err(|e| fail(CallbackPhase::TransitionExit, e))?;

        inner.history.record(TransitionRecord {
            transition: transition.name().to_owned(),
            from: source.name().to_owned(),
            to: destination.name().to_owned(),
            timestamp: Utc::now(),
        });

        Ok(context)
    }
}
