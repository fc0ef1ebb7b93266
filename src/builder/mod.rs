//! Builder for constructing machines.
//!
//! [`MachineBuilder`] is the only way to obtain a [`Machine`]: every
//! consistency rule is checked here, once, so a machine that exists is a
//! machine whose graph is valid.

mod error;
mod macros;

pub use error::BuildError;

use crate::core::{State, Transition};
use crate::machine::{Edge, Machine, StateId, TransitionId};
use std::collections::HashMap;

/// Builder for constructing machines with a fluent API.
///
/// Created via [`Machine::builder`].
pub struct MachineBuilder {
    name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    initial: Option<String>,
    imply_self_transitions: bool,
}

impl MachineBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            imply_self_transitions: false,
        }
    }

    /// Declare a state.
    pub fn state(mut self, state: State) -> Self {
        self.states.push(state);
        self
    }

    /// Declare multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State>) -> Self {
        self.states.extend(states);
        self
    }

    /// Declare a transition.
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Declare multiple transitions at once.
    pub fn transitions(mut self, transitions: impl IntoIterator<Item = Transition>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Set the initial state (required). It is force-activated at build
    /// time without firing its enter callbacks: the machine starts already
    /// there.
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Auto-generate one callback-free self-transition per declared state,
    /// named `transition_<state>_<state>`, so that changing to the already
    /// current state succeeds instead of erroring.
    ///
    /// Construction fails if a declared transition already carries one of
    /// the generated (name, source) identities.
    pub fn imply_self_transitions(mut self, imply: bool) -> Self {
        self.imply_self_transitions = imply;
        self
    }

    /// Validate the declaration and build the machine.
    pub fn build(self) -> Result<Machine, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }
        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let mut state_ids: HashMap<String, StateId> = HashMap::with_capacity(self.states.len());
        for (id, state) in self.states.iter().enumerate() {
            if state_ids.insert(state.name().to_owned(), id).is_some() {
                return Err(BuildError::DuplicateState {
                    name: state.name().to_owned(),
                });
            }
        }

        let initial_name = self.initial.ok_or(BuildError::MissingInitialState)?;
        let initial = *state_ids
            .get(&initial_name)
            .ok_or(BuildError::UnknownInitialState { name: initial_name })?;

        let mut transitions = self.transitions;

        if self.imply_self_transitions {
            for state in &self.states {
                let name = format!("transition_{0}_{0}", state.name());
                let collides = transitions
                    .iter()
                    .any(|t| t.name() == name && t.source() == state.name());
                if collides {
                    return Err(BuildError::SelfTransitionCollision {
                        name,
                        source_state: state.name().to_owned(),
                    });
                }
                transitions.push(Transition::new(name, state.name(), state.name()));
            }
        }

        let mut edges = Vec::with_capacity(transitions.len());
        let mut transition_ids: HashMap<String, Vec<TransitionId>> = HashMap::new();

        for (id, transition) in transitions.iter().enumerate() {
            let source =
                *state_ids
                    .get(transition.source())
                    .ok_or_else(|| BuildError::UnknownState {
                        transition: transition.name().to_owned(),
                        state: transition.source().to_owned(),
                    })?;
            let destination =
                *state_ids
                    .get(transition.destination())
                    .ok_or_else(|| BuildError::UnknownState {
                        transition: transition.name().to_owned(),
                        state: transition.destination().to_owned(),
                    })?;

            let ids = transition_ids
                .entry(transition.name().to_owned())
                .or_default();
            if ids
                .iter()
                .any(|other| transitions[*other].source() == transition.source())
            {
                return Err(BuildError::DuplicateTransition {
                    name: transition.name().to_owned(),
                    source_state: transition.source().to_owned(),
                });
            }
            ids.push(id);
            edges.push(Edge {
                source,
                destination,
            });
        }

        Ok(Machine::from_parts(
            self.name,
            self.states,
            transitions,
            edges,
            state_ids,
            transition_ids,
            initial,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Context;
    use crate::machine::TransitionError;

    fn ring_builder() -> MachineBuilder {
        Machine::builder("ring")
            .states([
                State::new("state_a"),
                State::new("state_b"),
                State::new("state_c"),
            ])
            .transitions([
                Transition::new("transition_a_b", "state_a", "state_b"),
                Transition::new("transition_b_c", "state_b", "state_c"),
                Transition::new("transition_c_a", "state_c", "state_a"),
            ])
            .initial("state_a")
    }

    #[test]
    fn builder_requires_states() {
        let result = Machine::builder("empty")
            .transition(Transition::new("transition_a_b", "state_a", "state_b"))
            .initial("state_a")
            .build();

        assert!(matches!(result, Err(BuildError::NoStates)));
    }

    #[test]
    fn builder_requires_transitions() {
        let result = Machine::builder("isolated")
            .state(State::new("state_a"))
            .initial("state_a")
            .build();

        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn builder_requires_an_initial_state() {
        let result = Machine::builder("adrift")
            .states([State::new("state_a"), State::new("state_b")])
            .transition(Transition::new("transition_a_b", "state_a", "state_b"))
            .build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn initial_state_must_be_declared() {
        let result = Machine::builder("adrift")
            .states([State::new("state_a"), State::new("state_b")])
            .transition(Transition::new("transition_a_b", "state_a", "state_b"))
            .initial("state_z")
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnknownInitialState { name }) if name == "state_z"
        ));
    }

    #[test]
    fn state_names_must_be_unique() {
        let result = Machine::builder("twins")
            .states([State::new("state_a"), State::new("state_a")])
            .transition(Transition::new("refresh", "state_a", "state_a"))
            .initial("state_a")
            .build();

        assert!(matches!(
            result,
            Err(BuildError::DuplicateState { name }) if name == "state_a"
        ));
    }

    #[test]
    fn transitions_must_reference_declared_states() {
        // destination outside the declared set
        let result = Machine::builder("dangling")
            .states([State::new("state_a"), State::new("state_b")])
            .transition(Transition::new("transition_a_z", "state_a", "state_z"))
            .initial("state_a")
            .build();

        assert!(matches!(
            result,
            Err(BuildError::UnknownState { transition, state })
                if transition == "transition_a_z" && state == "state_z"
        ));

        // source outside the declared set
        let result = Machine::builder("dangling")
            .states([State::new("state_a"), State::new("state_b")])
            .transition(Transition::new("transition_z_a", "state_z", "state_a"))
            .initial("state_a")
            .build();

        assert!(matches!(result, Err(BuildError::UnknownState { .. })));
    }

    #[test]
    fn name_and_source_pairs_must_be_unique() {
        let result = Machine::builder("echo")
            .states([State::new("state_a"), State::new("state_b")])
            .transitions([
                Transition::new("transition_a_b", "state_a", "state_b"),
                Transition::new("transition_a_b", "state_a", "state_b"),
            ])
            .initial("state_a")
            .build();

        assert!(matches!(
            result,
            Err(BuildError::DuplicateTransition { name, source_state })
                if name == "transition_a_b" && source_state == "state_a"
        ));
    }

    #[test]
    fn a_name_may_be_reused_across_sources() {
        let result = Machine::builder("cycle")
            .states([
                State::new("state_a"),
                State::new("state_b"),
                State::new("state_c"),
            ])
            .transitions([
                Transition::new("cycle", "state_a", "state_b"),
                Transition::new("cycle", "state_b", "state_c"),
            ])
            .initial("state_a")
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn build_activates_the_initial_state_silently() {
        let machine = ring_builder().build().unwrap();

        assert_eq!(machine.current_state_name(), "state_a");
        assert!(machine.get_state("state_a").unwrap().is_active());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn implied_self_transitions_are_generated_per_state() {
        let machine = ring_builder().imply_self_transitions(true).build().unwrap();

        assert_eq!(machine.transitions().count(), 6);
        for name in ["state_a", "state_b", "state_c"] {
            let implied = machine
                .get_transition(&format!("transition_{name}_{name}"))
                .unwrap();
            assert_eq!(implied.source(), name);
            assert!(implied.is_self_transition());
        }
    }

    #[test]
    fn implied_self_transition_collision_fails_the_build() {
        let result = ring_builder()
            .transition(Transition::new(
                "transition_state_a_state_a",
                "state_a",
                "state_a",
            ))
            .imply_self_transitions(true)
            .build();

        assert!(matches!(
            result,
            Err(BuildError::SelfTransitionCollision { source_state, .. }) if source_state == "state_a"
        ));
    }

    #[test]
    fn changing_to_the_current_state_needs_the_imply_flag() {
        let strict = ring_builder().build().unwrap();
        let err = strict.change_state("state_a", Context::new()).unwrap_err();
        assert!(matches!(err, TransitionError::ChangeNotPermitted { .. }));

        let lenient = ring_builder().imply_self_transitions(true).build().unwrap();
        for _ in 0..3 {
            lenient.change_state("state_a", Context::new()).unwrap();
            assert_eq!(lenient.current_state_name(), "state_a");
        }
        assert!(lenient.get_state("state_a").unwrap().is_active());
    }
}
