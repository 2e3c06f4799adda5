//! State Machine
//!
//! A flat transition table keyed by caller-defined state and event types.
//! Unknown `(state, event)` pairs are ignored rather than treated as errors,
//! so callers can send events freely and check the result.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Bound shared by state and event types
pub trait Key: Copy + Eq + Hash + Debug + 'static {}

impl<T: Copy + Eq + Hash + Debug + 'static> Key for T {}

/// Builder for creating state machines
pub struct StateMachineBuilder<S: Key, E: Key> {
    initial_state: S,
    table: FxHashMap<(S, E), S>,
}

impl<S: Key, E: Key> StateMachineBuilder<S, E> {
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            table: FxHashMap::default(),
        }
    }

    /// Add an edge; a later edge for the same `(from, event)` replaces it
    pub fn on(mut self, from: S, event: E, to: S) -> Self {
        self.table.insert((from, event), to);
        self
    }

    /// Add the same event edge from several source states
    pub fn on_any(mut self, from: &[S], event: E, to: S) -> Self {
        for &state in from {
            self.table.insert((state, event), to);
        }
        self
    }

    pub fn build(self) -> StateMachine<S, E> {
        StateMachine {
            current_state: self.initial_state,
            table: self.table,
            history: Vec::new(),
        }
    }
}

/// A state machine instance
pub struct StateMachine<S: Key, E: Key> {
    current_state: S,
    table: FxHashMap<(S, E), S>,
    /// Fired transitions, oldest first
    history: Vec<(S, E, S)>,
}

impl<S: Key, E: Key> StateMachine<S, E> {
    pub fn builder(initial_state: S) -> StateMachineBuilder<S, E> {
        StateMachineBuilder::new(initial_state)
    }

    pub fn current_state(&self) -> S {
        self.current_state
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current_state == state
    }

    pub fn history(&self) -> &[(S, E, S)] {
        &self.history
    }

    pub fn can_send(&self, event: E) -> bool {
        self.table.contains_key(&(self.current_state, event))
    }

    /// Send an event, returning the target state if a transition fired
    pub fn send(&mut self, event: E) -> Option<S> {
        let from = self.current_state;
        let to = *self.table.get(&(from, event))?;
        self.current_state = to;
        self.history.push((from, event, to));
        Some(to)
    }
}
