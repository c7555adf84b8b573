//! State Machine Runtime
//!
//! Flat state machines for card interaction states. A machine is a table of
//! `(from, event) -> to` transitions; events with no matching transition
//! leave the machine where it is.

use rustc_hash::FxHashMap;

/// Identifier for a state within a state machine
pub type StateId = u32;

/// Identifier for an event type
pub type EventId = u32;

/// Interaction states of a single swipeable card
pub mod card_states {
    use super::StateId;

    /// At rest, accepting drags
    pub const IDLE: StateId = 0;
    /// Following the pointer
    pub const DRAGGING: StateId = 1;
    /// Animating back to neutral after a release below threshold
    pub const SNAPPING_BACK: StateId = 2;
    /// Animating off screen after a commit
    pub const SWIPING_OUT: StateId = 3;
}

/// Events understood by the card interaction machine
pub mod card_events {
    use super::EventId;

    pub const DRAG: EventId = 1;
    pub const RELEASE_CANCEL: EventId = 2;
    pub const RELEASE_COMMIT: EventId = 3;
    /// The running animation reached its end
    pub const SETTLED: EventId = 4;
    pub const RESET: EventId = 5;
}

/// A transition in the state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from_state: StateId,
    pub event: EventId,
    pub to_state: StateId,
}

impl Transition {
    pub fn new(from: StateId, event: EventId, to: StateId) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// Builder for creating state machines
pub struct StateMachineBuilder {
    initial_state: StateId,
    transitions: Vec<Transition>,
}

impl StateMachineBuilder {
    pub fn new(initial_state: StateId) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
        }
    }

    /// Add a simple transition (from, event, to)
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition::new(from, event, to));
        self
    }

    /// Add the same transition from several source states
    pub fn on_any(mut self, from: &[StateId], event: EventId, to: StateId) -> Self {
        self.transitions
            .extend(from.iter().map(|&state| Transition::new(state, event, to)));
        self
    }

    /// Build the state machine
    pub fn build(self) -> StateMachine {
        let mut table: FxHashMap<(StateId, EventId), StateId> = FxHashMap::default();
        for t in &self.transitions {
            // First registration wins, like a linear scan would
            table.entry((t.from_state, t.event)).or_insert(t.to_state);
        }
        StateMachine {
            current_state: self.initial_state,
            table,
        }
    }
}

/// A state machine instance
#[derive(Clone, Debug)]
pub struct StateMachine {
    current_state: StateId,
    table: FxHashMap<(StateId, EventId), StateId>,
}

impl StateMachine {
    /// Create a new state machine with an initial state and transitions
    pub fn new(initial_state: StateId, transitions: Vec<Transition>) -> Self {
        transitions
            .into_iter()
            .fold(StateMachineBuilder::new(initial_state), |b, t| {
                b.on(t.from_state, t.event, t.to_state)
            })
            .build()
    }

    /// Create a builder for a state machine
    pub fn builder(initial_state: StateId) -> StateMachineBuilder {
        StateMachineBuilder::new(initial_state)
    }

    /// The machine that drives one swipeable card.
    ///
    /// Drags are only accepted at rest or while already dragging; once an
    /// animation state is entered, only another animation or `SETTLED`
    /// moves it on.
    pub fn card_interaction() -> Self {
        use card_events::*;
        use card_states::*;

        const ALL: [StateId; 4] = [IDLE, DRAGGING, SNAPPING_BACK, SWIPING_OUT];

        StateMachine::builder(IDLE)
            .on(IDLE, DRAG, DRAGGING)
            .on(DRAGGING, DRAG, DRAGGING)
            .on_any(&[IDLE, DRAGGING], RELEASE_CANCEL, SNAPPING_BACK)
            .on_any(&ALL, RELEASE_COMMIT, SWIPING_OUT)
            .on_any(&[SNAPPING_BACK, SWIPING_OUT], SETTLED, IDLE)
            .on_any(&ALL, RESET, IDLE)
            .build()
    }

    /// Get the current state
    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state == state
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: EventId) -> bool {
        self.table.contains_key(&(self.current_state, event))
    }

    /// Send an event, returning the (possibly unchanged) current state
    pub fn send(&mut self, event: EventId) -> StateId {
        let from = self.current_state;
        let Some(&to) = self.table.get(&(from, event)) else {
            return from;
        };
        if from != to {
            tracing::trace!("fsm: {} --{}--> {}", from, event, to);
        }
        self.current_state = to;
        to
    }
}
