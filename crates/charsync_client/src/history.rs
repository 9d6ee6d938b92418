//! Per-character ring of observed states.

use std::collections::VecDeque;

use charsync_protocol::CharacterState;

/// Fixed-capacity, insertion-ordered history of a remote character's states.
///
/// When full, pushing evicts the oldest sample. Iteration always follows
/// insertion order, even if timestamps arrived out of order.
#[derive(Debug, Clone)]
pub struct StateHistory {
    states: VecDeque<CharacterState>,
    capacity: usize,
}

impl StateHistory {
    /// An empty history. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            states: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A history holding a single seed state.
    #[must_use]
    pub fn seeded(capacity: usize, initial: CharacterState) -> Self {
        let mut history = Self::new(capacity);
        history.push(initial);
        history
    }

    /// Append a state, returning the evicted oldest one if the ring was full.
    pub fn push(&mut self, state: CharacterState) -> Option<CharacterState> {
        let evicted = if self.states.len() >= self.capacity {
            self.states.pop_front()
        } else {
            None
        };
        self.states.push_back(state);
        evicted
    }

    /// `true` if `state` is older than the most recently pushed sample.
    #[must_use]
    pub fn is_stale(&self, state: &CharacterState) -> bool {
        self.latest()
            .is_some_and(|latest| state.timestamp_ms < latest.timestamp_ms)
    }

    /// Most recently pushed state.
    #[must_use]
    pub fn latest(&self) -> Option<&CharacterState> {
        self.states.back()
    }

    /// States in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterState> {
        self.states.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
