//! Unacknowledged local inputs.

use std::collections::VecDeque;

use charsync_protocol::CharacterMoveInput;
use tracing::warn;

/// Arrival-ordered queue of inputs the server has not yet acknowledged.
#[derive(Debug, Clone)]
pub struct InputQueue {
    inputs: VecDeque<CharacterMoveInput>,
    max_len: usize,
}

impl InputQueue {
    /// An empty queue holding at most `max_len` inputs (at least one).
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            inputs: VecDeque::new(),
            max_len: max_len.max(1),
        }
    }

    /// Append an input. If the bound is exceeded the oldest input is dropped
    /// and returned; it can no longer be replayed.
    pub fn push(&mut self, input: CharacterMoveInput) -> Option<CharacterMoveInput> {
        self.inputs.push_back(input);
        if self.inputs.len() > self.max_len {
            let dropped = self.inputs.pop_front();
            if let Some(dropped) = &dropped {
                warn!(
                    sequence = dropped.sequence,
                    bound = self.max_len,
                    "pending input bound exceeded, dropping oldest input"
                );
            }
            dropped
        } else {
            None
        }
    }

    /// Discard every input with `sequence <= acknowledged`. Returns how many
    /// were discarded.
    pub fn acknowledge(&mut self, acknowledged: u64) -> usize {
        let before = self.inputs.len();
        self.inputs.retain(|input| input.sequence > acknowledged);
        before - self.inputs.len()
    }

    /// Pending inputs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterMoveInput> {
        self.inputs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
