//! Cross-thread hand-off of received states.
//!
//! When network events are decoded on a different thread from the one that
//! runs render ticks, the network side pushes into a [`StateInbox`] and the
//! tick side drains it into the session at the start of each tick. Each
//! entity's queue has one writer (the network thread) and one reader (the
//! tick thread).

use std::collections::VecDeque;
use std::sync::Arc;

use charsync_component::Entity;
use charsync_protocol::CharacterState;
use dashmap::DashMap;

/// A clonable mailbox of states keyed by entity. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct StateInbox {
    queues: Arc<DashMap<Entity, VecDeque<CharacterState>>>,
}

impl StateInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a state for `entity`. Never blocks for longer than a shard lock.
    pub fn push(&self, entity: Entity, state: CharacterState) {
        self.queues.entry(entity).or_default().push_back(state);
    }

    /// Take every queued state. Per-entity arrival order is preserved.
    #[must_use]
    pub fn drain(&self) -> Vec<(Entity, CharacterState)> {
        let mut drained = Vec::new();
        for mut entry in self.queues.iter_mut() {
            let entity = *entry.key();
            drained.extend(entry.value_mut().drain(..).map(|state| (entity, state)));
        }
        self.queues.retain(|_, queue| !queue.is_empty());
        drained
    }

    /// Number of states waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.iter().map(|entry| entry.value().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
