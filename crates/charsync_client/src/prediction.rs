//! Prediction and reconciliation for the locally controlled character.
//!
//! The engine keeps two states: `predicted`, the best current local estimate,
//! and `authoritative`, the last state confirmed by the server. Inputs step
//! `predicted` immediately and wait in an [`InputQueue`] until the server
//! acknowledges them. When an authoritative state arrives, acknowledged
//! inputs are dropped and the rest are replayed on top of it: "rewind and
//! replay".

use charsync_component::Entity;
use charsync_protocol::{CharacterMoveInput, CharacterState};
use tracing::trace;

use crate::collaborators::CharacterMover;
use crate::input_queue::InputQueue;

/// Outcome of one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    /// Prediction before the authoritative state arrived.
    pub previous_predicted: CharacterState,
    /// Prediction after replay.
    pub predicted: CharacterState,
    /// Inputs dropped as acknowledged.
    pub discarded: usize,
    /// Inputs replayed on top of the authoritative state.
    pub replayed: usize,
}

impl Reconciliation {
    /// How far the prediction moved.
    #[must_use]
    pub fn divergence(&self) -> f32 {
        self.previous_predicted
            .position
            .distance(self.predicted.position)
    }
}

/// Owns the local character's predicted/authoritative pair and its pending
/// inputs.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    predicted: CharacterState,
    authoritative: CharacterState,
    pending: InputQueue,
}

impl PredictionEngine {
    /// Start predicting from `seed`, which also serves as the first
    /// authoritative state.
    #[must_use]
    pub fn new(seed: CharacterState, max_pending_inputs: usize) -> Self {
        Self {
            predicted: seed,
            authoritative: seed,
            pending: InputQueue::new(max_pending_inputs),
        }
    }

    #[must_use]
    pub fn predicted(&self) -> &CharacterState {
        &self.predicted
    }

    #[must_use]
    pub fn authoritative(&self) -> &CharacterState {
        &self.authoritative
    }

    #[must_use]
    pub fn pending(&self) -> &InputQueue {
        &self.pending
    }

    /// Queue `input` and step the prediction by it. Returns the new
    /// prediction.
    pub fn apply_input<M>(
        &mut self,
        entity: Entity,
        input: CharacterMoveInput,
        mover: &M,
    ) -> CharacterState
    where
        M: CharacterMover + ?Sized,
    {
        self.pending.push(input);
        self.predicted = mover.step(&self.predicted, &input, entity);
        self.predicted
    }

    /// Adopt `state` as authoritative and replay every input it does not
    /// reflect.
    pub fn reconcile<M>(
        &mut self,
        entity: Entity,
        state: CharacterState,
        mover: &M,
    ) -> Reconciliation
    where
        M: CharacterMover + ?Sized,
    {
        trace!(
            %entity,
            sequence = state.sequence,
            pending = self.pending.len(),
            "received authoritative state"
        );

        self.authoritative = state;
        let discarded = self.pending.acknowledge(state.sequence);

        let mut replayed = 0;
        let mut predicted = state;
        for input in self.pending.iter() {
            predicted = mover.step(&predicted, input, entity);
            replayed += 1;
        }

        trace!(%entity, pending = self.pending.len(), "replayed pending inputs");

        let previous_predicted = std::mem::replace(&mut self.predicted, predicted);
        Reconciliation {
            previous_predicted,
            predicted,
            discarded,
            replayed,
        }
    }
}
