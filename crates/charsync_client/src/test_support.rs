//! Test doubles for the collaborator traits.

use std::collections::{HashMap, HashSet};

use charsync_component::Entity;
use charsync_math::{Transform3D, Vec3, ms_to_secs};
use charsync_protocol::{CharacterMoveInput, CharacterMovement, CharacterState, CollisionGroup};

use crate::collaborators::{
    CapsuleShape, CharacterMover, CharacterWorld, ColliderBackend, ColliderHandle,
};

/// Moves at `input.movement` units per second for `input.delta_ms`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LinearMover;

impl CharacterMover for LinearMover {
    fn step(
        &self,
        previous: &CharacterState,
        input: &CharacterMoveInput,
        _entity: Entity,
    ) -> CharacterState {
        let dt = ms_to_secs(u64::from(input.delta_ms));
        CharacterState {
            sequence: input.sequence,
            timestamp_ms: previous.timestamp_ms + u64::from(input.delta_ms),
            position: previous.position + input.movement * dt,
            velocity: input.movement,
            grounded: true,
            ..*previous
        }
    }
}

pub(crate) fn input(sequence: u64, movement: Vec3) -> CharacterMoveInput {
    CharacterMoveInput::idle(sequence, sequence * 100, 100).with_movement(movement)
}

pub(crate) fn state_at(sequence: u64, timestamp_ms: u64, position: Vec3) -> CharacterState {
    CharacterState {
        sequence,
        position,
        ..CharacterState::initial(&Transform3D::IDENTITY, timestamp_ms)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingWorld {
    pub locations: HashMap<Entity, Transform3D>,
    pub movements: HashMap<Entity, CharacterMovement>,
    pub applied: Vec<(Entity, CharacterState)>,
}

impl RecordingWorld {
    pub fn spawn_character(&mut self, entity: Entity, position: Vec3) {
        self.locations
            .insert(entity, Transform3D::from_position(position));
        self.movements.insert(entity, CharacterMovement::default());
    }

    pub fn last_applied(&self, entity: Entity) -> Option<CharacterState> {
        self.applied
            .iter()
            .rev()
            .find(|(e, _)| *e == entity)
            .map(|(_, s)| *s)
    }

    pub fn applied_count(&self, entity: Entity) -> usize {
        self.applied.iter().filter(|(e, _)| *e == entity).count()
    }
}

impl CharacterWorld for RecordingWorld {
    fn location(&self, entity: Entity) -> Option<Transform3D> {
        self.locations.get(&entity).copied()
    }

    fn movement(&self, entity: Entity) -> Option<CharacterMovement> {
        self.movements.get(&entity).copied()
    }

    fn apply_state(&mut self, entity: Entity, state: &CharacterState) {
        self.applied.push((entity, *state));
    }
}

#[derive(Debug, Default)]
pub(crate) struct CountingColliders {
    next: u64,
    pub live: HashSet<ColliderHandle>,
    pub removed: Vec<ColliderHandle>,
    refuse: bool,
}

impl CountingColliders {
    /// A backend whose physics world refuses every collider.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }
}

impl ColliderBackend for CountingColliders {
    fn create_collider(
        &mut self,
        _entity: Entity,
        _position: Vec3,
        _shape: CapsuleShape,
        _group: CollisionGroup,
        _collides_with: u16,
    ) -> Option<ColliderHandle> {
        if self.refuse {
            return None;
        }
        self.next += 1;
        let handle = ColliderHandle(self.next);
        self.live.insert(handle);
        Some(handle)
    }

    fn remove_collider(&mut self, handle: ColliderHandle) {
        self.live.remove(&handle);
        self.removed.push(handle);
    }
}
