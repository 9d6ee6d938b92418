//! The authoritative side of the simulation.
//!
//! The authority owns the true state of every character. It steps the local
//! player's character with the inputs that survive the uplink, drives a bot
//! that the client only ever observes, and now and then shoves the player in
//! a way the client cannot predict.

use std::collections::HashMap;

use charsync_client::CharacterMover;
use charsync_component::Entity;
use charsync_math::Vec3;
use charsync_protocol::{CharacterMoveInput, CharacterState};
use tracing::{debug, trace};

use crate::mover::KinematicMover;

/// Authority tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerConfig {
    /// Shove player characters every n-th tick. Zero never shoves.
    pub knockback_every: u64,
    pub knockback: Vec3,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            knockback_every: 120,
            knockback: Vec3::new(0.5, 0.0, -0.5),
        }
    }
}

/// True state of every character.
#[derive(Debug)]
pub struct AuthorityServer {
    config: ServerConfig,
    mover: KinematicMover,
    characters: HashMap<Entity, CharacterState>,
    bots: HashMap<Entity, u64>,
    ticks: u64,
}

impl AuthorityServer {
    #[must_use]
    pub fn new(config: ServerConfig, mover: KinematicMover) -> Self {
        Self {
            config,
            mover,
            characters: HashMap::new(),
            bots: HashMap::new(),
            ticks: 0,
        }
    }

    pub fn spawn(&mut self, entity: Entity, state: CharacterState) {
        self.characters.insert(entity, state);
    }

    /// Spawn a character driven by the authority itself.
    pub fn spawn_bot(&mut self, entity: Entity, state: CharacterState) {
        self.spawn(entity, state);
        self.bots.insert(entity, 0);
    }

    #[must_use]
    pub fn state(&self, entity: Entity) -> Option<&CharacterState> {
        self.characters.get(&entity)
    }

    /// Step `entity` by a client input. Inputs for unknown entities and
    /// inputs older than the last applied one are ignored.
    pub fn apply_input(
        &mut self,
        entity: Entity,
        input: &CharacterMoveInput,
    ) -> Option<CharacterState> {
        let current = self.characters.get_mut(&entity)?;
        if input.sequence <= current.sequence {
            trace!(%entity, sequence = input.sequence, "late input ignored");
            return None;
        }
        *current = self.mover.step(current, input, entity);
        Some(*current)
    }

    /// Advance authority-only behaviour by one tick of `delta_ms`: bots
    /// walk in a circle, players are shoved periodically.
    pub fn tick(&mut self, now_ms: u64, delta_ms: u32) {
        self.ticks += 1;

        for (entity, sequence) in &mut self.bots {
            let Some(current) = self.characters.get_mut(entity) else {
                continue;
            };
            *sequence += 1;
            let input = CharacterMoveInput::idle(*sequence, now_ms, delta_ms)
                .with_movement(Vec3::Z)
                .with_yaw(0.05);
            *current = self.mover.step(current, &input, *entity);
        }

        if self.config.knockback_every > 0 && self.ticks % self.config.knockback_every == 0 {
            for (entity, state) in &mut self.characters {
                if self.bots.contains_key(entity) {
                    continue;
                }
                state.position += self.config.knockback;
                debug!(%entity, tick = self.ticks, "authority knockback");
            }
        }
    }

    /// Every character's current state, for broadcast.
    pub fn snapshot(&self) -> impl Iterator<Item = (Entity, CharacterState)> + '_ {
        self.characters.iter().map(|(entity, state)| (*entity, *state))
    }
}
