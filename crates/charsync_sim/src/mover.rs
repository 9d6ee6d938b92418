//! Deterministic kinematic character movement.
//!
//! The same [`KinematicMover`] runs on the authority and in the client's
//! prediction, so replaying an input on top of an authoritative state yields
//! exactly what the authority computed.

use charsync_client::CharacterMover;
use charsync_component::Entity;
use charsync_math::{Quat, Vec3, ms_to_secs};
use charsync_protocol::{CharacterMoveInput, CharacterState, MovementMode};

/// Height of the flat floor every character stands on.
pub const GROUND_HEIGHT: f32 = 0.0;

/// Walk/run on a flat floor with gravity and a jump cooldown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicMover {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    /// Seconds between jumps.
    pub jump_cooldown: f32,
}

impl Default for KinematicMover {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 7.0,
            jump_speed: 5.0,
            gravity: 9.81,
            jump_cooldown: 0.4,
        }
    }
}

impl KinematicMover {
    fn ghost_step(
        &self,
        previous: &CharacterState,
        input: &CharacterMoveInput,
        dt: f32,
    ) -> CharacterState {
        let rotation = turn(previous.rotation, input.yaw);
        let velocity = rotation * input.movement.clamp_length_max(1.0) * self.speed(input);
        CharacterState {
            sequence: input.sequence,
            timestamp_ms: previous.timestamp_ms + u64::from(input.delta_ms),
            position: previous.position + velocity * dt,
            rotation,
            velocity,
            ..*previous
        }
    }

    fn speed(&self, input: &CharacterMoveInput) -> f32 {
        if input.running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }
}

fn turn(rotation: Quat, yaw: f32) -> Quat {
    (Quat::from_rotation_y(yaw) * rotation).normalize()
}

impl CharacterMover for KinematicMover {
    fn step(
        &self,
        previous: &CharacterState,
        input: &CharacterMoveInput,
        _entity: Entity,
    ) -> CharacterState {
        let dt = ms_to_secs(u64::from(input.delta_ms));
        if previous.mode == MovementMode::Ghosting {
            return self.ghost_step(previous, input, dt);
        }

        let rotation = turn(previous.rotation, input.yaw);
        let planar = Vec3::new(input.movement.x, 0.0, input.movement.z).clamp_length_max(1.0);
        let wish = rotation * planar * self.speed(input);

        let mut velocity = Vec3::new(wish.x, previous.velocity.y, wish.z);
        let mut jump_timer = (previous.jump_timer - dt).max(0.0);
        let mut grounded = previous.grounded;
        if grounded && input.jump && jump_timer <= 0.0 {
            velocity.y = self.jump_speed;
            jump_timer = self.jump_cooldown;
            grounded = false;
        }
        if !grounded {
            velocity.y -= self.gravity * dt;
        }

        let mut position = previous.position + velocity * dt;
        let mut fall_timer = previous.fall_timer;
        if position.y <= GROUND_HEIGHT {
            position.y = GROUND_HEIGHT;
            velocity.y = 0.0;
            grounded = true;
            fall_timer = 0.0;
        } else {
            grounded = false;
            fall_timer += dt;
        }

        CharacterState {
            sequence: input.sequence,
            timestamp_ms: previous.timestamp_ms + u64::from(input.delta_ms),
            position,
            rotation,
            velocity,
            fall_timer,
            jump_timer,
            mode: if grounded {
                MovementMode::Walking
            } else {
                MovementMode::Falling
            },
            grounded,
        }
    }
}
