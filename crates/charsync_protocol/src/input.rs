//! Local movement commands.

use charsync_math::Vec3;
use serde::{Deserialize, Serialize};

/// One movement command from the local player.
///
/// Sequence numbers are assigned by the producer and strictly increase within
/// a session. An authoritative state carrying sequence `n` reflects every
/// input up to and including `n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterMoveInput {
    pub sequence: u64,
    pub timestamp_ms: u64,
    /// Simulated time this command covers.
    pub delta_ms: u32,
    /// Requested movement direction in character space.
    pub movement: Vec3,
    /// Aim delta around the vertical axis, radians.
    pub yaw: f32,
    /// Aim delta around the lateral axis, radians.
    pub pitch: f32,
    pub jump: bool,
    pub running: bool,
}

impl CharacterMoveInput {
    /// A command with no movement, aim or buttons.
    #[must_use]
    pub fn idle(sequence: u64, timestamp_ms: u64, delta_ms: u32) -> Self {
        Self {
            sequence,
            timestamp_ms,
            delta_ms,
            movement: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            jump: false,
            running: false,
        }
    }

    #[must_use]
    pub fn with_movement(mut self, movement: Vec3) -> Self {
        self.movement = movement;
        self
    }

    #[must_use]
    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    #[must_use]
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}
