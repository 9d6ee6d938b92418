//! Character state snapshots.
//!
//! A [`CharacterState`] is an immutable snapshot of everything the mover needs
//! to continue simulating a character. The server sends them as authoritative
//! updates; the client produces them by stepping inputs; the remote sampler
//! blends between them.

use charsync_math::{Quat, Transform3D, Vec3, ms_to_secs};
use serde::{Deserialize, Serialize};

/// How the character is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walking,
    Falling,
    Swimming,
    Climbing,
    /// Free flight without collision.
    Ghosting,
}

/// Snapshot of a character at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// Sequence number of the last input reflected in this state. Zero for
    /// characters without an input stream.
    pub sequence: u64,
    /// Simulation time in milliseconds.
    pub timestamp_ms: u64,
    pub position: Vec3,
    pub rotation: Quat,
    /// World units per second.
    pub velocity: Vec3,
    /// Seconds spent airborne in the current fall.
    pub fall_timer: f32,
    /// Seconds until another jump is allowed.
    pub jump_timer: f32,
    pub mode: MovementMode,
    pub grounded: bool,
}

impl CharacterState {
    /// A resting state at the given location: zero velocity, sequence 0,
    /// walking, not grounded.
    #[must_use]
    pub fn initial(location: &Transform3D, timestamp_ms: u64) -> Self {
        Self {
            sequence: 0,
            timestamp_ms,
            position: location.position,
            rotation: location.rotation,
            velocity: Vec3::ZERO,
            fall_timer: 0.0,
            jump_timer: 0.0,
            mode: MovementMode::Walking,
            grounded: false,
        }
    }

    /// Position and rotation as a transform with unit scale.
    #[must_use]
    pub fn pose(&self) -> Transform3D {
        Transform3D::from_position_rotation(self.position, self.rotation)
    }

    /// Blend between `previous` and `next` at `render_time_ms`.
    ///
    /// Position and velocity are interpolated linearly and rotation
    /// spherically. Discrete fields (mode, grounded, timers, sequence) come
    /// from `previous`. The caller guarantees
    /// `previous.timestamp_ms <= render_time_ms < next.timestamp_ms`.
    #[must_use]
    pub fn interpolate(previous: &Self, next: &Self, render_time_ms: u64) -> Self {
        let span = next.timestamp_ms.saturating_sub(previous.timestamp_ms);
        let t = if span == 0 {
            0.0
        } else {
            render_time_ms.saturating_sub(previous.timestamp_ms) as f32 / span as f32
        };
        let pose = previous.pose().lerp(&next.pose(), t);
        Self {
            timestamp_ms: render_time_ms,
            position: pose.position,
            rotation: pose.rotation,
            velocity: previous.velocity.lerp(next.velocity, t),
            ..*previous
        }
    }

    /// Project `previous` forward to `render_time_ms` along its velocity.
    #[must_use]
    pub fn extrapolate(previous: &Self, render_time_ms: u64) -> Self {
        let elapsed = ms_to_secs(render_time_ms.saturating_sub(previous.timestamp_ms));
        Self {
            timestamp_ms: render_time_ms,
            position: previous.position + previous.velocity * elapsed,
            ..*previous
        }
    }
}
