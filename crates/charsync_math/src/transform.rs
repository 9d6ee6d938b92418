//! World-space location component.
//!
//! [`Transform3D`] is what the entity store holds for anything with a spatial
//! position. The prediction core reads it once, when a character is first
//! tracked, to seed its initial state and size its collider.

use charsync_component::Component;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Converts a millisecond span to seconds.
#[must_use]
pub fn ms_to_secs(ms: u64) -> f32 {
    ms as f32 / 1000.0
}

/// Position, rotation and scale in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    /// Unit quaternion.
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform3D {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Scale factor used for sizing colliders.
    ///
    /// Characters are expected to be scaled uniformly; for a non-uniform scale
    /// the largest axis wins so the collider never under-covers the mesh.
    #[must_use]
    pub fn uniform_scale(&self) -> f32 {
        self.scale.max_element()
    }

    /// Blend towards `other`: linear on position and scale, spherical on
    /// rotation. `t` is not clamped.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform3D {
    fn type_name() -> &'static str {
        "Transform3D"
    }
}
