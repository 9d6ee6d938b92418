//! Entity-store components the prediction core reacts to.
//!
//! A character is tracked while it has both a [`CharacterMovement`] and a
//! [`Transform3D`](charsync_math::Transform3D). Gaining [`LocalPlayer`] turns
//! it into the locally predicted character.

use charsync_component::Component;
use serde::{Deserialize, Serialize};

/// A collision group bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionGroup(pub u16);

impl CollisionGroup {
    pub const DEFAULT: Self = Self(1 << 0);
    pub const STATIC: Self = Self(1 << 1);
    pub const CHARACTER: Self = Self(1 << 2);
    pub const SENSOR: Self = Self(1 << 3);

    /// Combine groups into a mask.
    #[must_use]
    pub fn mask(groups: &[CollisionGroup]) -> u16 {
        groups.iter().fold(0, |mask, group| mask | group.0)
    }
}

/// Marks an entity as a physically moving character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterMovement {
    /// Total capsule height, unscaled.
    pub height: f32,
    /// Capsule radius, unscaled.
    pub radius: f32,
    pub collision_group: CollisionGroup,
    /// Mask of groups this character collides with.
    pub collides_with: u16,
}

impl Default for CharacterMovement {
    fn default() -> Self {
        Self {
            height: 1.6,
            radius: 0.3,
            collision_group: CollisionGroup::CHARACTER,
            collides_with: CollisionGroup::mask(&[
                CollisionGroup::DEFAULT,
                CollisionGroup::STATIC,
                CollisionGroup::CHARACTER,
            ]),
        }
    }
}

impl Component for CharacterMovement {
    fn type_name() -> &'static str {
        "CharacterMovement"
    }
}

/// Marks the character controlled by this client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPlayer;

impl Component for LocalPlayer {
    fn type_name() -> &'static str {
        "LocalPlayer"
    }
}
