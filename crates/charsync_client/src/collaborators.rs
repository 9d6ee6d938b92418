//! Interfaces to the systems the prediction core depends on but does not own.
//!
//! - [`Clock`]: monotonic milliseconds.
//! - [`CharacterMover`]: the deterministic physics step.
//! - [`ColliderBackend`]: collider lifetime in the physics world.
//! - [`CharacterWorld`]: the entity store: reads locations and movement
//!   parameters, receives the states the core decides to show.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use charsync_component::Entity;
use charsync_math::{Transform3D, Vec3};
use charsync_protocol::{CharacterMoveInput, CharacterMovement, CharacterState, CollisionGroup};

// ── Time ────────────────────────────────────────────────────────────────────

/// A monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// A clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    #[must_use]
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(now_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::Release);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::Acquire)
    }
}

// ── Physics ─────────────────────────────────────────────────────────────────

/// Advances a character by one input.
///
/// Implementations must be deterministic: the same previous state, input and
/// entity always produce the same result. Reconciliation depends on it.
pub trait CharacterMover {
    fn step(
        &self,
        previous: &CharacterState,
        input: &CharacterMoveInput,
        entity: Entity,
    ) -> CharacterState;
}

impl<F> CharacterMover for F
where
    F: Fn(&CharacterState, &CharacterMoveInput, Entity) -> CharacterState,
{
    fn step(
        &self,
        previous: &CharacterState,
        input: &CharacterMoveInput,
        entity: Entity,
    ) -> CharacterState {
        self(previous, input, entity)
    }
}

/// Opaque handle to a collider owned by the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub u64);

/// Upright capsule used as a character collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    pub radius: f32,
    /// Height of the cylindrical section, excluding the two caps.
    pub height: f32,
    /// Collision margin.
    pub margin: f32,
}

impl CapsuleShape {
    pub const MARGIN: f32 = 0.1;

    /// Size a capsule for a character at the given location's scale.
    #[must_use]
    pub fn for_character(movement: &CharacterMovement, location: &Transform3D) -> Self {
        let scale = location.uniform_scale();
        Self {
            radius: movement.radius * scale,
            height: (movement.height - 2.0 * movement.radius).max(0.0) * scale,
            margin: Self::MARGIN,
        }
    }
}

/// Creates and removes character colliders.
pub trait ColliderBackend {
    /// Create a collider. `None` if the physics world refuses it.
    fn create_collider(
        &mut self,
        entity: Entity,
        position: Vec3,
        shape: CapsuleShape,
        group: CollisionGroup,
        collides_with: u16,
    ) -> Option<ColliderHandle>;

    fn remove_collider(&mut self, handle: ColliderHandle);
}

// ── Entity store ────────────────────────────────────────────────────────────

/// The entity store, as seen by the prediction core.
pub trait CharacterWorld {
    /// World-space location, if the entity has one.
    fn location(&self, entity: Entity) -> Option<Transform3D>;

    /// Movement parameters, if the entity is a character.
    fn movement(&self, entity: Entity) -> Option<CharacterMovement>;

    /// Make `state` the entity's visible/simulated state.
    fn apply_state(&mut self, entity: Entity, state: &CharacterState);
}
