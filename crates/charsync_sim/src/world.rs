//! Client-side entity store and physics stand-ins for the simulation.

use std::collections::HashMap;

use charsync_client::{CapsuleShape, CharacterWorld, ColliderBackend, ColliderHandle};
use charsync_component::{ComponentTypeId, Entity};
use charsync_math::{Transform3D, Vec3};
use charsync_protocol::{
    CharacterMovement, CharacterState, ClientEvent, CollisionGroup, LocalPlayer,
};
use tracing::debug;

/// Entity store holding locations and movement parameters.
///
/// Component changes are turned into [`ClientEvent`]s and queued until the
/// driver hands them to the session.
#[derive(Debug, Default)]
pub struct SimWorld {
    /// Last handle issued. Handles start at 1 and are never reused.
    last_entity: u64,
    locations: HashMap<Entity, Transform3D>,
    movements: HashMap<Entity, CharacterMovement>,
    shown: HashMap<Entity, CharacterState>,
    events: Vec<ClientEvent>,
}

impl SimWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an entity with a location and default movement parameters.
    pub fn spawn_character(&mut self, position: Vec3) -> Entity {
        self.last_entity += 1;
        let entity = Entity(self.last_entity);
        self.locations
            .insert(entity, Transform3D::from_position(position));
        self.movements.insert(entity, CharacterMovement::default());
        self.component_added(entity, ComponentTypeId::of::<Transform3D>());
        self.component_added(entity, ComponentTypeId::of::<CharacterMovement>());
        entity
    }

    /// Attach the [`LocalPlayer`] marker.
    pub fn mark_local(&mut self, entity: Entity) {
        self.component_added(entity, ComponentTypeId::of::<LocalPlayer>());
    }

    pub fn despawn(&mut self, entity: Entity) {
        self.locations.remove(&entity);
        self.shown.remove(&entity);
        if self.movements.remove(&entity).is_some() {
            self.component_removed(entity, ComponentTypeId::of::<CharacterMovement>());
        }
    }

    fn component_added(&mut self, entity: Entity, component: ComponentTypeId) {
        self.events
            .extend(ClientEvent::from_component_added(entity, component));
    }

    fn component_removed(&mut self, entity: Entity, component: ComponentTypeId) {
        self.events
            .extend(ClientEvent::from_component_removed(entity, component));
    }

    /// Take the queued lifecycle events.
    pub fn take_events(&mut self) -> Vec<ClientEvent> {
        std::mem::take(&mut self.events)
    }

    /// The state last shown for `entity`.
    #[must_use]
    pub fn shown(&self, entity: Entity) -> Option<&CharacterState> {
        self.shown.get(&entity)
    }
}

impl CharacterWorld for SimWorld {
    fn location(&self, entity: Entity) -> Option<Transform3D> {
        self.locations.get(&entity).copied()
    }

    fn movement(&self, entity: Entity) -> Option<CharacterMovement> {
        self.movements.get(&entity).copied()
    }

    fn apply_state(&mut self, entity: Entity, state: &CharacterState) {
        if let Some(location) = self.locations.get_mut(&entity) {
            location.position = state.position;
            location.rotation = state.rotation;
        }
        self.shown.insert(entity, *state);
    }
}

/// A collider registry that only remembers what was created.
#[derive(Debug, Default)]
pub struct SimColliders {
    next: u64,
    live: HashMap<ColliderHandle, (Entity, CapsuleShape)>,
}

impl SimColliders {
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl ColliderBackend for SimColliders {
    fn create_collider(
        &mut self,
        entity: Entity,
        position: Vec3,
        shape: CapsuleShape,
        group: CollisionGroup,
        collides_with: u16,
    ) -> Option<ColliderHandle> {
        self.next += 1;
        let handle = ColliderHandle(self.next);
        self.live.insert(handle, (entity, shape));
        debug!(
            %entity,
            handle = handle.0,
            x = position.x,
            y = position.y,
            z = position.z,
            radius = shape.radius,
            height = shape.height,
            group = group.0,
            collides_with,
            "collider created"
        );
        Some(handle)
    }

    fn remove_collider(&mut self, handle: ColliderHandle) {
        if self.live.remove(&handle).is_some() {
            debug!(handle = handle.0, "collider removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_emits_character_added() {
        let mut world = SimWorld::new();
        let entity = world.spawn_character(Vec3::ONE);
        assert_eq!(
            world.take_events(),
            vec![ClientEvent::CharacterAdded { entity }]
        );
        assert!(world.take_events().is_empty());
        assert_eq!(world.location(entity).unwrap().position, Vec3::ONE);
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut world = SimWorld::new();
        let first = world.spawn_character(Vec3::ZERO);
        world.despawn(first);
        let second = world.spawn_character(Vec3::ZERO);
        assert_eq!(first, Entity(1));
        assert_eq!(second, Entity(2));
    }

    #[test]
    fn test_mark_local_and_despawn_events() {
        let mut world = SimWorld::new();
        let entity = world.spawn_character(Vec3::ZERO);
        world.take_events();
        world.mark_local(entity);
        world.despawn(entity);
        assert_eq!(
            world.take_events(),
            vec![
                ClientEvent::LocalPlayerAssigned { entity },
                ClientEvent::CharacterRemoved { entity },
            ]
        );
        assert!(world.location(entity).is_none());
    }

    #[test]
    fn test_apply_state_moves_location() {
        let mut world = SimWorld::new();
        let entity = world.spawn_character(Vec3::ZERO);
        let state = CharacterState {
            position: Vec3::new(1.0, 2.0, 3.0),
            ..CharacterState::initial(&Transform3D::IDENTITY, 5)
        };
        world.apply_state(entity, &state);
        assert_eq!(world.location(entity).unwrap().position, state.position);
        assert_eq!(world.shown(entity), Some(&state));
    }

    #[test]
    fn test_colliders_track_live_handles() {
        let mut colliders = SimColliders::default();
        let shape = CapsuleShape {
            radius: 0.3,
            height: 1.0,
            margin: CapsuleShape::MARGIN,
        };
        let handle = colliders
            .create_collider(Entity(1), Vec3::ZERO, shape, CollisionGroup::CHARACTER, 0)
            .unwrap();
        assert_eq!(colliders.live(), 1);
        colliders.remove_collider(handle);
        colliders.remove_collider(handle);
        assert_eq!(colliders.live(), 0);
    }
}
