//! Events delivered to a prediction session.
//!
//! The entity store and the transport both speak in [`ClientEvent`]s. A
//! session consumes them one at a time through `PredictionSession::handle`.

use charsync_component::{Component, ComponentTypeId, Entity};
use serde::{Deserialize, Serialize};

use crate::components::{CharacterMovement, LocalPlayer};
use crate::input::CharacterMoveInput;
use crate::state::CharacterState;

// ── Lifecycle ───────────────────────────────────────────────────────────────

/// Everything a prediction session reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClientEvent {
    /// The entity gained movement capability and has a location.
    CharacterAdded { entity: Entity },
    /// The entity lost its movement capability or was destroyed.
    CharacterRemoved { entity: Entity },
    /// The entity became the character controlled by this client.
    LocalPlayerAssigned { entity: Entity },

    // ── Network ─────────────────────────────────────────────────────────────
    /// A server-confirmed (or relayed) state for an entity.
    StateReceived {
        entity: Entity,
        state: CharacterState,
    },
    /// A command produced by local input capture.
    InputIssued {
        entity: Entity,
        input: CharacterMoveInput,
    },
}

impl ClientEvent {
    /// The entity the event is about.
    #[must_use]
    pub fn entity(&self) -> Entity {
        match self {
            Self::CharacterAdded { entity }
            | Self::CharacterRemoved { entity }
            | Self::LocalPlayerAssigned { entity }
            | Self::StateReceived { entity, .. }
            | Self::InputIssued { entity, .. } => *entity,
        }
    }

    /// Translate an entity-store "component added" notification.
    ///
    /// Returns `None` for components the prediction core does not care about.
    #[must_use]
    pub fn from_component_added(entity: Entity, component: ComponentTypeId) -> Option<Self> {
        if component == CharacterMovement::component_type_id() {
            Some(Self::CharacterAdded { entity })
        } else if component == LocalPlayer::component_type_id() {
            Some(Self::LocalPlayerAssigned { entity })
        } else {
            None
        }
    }

    /// Translate an entity-store "component removed" notification.
    #[must_use]
    pub fn from_component_removed(entity: Entity, component: ComponentTypeId) -> Option<Self> {
        (component == CharacterMovement::component_type_id())
            .then_some(Self::CharacterRemoved { entity })
    }
}
