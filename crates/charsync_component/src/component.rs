//! Component identity.
//!
//! Lifecycle events from the entity store name the component that was added
//! or removed by its [`ComponentTypeId`]. The id is the FNV-1a 64-bit hash of
//! the component's name, so an entity store written in any language can
//! produce matching ids.

use serde::{Deserialize, Serialize};

/// Stable identifier of a component type (FNV-1a 64-bit of its name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hash a component name with FNV-1a 64-bit.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = (hash XOR byte) * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The id of component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// Data that can be attached to an entity in the external entity store.
///
/// # Examples
///
/// ```rust
/// use serde::{Serialize, Deserialize};
/// use charsync_component::{Component, ComponentTypeId};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Stamina {
///     current: f32,
/// }
///
/// impl Component for Stamina {
///     fn type_name() -> &'static str { "Stamina" }
/// }
///
/// assert_eq!(Stamina::component_type_id(), ComponentTypeId::from_name("Stamina"));
/// ```
pub trait Component: Send + Sync + 'static + Serialize + for<'de> Deserialize<'de> {
    /// Name the entity store uses for this component.
    fn type_name() -> &'static str;

    /// FNV-1a hash of [`Component::type_name`].
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}
