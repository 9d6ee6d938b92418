//! # charsync_component
//!
//! Entity handles and component identity for character synchronisation.
//!
//! The entity store itself lives outside this workspace. This crate only
//! provides what the prediction core needs to talk about it:
//!
//! - [`Entity`]: lightweight `u64` handle issued by the entity store.
//! - [`Component`] trait and [`ComponentTypeId`]: stable identities used in
//!   lifecycle events ("entity gained component X").

pub mod component;
pub mod entity;

pub use component::{Component, ComponentTypeId};
pub use entity::Entity;
