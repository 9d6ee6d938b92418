//! # charsync_protocol
//!
//! The data model of character synchronisation.
//!
//! - [`state`]: [`CharacterState`] snapshots and [`MovementMode`].
//! - [`input`]: [`CharacterMoveInput`] commands issued by the local player.
//! - [`components`]: entity-store components the core reacts to.
//! - [`messages`]: [`ClientEvent`], the single message type fed into a
//!   prediction session.
//!
//! Everything derives `serde` traits so a transport can carry it; encoding and
//! delivery are the transport's business.

pub mod components;
pub mod input;
pub mod messages;
pub mod state;

pub use components::{CharacterMovement, CollisionGroup, LocalPlayer};
pub use input::CharacterMoveInput;
pub use messages::ClientEvent;
pub use state::{CharacterState, MovementMode};
