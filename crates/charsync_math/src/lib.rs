//! # charsync_math
//!
//! Re-exports [`glam`] and defines [`Transform3D`], the location component the
//! entity store keeps for every spatial entity.

pub mod transform;

pub use glam::{Quat, Vec3};

pub use transform::{Transform3D, ms_to_secs};
