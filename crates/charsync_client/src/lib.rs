//! # charsync_client
//!
//! Client-side prediction and server reconciliation for the locally
//! controlled character, plus delayed interpolation/extrapolation of every
//! other networked character.
//!
//! ## Flow
//!
//! 1. Local input → [`PredictionEngine`] steps the predicted state at once and
//!    queues the input for replay.
//! 2. Authoritative state arrives → acknowledged inputs are dropped, the rest
//!    are replayed on top of the server's state.
//! 3. Remote states arrive → pushed into that character's [`StateHistory`].
//! 4. Each render tick → [`sampler::sample`] blends each history at
//!    `now - render_delay`.
//!
//! [`PredictionSession`] owns all of the above and is driven by
//! [`ClientEvent`](charsync_protocol::ClientEvent)s plus one
//! [`PredictionSession::update`] call per tick. Physics, entity storage and
//! time are reached through the traits in [`collaborators`].

pub mod collaborators;
pub mod config;
pub mod correction;
pub mod error;
pub mod history;
pub mod inbox;
pub mod input_queue;
pub mod prediction;
pub mod sampler;
pub mod session;

#[cfg(test)]
mod test_support;

pub use collaborators::{
    CapsuleShape, CharacterMover, CharacterWorld, Clock, ColliderBackend, ColliderHandle,
    ManualClock, SystemClock,
};
pub use config::{ArrivalOrdering, CorrectionMode, PredictionConfig};
pub use correction::VisualCorrection;
pub use error::ConfigError;
pub use history::StateHistory;
pub use inbox::StateInbox;
pub use input_queue::InputQueue;
pub use prediction::{PredictionEngine, Reconciliation};
pub use sampler::RemoteSample;
pub use session::{CharacterRecord, PredictionSession, Tracking};
