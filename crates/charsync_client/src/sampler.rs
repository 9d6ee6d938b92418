//! Delayed sampling of remote characters.
//!
//! Remote characters are shown `render_delay` in the past so that, most of the
//! time, two buffered samples bracket the render time and the pose can be
//! interpolated. When the newest sample is already older than the render time
//! the pose is extrapolated along that sample's velocity.

use charsync_protocol::CharacterState;

use crate::history::StateHistory;

/// A pose computed for one render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemoteSample {
    /// Blended between two bracketing samples.
    Interpolated(CharacterState),
    /// Projected forward from the newest sample.
    Extrapolated(CharacterState),
}

impl RemoteSample {
    #[must_use]
    pub fn state(&self) -> &CharacterState {
        match self {
            Self::Interpolated(state) | Self::Extrapolated(state) => state,
        }
    }
}

/// `now - delay`, clamped at zero.
#[must_use]
pub fn render_time(now_ms: u64, render_delay_ms: u64) -> u64 {
    now_ms.saturating_sub(render_delay_ms)
}

/// Sample `history` at `render_time_ms`.
///
/// Scans in insertion order, remembering the last sample at or before the
/// render time and stopping at the first sample after it. Returns `None` when
/// no sample is at or before the render time; the character then keeps its
/// last shown pose.
#[must_use]
pub fn sample(history: &StateHistory, render_time_ms: u64) -> Option<RemoteSample> {
    let mut previous = None;
    let mut next = None;
    for state in history.iter() {
        if state.timestamp_ms <= render_time_ms {
            previous = Some(state);
        } else {
            next = Some(state);
            break;
        }
    }

    match (previous, next) {
        (Some(previous), Some(next)) => Some(RemoteSample::Interpolated(
            CharacterState::interpolate(previous, next, render_time_ms),
        )),
        (Some(previous), None) => Some(RemoteSample::Extrapolated(
            CharacterState::extrapolate(previous, render_time_ms),
        )),
        (None, _) => None,
    }
}
