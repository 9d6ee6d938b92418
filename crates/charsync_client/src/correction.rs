//! Visual smoothing of reconciliation snaps.
//!
//! Only used with [`CorrectionMode::Smooth`](crate::CorrectionMode::Smooth).
//! The predicted state is always corrected exactly; what fades is a visual
//! offset added to the position shown to the player.

use charsync_math::Vec3;
use charsync_protocol::CharacterState;

/// A position offset that eases out to zero over a fixed window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualCorrection {
    initial_offset: Vec3,
    started_at_ms: u64,
    window_ms: u64,
}

impl VisualCorrection {
    /// Start fading `offset` out over `window_ms`, beginning at `now_ms`.
    #[must_use]
    pub fn start(offset: Vec3, now_ms: u64, window_ms: u64) -> Self {
        Self {
            initial_offset: offset,
            started_at_ms: now_ms,
            window_ms: window_ms.max(1),
        }
    }

    /// Fold a new correction error into this one, so the visible position
    /// does not jump: the remaining offset plus the new error restart the
    /// window.
    #[must_use]
    pub fn retarget(&self, additional: Vec3, now_ms: u64) -> Self {
        Self::start(self.offset_at(now_ms) + additional, now_ms, self.window_ms)
    }

    /// Offset to add to the true position at `now_ms`.
    #[must_use]
    pub fn offset_at(&self, now_ms: u64) -> Vec3 {
        if self.is_complete(now_ms) {
            return Vec3::ZERO;
        }
        let elapsed = now_ms.saturating_sub(self.started_at_ms) as f32;
        let t = elapsed / self.window_ms as f32;
        self.initial_offset * (1.0 - ease_out_cubic(t))
    }

    #[must_use]
    pub fn is_complete(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_at_ms) >= self.window_ms
    }

    /// `state` displaced by the current offset.
    #[must_use]
    pub fn apply(&self, state: &CharacterState, now_ms: u64) -> CharacterState {
        CharacterState {
            position: state.position + self.offset_at(now_ms),
            ..*state
        }
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
