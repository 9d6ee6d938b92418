//! Session configuration errors.
//!
//! Runtime irregularities (states for unknown entities, stale inputs, missing
//! colliders) are absorbed and logged by the session. Only an unusable
//! configuration is reported to the caller.

/// Errors raised while building a [`PredictionConfig`](crate::PredictionConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A history buffer must hold at least one sample.
    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    /// The pending input bound must allow at least one input.
    #[error("pending input bound must be at least 1")]
    ZeroPendingInputs,

    /// Smooth correction needs a non-empty blend window.
    #[error("smooth correction window must be longer than 0 ms")]
    ZeroBlendWindow,

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// The environment variable name.
        var: &'static str,
        /// The raw value found.
        value: String,
    },
}
