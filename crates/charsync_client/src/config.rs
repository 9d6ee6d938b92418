//! Session configuration.

use crate::error::ConfigError;

/// Default number of samples kept per remote character.
pub const DEFAULT_HISTORY_CAPACITY: usize = 128;

/// Default delay between "now" and the time remote characters are rendered
/// at. Must match the value the authoritative side assumes.
pub const DEFAULT_RENDER_DELAY_MS: u64 = 100;

/// Default bound on unacknowledged local inputs.
pub const DEFAULT_MAX_PENDING_INPUTS: usize = 1024;

/// Environment override for [`PredictionConfig::render_delay_ms`].
pub const RENDER_DELAY_ENV: &str = "CHARSYNC_RENDER_DELAY_MS";

/// Environment override for [`PredictionConfig::history_capacity`].
pub const HISTORY_CAPACITY_ENV: &str = "CHARSYNC_HISTORY_CAPACITY";

/// Environment override for [`PredictionConfig::max_pending_inputs`].
pub const MAX_PENDING_INPUTS_ENV: &str = "CHARSYNC_MAX_PENDING_INPUTS";

/// What to do with a remote state older than the newest buffered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrivalOrdering {
    /// Buffer every state in arrival order. Assumes the transport delivers
    /// states in timestamp order.
    #[default]
    AcceptAll,
    /// Drop states whose timestamp is older than the newest buffered state.
    DropStale,
}

/// How the visible local character follows a reconciled prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionMode {
    /// Apply the reconciled state immediately. Large divergences snap.
    #[default]
    Snap,
    /// Apply the reconciled state, but render it displaced by the correction
    /// error, fading the displacement out over `blend_ms`.
    Smooth { blend_ms: u64 },
}

/// Tunables of a [`PredictionSession`](crate::PredictionSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionConfig {
    /// Samples kept per remote character.
    pub history_capacity: usize,
    /// Remote characters are rendered this far in the past.
    pub render_delay_ms: u64,
    /// Bound on unacknowledged local inputs; the oldest is dropped beyond it.
    pub max_pending_inputs: usize,
    pub ordering: ArrivalOrdering,
    pub correction: CorrectionMode,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            render_delay_ms: DEFAULT_RENDER_DELAY_MS,
            max_pending_inputs: DEFAULT_MAX_PENDING_INPUTS,
            ordering: ArrivalOrdering::AcceptAll,
            correction: CorrectionMode::Snap,
        }
    }
}

impl PredictionConfig {
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_render_delay_ms(mut self, delay_ms: u64) -> Self {
        self.render_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_max_pending_inputs(mut self, max: usize) -> Self {
        self.max_pending_inputs = max;
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: ArrivalOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    #[must_use]
    pub fn with_correction(mut self, correction: CorrectionMode) -> Self {
        self.correction = correction;
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        if self.max_pending_inputs == 0 {
            return Err(ConfigError::ZeroPendingInputs);
        }
        if let CorrectionMode::Smooth { blend_ms: 0 } = self.correction {
            return Err(ConfigError::ZeroBlendWindow);
        }
        Ok(())
    }

    /// Defaults overridden by the `CHARSYNC_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for an unparsable override, or any
    /// validation error of the resulting config.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(value) = parse_override(&lookup, RENDER_DELAY_ENV)? {
            config.render_delay_ms = value;
        }
        if let Some(value) = parse_override(&lookup, HISTORY_CAPACITY_ENV)? {
            config.history_capacity = value;
        }
        if let Some(value) = parse_override(&lookup, MAX_PENDING_INPUTS_ENV)? {
            config.max_pending_inputs = value;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
    }
}
