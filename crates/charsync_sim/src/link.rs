//! An in-memory network link with latency, jitter and periodic loss.
//!
//! Delivery time is `send time + latency + jitter`, where jitter is drawn
//! from a seeded xorshift32 generator so runs are reproducible. Jitter can
//! reorder messages.

use tracing::trace;

/// Deterministic xorshift32 generator.
#[derive(Debug, Clone)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// A zero seed is replaced by one, which xorshift cannot leave.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in `0..=max`.
    pub fn up_to(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        u64::from(self.next_u32()) % (max + 1)
    }
}

/// Link characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkConfig {
    pub latency_ms: u64,
    /// Extra delay drawn uniformly from `0..=jitter_ms`.
    pub jitter_ms: u64,
    /// Drop every n-th message. Zero never drops.
    pub loss_every: u64,
    pub seed: u32,
}

#[derive(Debug)]
struct InFlight<T> {
    deliver_at_ms: u64,
    order: u64,
    message: T,
}

/// One direction of a simulated connection.
#[derive(Debug)]
pub struct Link<T> {
    name: &'static str,
    config: LinkConfig,
    rng: Xorshift32,
    in_flight: Vec<InFlight<T>>,
    sent: u64,
    dropped: u64,
}

impl<T> Link<T> {
    #[must_use]
    pub fn new(name: &'static str, config: LinkConfig) -> Self {
        Self {
            name,
            config,
            rng: Xorshift32::new(config.seed),
            in_flight: Vec::new(),
            sent: 0,
            dropped: 0,
        }
    }

    /// Put `message` on the wire at `now_ms`. Returns `false` if it was lost.
    pub fn send(&mut self, now_ms: u64, message: T) -> bool {
        self.sent += 1;
        if self.config.loss_every > 0 && self.sent % self.config.loss_every == 0 {
            self.dropped += 1;
            trace!(link = self.name, sent = self.sent, "message lost");
            return false;
        }
        let deliver_at_ms = now_ms + self.config.latency_ms + self.rng.up_to(self.config.jitter_ms);
        self.in_flight.push(InFlight {
            deliver_at_ms,
            order: self.sent,
            message,
        });
        true
    }

    /// Take every message due at or before `now_ms`, in delivery order.
    pub fn deliver(&mut self, now_ms: u64) -> Vec<T> {
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.in_flight)
            .into_iter()
            .partition(|m| m.deliver_at_ms <= now_ms);
        self.in_flight = waiting;
        due.sort_by_key(|m| (m.deliver_at_ms, m.order));
        due.into_iter().map(|m| m.message).collect()
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    #[must_use]
    pub fn sent(&self) -> u64 {
        self.sent
    }

    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
