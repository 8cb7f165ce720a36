//! Flood protection.
//!
//! A per-connection token bucket: each inbound line costs one token and
//! tokens refill at a fixed rate up to the burst size.

use crate::config::FloodConfig;
use std::time::Instant;

/// Token bucket guarding one connection's inbound lines.
#[derive(Debug)]
pub struct FloodGuard {
    tokens: f32,
    last_check: Instant,
    rate: f32,
    capacity: f32,
}

impl FloodGuard {
    /// Create a guard with `rate` tokens per second and `capacity` burst.
    pub fn new(rate: f32, capacity: f32) -> Self {
        Self {
            tokens: capacity,
            last_check: Instant::now(),
            rate,
            capacity,
        }
    }

    /// Build a guard from config, or `None` when flood protection is off.
    pub fn from_config(config: &FloodConfig) -> Option<Self> {
        config
            .enabled()
            .then(|| Self::new(config.messages_per_second, config.burst))
    }

    /// Spend one token. Returns `false` when the client is flooding.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_check).as_secs_f32();
        self.last_check = now;

        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}
