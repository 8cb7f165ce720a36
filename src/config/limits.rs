//! Per-connection limits: line size, outbound queue, flood and idle timeouts.

use serde::Deserialize;
use std::time::Duration;

/// Resource limits applied to every connection.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum inbound line length in bytes (default: 4096).
    /// Longer lines are a transport error and end the session.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Outbound queue capacity per session, in lines (default: 256).
    /// A recipient whose queue fills up is disconnected.
    #[serde(default = "default_sendq")]
    pub sendq: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            sendq: default_sendq(),
        }
    }
}

fn default_max_line_length() -> usize {
    linechat_proto::line::DEFAULT_MAX_LINE_LEN
}

fn default_sendq() -> usize {
    256
}

/// Token bucket flood protection for inbound lines.
#[derive(Debug, Clone, Deserialize)]
pub struct FloodConfig {
    /// Lines replenished per second (default: 0, disabled). Zero disables the check.
    #[serde(default = "default_messages_per_second")]
    pub messages_per_second: f32,
    /// Bucket capacity, i.e. the largest burst accepted (default: 20).
    #[serde(default = "default_burst")]
    pub burst: f32,
}

impl FloodConfig {
    /// Whether flood protection is active.
    pub fn enabled(&self) -> bool {
        self.messages_per_second > 0.0
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            messages_per_second: default_messages_per_second(),
            burst: default_burst(),
        }
    }
}

fn default_messages_per_second() -> f32 {
    0.0
}

fn default_burst() -> f32 {
    20.0
}

/// Timeouts for silent clients.
///
/// - `registration`: seconds allowed to pick a nickname (default: 60)
/// - `idle`: seconds without any inbound line before disconnect (default: 0)
///
/// A value of zero disables the corresponding timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct IdleTimeoutsConfig {
    #[serde(default = "default_registration_timeout")]
    pub registration: u64,
    #[serde(default)]
    pub idle: u64,
}

impl IdleTimeoutsConfig {
    /// Negotiation deadline, if any.
    pub fn registration(&self) -> Option<Duration> {
        (self.registration > 0).then(|| Duration::from_secs(self.registration))
    }

    /// Idle deadline, if any.
    pub fn idle(&self) -> Option<Duration> {
        (self.idle > 0).then(|| Duration::from_secs(self.idle))
    }
}

impl Default for IdleTimeoutsConfig {
    fn default() -> Self {
        Self {
            registration: default_registration_timeout(),
            idle: 0,
        }
    }
}

fn default_registration_timeout() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.max_line_length, 4096);
        assert_eq!(limits.sendq, 256);

        let flood = FloodConfig::default();
        assert!(!flood.enabled());
        assert_eq!(flood.burst, 20.0);

        let timeouts = IdleTimeoutsConfig::default();
        assert_eq!(timeouts.registration(), Some(Duration::from_secs(60)));
        assert_eq!(timeouts.idle(), None);
    }

    #[test]
    fn zero_disables() {
        let flood: FloodConfig = toml::from_str("messages_per_second = 0.0").unwrap();
        assert!(!flood.enabled());

        let flood: FloodConfig = toml::from_str("messages_per_second = 5.0").unwrap();
        assert!(flood.enabled());
        assert_eq!(flood.burst, 20.0);

        let timeouts: IdleTimeoutsConfig = toml::from_str("registration = 0\nidle = 30").unwrap();
        assert_eq!(timeouts.registration(), None);
        assert_eq!(timeouts.idle(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn partial_limits_keep_other_defaults() {
        let limits: LimitsConfig = toml::from_str("sendq = 8").unwrap();
        assert_eq!(limits.sendq, 8);
        assert_eq!(limits.max_line_length, 4096);
    }
}
