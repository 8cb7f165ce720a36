//! The Hub: process-wide chat state shared by every connection task.

use super::registry::ClientRegistry;
use super::session::{SessionId, SessionIdGenerator};
use crate::chat_log::ChatLog;
use crate::config::{Config, FloodConfig, IdleTimeoutsConfig, LimitsConfig};

/// Shared state handed to each connection as `Arc<Hub>`.
///
/// Lives from server start to process exit.
pub struct Hub {
    /// Server name for log fields.
    pub server_name: String,
    /// Registered sessions.
    pub registry: ClientRegistry,
    /// Append-only chat record.
    pub chat_log: ChatLog,
    /// Line length and outbound queue sizes.
    pub limits: LimitsConfig,
    /// Inbound flood protection settings.
    pub flood: FloodConfig,
    /// Negotiation and idle timeouts.
    pub timeouts: IdleTimeoutsConfig,
    session_ids: SessionIdGenerator,
}

impl Hub {
    pub fn new(config: &Config, chat_log: ChatLog) -> Self {
        Self {
            server_name: config.server.name.clone(),
            registry: ClientRegistry::new(),
            chat_log,
            limits: config.limits.clone(),
            flood: config.flood.clone(),
            timeouts: config.idle_timeouts.clone(),
            session_ids: SessionIdGenerator::new(),
        }
    }

    /// Id for a freshly accepted connection.
    pub fn next_session_id(&self) -> SessionId {
        self.session_ids.next()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A hub with default limits and no chat log.
    pub fn hub() -> Hub {
        Hub::new(&Config::default(), ChatLog::disabled())
    }
}
