//! Nickname claims during negotiation.

use super::{HandlerError, announce_join};
use crate::state::{Hub, PendingSession, Session};
use std::sync::Arc;
use tracing::info;

/// Turn a pending connection into a registered session named `nick`.
///
/// Blank names are rejected and may be retried. A name held by another
/// session is rejected without touching the registry; the caller closes the
/// connection. On success the join announcement is already queued for
/// everyone else.
pub fn claim_nickname(
    hub: &Hub,
    pending: &PendingSession,
    nick: &str,
) -> Result<Arc<Session>, HandlerError> {
    let nick = nick.trim();
    if nick.is_empty() {
        return Err(HandlerError::EmptyNickname);
    }

    let session = Arc::new(pending.bind(nick));
    if !hub.registry.try_register(Arc::clone(&session)) {
        info!(sid = %pending.id(), nick = %nick, "Nickname already in use");
        hub.chat_log.record(format_args!(
            "Client {} tried nickname '{}' but it is taken",
            session.addr(),
            nick
        ));
        return Err(HandlerError::NicknameInUse(nick.to_string()));
    }

    info!(sid = %session.id(), nick = %nick, clients = hub.registry.len(), "Nickname registered");
    hub.chat_log.record(format_args!(
        "Client {} set nickname '{}'",
        session.addr(),
        nick
    ));
    announce_join(hub, &session);

    Ok(session)
}
