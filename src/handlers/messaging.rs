//! Broadcast and private message routing.
//!
//! All fan-out works from a registry snapshot: the lock is taken only to
//! copy the session list, and each recipient is then handled on its own so
//! a dead or slow client never costs anyone else their copy.

use super::{Context, HandlerError, HandlerResult};
use crate::state::{Hub, Session, SessionId};
use linechat_proto::reply;
use std::sync::Arc;
use tracing::{debug, info};

/// Queue `line` for every registered session except `exclude`.
///
/// Returns how many sessions accepted the line.
pub fn fan_out(hub: &Hub, line: &str, exclude: Option<SessionId>) -> usize {
    let line: Arc<str> = Arc::from(line);
    let mut delivered = 0;

    for recipient in hub.registry.snapshot() {
        if Some(recipient.id()) == exclude {
            continue;
        }
        match recipient.deliver(Arc::clone(&line)) {
            Ok(()) => delivered += 1,
            Err(e) => debug!(
                sid = %recipient.id(),
                nick = %recipient.nick(),
                error = %e,
                "Dropped line for recipient"
            ),
        }
    }

    delivered
}

/// Public message from the context's session to everyone else.
pub fn broadcast(ctx: &Context<'_>, body: &str) -> usize {
    let line = reply::broadcast(ctx.session.nick(), body);
    info!(nick = %ctx.session.nick(), body = %body, "Broadcast");
    ctx.hub.chat_log.record(format_args!("MSG {line}"));
    fan_out(ctx.hub, &line, Some(ctx.session.id()))
}

/// Deliver `body` to `target` and confirm to the sender.
///
/// An unknown target or a failed delivery is reported back to the sender
/// only; no other session sees anything.
pub fn private_message(ctx: &Context<'_>, target: &str, body: &str) -> HandlerResult {
    let sender = ctx.session;
    let Some(recipient) = ctx.hub.registry.lookup(target) else {
        debug!(nick = %sender.nick(), target = %target, "Private message to unknown nick");
        return Err(HandlerError::NoSuchNick(target.to_string()));
    };

    recipient
        .deliver(reply::pm_from(sender.nick(), body))
        .map_err(HandlerError::DeliveryFailed)?;

    if let Err(e) = sender.deliver(reply::pm_to(recipient.nick(), body)) {
        debug!(nick = %sender.nick(), error = %e, "Private message confirmation dropped");
    }

    info!(from = %sender.nick(), to = %recipient.nick(), body = %body, "Private message");
    ctx.hub.chat_log.record(format_args!(
        "PM {} -> {}: {}",
        sender.nick(),
        recipient.nick(),
        body
    ));
    Ok(())
}

/// Tell everyone else that `session` has joined.
pub fn announce_join(hub: &Hub, session: &Session) {
    fan_out(hub, &reply::joined(session.nick()), Some(session.id()));
}

/// Remove `session` from the registry and announce its departure.
///
/// Only the call that actually removed the session announces anything, so
/// repeated teardown of one session yields exactly one departure line.
pub fn announce_departure(hub: &Hub, session: &Session) -> bool {
    if !hub.registry.unregister(session) {
        return false;
    }

    info!(sid = %session.id(), nick = %session.nick(), addr = %session.addr(), "Client left");
    hub.chat_log.record(format_args!(
        "Client {} ({}) disconnected",
        session.nick(),
        session.addr()
    ));
    if hub.registry.is_empty() {
        debug!("Last client left");
    } else {
        fan_out(hub, &reply::departed(session.nick()), Some(session.id()));
    }
    true
}
