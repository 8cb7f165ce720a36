//! Line routing.
//!
//! Every line read after negotiation is classified by
//! [`linechat_proto::Command::parse`] and dispatched here. Handlers never
//! write to a socket: they queue lines on [`Session`]s, which keeps the
//! registry lock and all network I/O apart.

mod messaging;
mod nick;

pub use crate::error::{HandlerError, HandlerResult};
pub use messaging::{announce_departure, announce_join, broadcast, private_message};
pub use nick::claim_nickname;

use crate::state::{Hub, Session};
use linechat_proto::Command;
use std::sync::Arc;
use tracing::trace;

/// Handler context for one inbound line.
pub struct Context<'a> {
    /// Shared server state.
    pub hub: &'a Hub,
    /// The registered session that sent the line.
    pub session: &'a Arc<Session>,
}

/// Route one raw line from a registered session.
///
/// `Err(HandlerError::Quit)` asks the caller to end the session; every other
/// error is meant for the sender only.
pub fn dispatch(ctx: &Context<'_>, line: &str) -> HandlerResult {
    let Some(command) = Command::parse(line)? else {
        return Ok(());
    };
    trace!(nick = %ctx.session.nick(), command = command.name(), "Dispatching");

    match command {
        Command::Exit => Err(HandlerError::Quit),
        Command::SetNickname(_) => Err(HandlerError::AlreadyNamed(ctx.session.nick().to_string())),
        Command::PrivateMessage { target, body } => private_message(ctx, target, body),
        Command::Broadcast(body) => {
            broadcast(ctx, body);
            Ok(())
        }
    }
}
