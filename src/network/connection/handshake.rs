//! Phase 1: nickname negotiation.

use super::{LineReader, LineWriter};
use crate::handlers::{HandlerError, claim_nickname};
use crate::state::{Hub, PendingSession, Session};
use futures_util::{SinkExt, StreamExt};
use linechat_proto::{Command, ProtocolError, reply};
use std::sync::Arc;
use tracing::debug;

/// Why negotiation ended without a registered session.
#[derive(Debug)]
pub(super) enum HandshakeExit {
    /// End of stream before a nickname was accepted.
    Disconnected,
    /// The requested nickname is taken. The client has been told.
    Rejected(String),
    Transport(ProtocolError),
}

impl From<ProtocolError> for HandshakeExit {
    fn from(e: ProtocolError) -> Self {
        Self::Transport(e)
    }
}

/// Prompt for a nickname and read lines until one is accepted.
///
/// Blank names and non-`/nick` lines get a re-prompt. A taken name is
/// reported and ends negotiation; the client must reconnect.
pub(super) async fn negotiate(
    hub: &Hub,
    pending: &PendingSession,
    reader: &mut LineReader,
    writer: &mut LineWriter,
) -> Result<Arc<Session>, HandshakeExit> {
    writer.send(reply::NICK_PROMPT).await?;

    while let Some(line) = reader.next().await {
        let line = line?;
        let claimed = match Command::parse(&line) {
            Ok(Some(Command::SetNickname(nick))) => claim_nickname(hub, pending, nick),
            _ => Err(HandlerError::NicknameRequired),
        };

        let err = match claimed {
            Ok(session) => return Ok(session),
            Err(e) => e,
        };

        debug!(code = err.error_code(), "Nickname not accepted");
        if let Some(reply) = err.to_reply() {
            writer.send(reply).await?;
        }
        if err.is_fatal() {
            return Err(match err {
                HandlerError::NicknameInUse(nick) => HandshakeExit::Rejected(nick),
                _ => HandshakeExit::Disconnected,
            });
        }
    }

    Err(HandshakeExit::Disconnected)
}
