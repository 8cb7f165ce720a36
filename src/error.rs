//! Unified error handling for linechat.
//!
//! Handler errors are either reported to the client that caused them (as a
//! single reply line) or end the session. Nothing here ever reaches another
//! client.

use crate::state::DeliveryError;
use linechat_proto::{CommandError, ProtocolError, reply};
use thiserror::Error;

/// Errors that can occur while negotiating or handling a line.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("empty nickname")]
    EmptyNickname,

    #[error("nickname required before chatting")]
    NicknameRequired,

    #[error("nickname in use: {0}")]
    NicknameInUse(String),

    #[error("nickname already set: {0}")]
    AlreadyNamed(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("no such nick: {0}")]
    NoSuchNick(String),

    #[error("private message not delivered: {0}")]
    DeliveryFailed(#[source] DeliveryError),

    #[error("client quit")]
    Quit,

    #[error("transport error: {0}")]
    Transport(#[from] ProtocolError),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyNickname => "empty_nickname",
            Self::NicknameRequired => "nickname_required",
            Self::NicknameInUse(_) => "nickname_in_use",
            Self::AlreadyNamed(_) => "already_named",
            Self::Command(e) => e.code(),
            Self::NoSuchNick(_) => "no_such_nick",
            Self::DeliveryFailed(_) => "delivery_failed",
            Self::Quit => "quit",
            Self::Transport(_) => "transport",
        }
    }

    /// Convert to the line shown to the offending client.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply
    /// (quit, transport failures).
    pub fn to_reply(&self) -> Option<String> {
        let line = match self {
            Self::EmptyNickname => reply::EMPTY_NICK.to_string(),
            Self::NicknameRequired => reply::NICK_REQUIRED.to_string(),
            Self::NicknameInUse(_) => reply::NICK_IN_USE.to_string(),
            Self::AlreadyNamed(nick) => reply::already_named(nick),
            Self::Command(CommandError::PrivateMessageUsage) => reply::PM_USAGE.to_string(),
            Self::NoSuchNick(target) => reply::no_such_nick(target),
            Self::DeliveryFailed(reason) => reply::pm_failed(&reason.to_string()),

            Self::Quit => return None,
            Self::Transport(_) => return None,
        };
        Some(line)
    }

    /// Whether the session must end after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NicknameInUse(_) | Self::Quit | Self::Transport(_)
        )
    }
}

/// Result type for line handlers.
pub type HandlerResult = Result<(), HandlerError>;
