//! Inbound line classification.
//!
//! Every non-empty line a client sends is exactly one [`Command`]. Keywords
//! (`/nick`, `/pm`, `/exit`) match case-insensitively; their arguments are
//! returned verbatim, borrowed from the input line.

use crate::error::CommandError;

/// Keyword for claiming a nickname.
pub const NICK: &str = "/nick";
/// Keyword for a private message.
pub const PM: &str = "/pm";
/// Keyword for a graceful disconnect.
pub const EXIT: &str = "/exit";

/// A classified inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `/nick <name>`; the name may be empty, which callers must reject.
    SetNickname(&'a str),
    /// `/pm <target> <body>`.
    PrivateMessage {
        /// Recipient nickname (case-sensitive).
        target: &'a str,
        /// Message text with surrounding whitespace removed.
        body: &'a str,
    },
    /// Any other text, trimmed.
    Broadcast(&'a str),
    /// `/exit` on its own.
    Exit,
}

impl<'a> Command<'a> {
    /// Classify one line.
    ///
    /// Returns `Ok(None)` for lines that are empty after trimming.
    pub fn parse(line: &'a str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (line, ""),
        };

        if keyword.eq_ignore_ascii_case(NICK) {
            return Ok(Some(Self::SetNickname(rest)));
        }
        if keyword.eq_ignore_ascii_case(PM) {
            return parse_private_message(rest).map(Some);
        }
        if keyword.eq_ignore_ascii_case(EXIT) && rest.is_empty() {
            return Ok(Some(Self::Exit));
        }

        Ok(Some(Self::Broadcast(line)))
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetNickname(_) => "nick",
            Self::PrivateMessage { .. } => "pm",
            Self::Broadcast(_) => "broadcast",
            Self::Exit => "exit",
        }
    }
}

fn parse_private_message(rest: &str) -> Result<Command<'_>, CommandError> {
    let (target, body) = rest
        .split_once(char::is_whitespace)
        .ok_or(CommandError::PrivateMessageUsage)?;
    let body = body.trim();

    if target.is_empty() || body.is_empty() {
        return Err(CommandError::PrivateMessageUsage);
    }

    Ok(Command::PrivateMessage { target, body })
}
