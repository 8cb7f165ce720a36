//! Error types for the chat wire protocol.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Transport-level errors raised while framing lines.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer sent bytes that are not valid UTF-8.
    #[error("invalid utf-8 at byte {byte_pos}")]
    InvalidUtf8 {
        /// Offset of the first invalid byte within the line.
        byte_pos: usize,
    },

    /// A line exceeded the configured length limit.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Bytes buffered when the limit was hit.
        actual: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// A recognised command whose arguments are unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `/pm` without a target or without a body.
    #[error("malformed /pm: expected `/pm <name> <text>`")]
    PrivateMessageUsage,
}

impl CommandError {
    /// Static label for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PrivateMessageUsage => "pm_usage",
        }
    }
}
