//! # linechat-proto
//!
//! Wire layer for the linechat service: newline-delimited UTF-8 lines.
//!
//! - [`LineCodec`] frames a byte stream into lines for `tokio-util`.
//! - [`Command`] classifies one inbound line into a chat directive.
//! - [`reply`] builds every line the server sends back.
//!
//! ```rust
//! use linechat_proto::Command;
//!
//! let cmd = Command::parse("/pm alice hi there").unwrap();
//! assert_eq!(
//!     cmd,
//!     Some(Command::PrivateMessage { target: "alice", body: "hi there" })
//! );
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod line;
pub mod reply;

pub use command::Command;
pub use error::{CommandError, ProtocolError};
pub use line::LineCodec;
