//! Session handles.
//!
//! A [`Session`] is the registry's view of one connected client: its
//! identity, its confirmed nickname, and the sending side of the client's
//! outbound queue. The TCP stream itself stays with the connection task,
//! which is the only writer; everyone else enqueues whole lines.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

/// Process-unique connection identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:06}", self.0)
    }
}

/// Hands out [`SessionId`]s in accept order.
#[derive(Debug, Default)]
pub struct SessionIdGenerator {
    counter: AtomicU64,
}

impl SessionIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next unique id.
    pub fn next(&self) -> SessionId {
        SessionId(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Why a line could not be queued for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The session's connection task has already gone away.
    #[error("отримувач відключився")]
    Disconnected,
    /// The session's outbound queue is full; the session is being evicted.
    #[error("черга отримувача переповнена")]
    QueueFull,
}

/// A connection that has not picked a nickname yet.
///
/// Owns everything a [`Session`] needs except the name, so a successful
/// `/nick` turns into a registered session without touching the stream.
#[derive(Debug)]
pub struct PendingSession {
    id: SessionId,
    addr: SocketAddr,
    outgoing: mpsc::Sender<Arc<str>>,
    evict: CancellationToken,
}

impl PendingSession {
    pub fn new(id: SessionId, addr: SocketAddr, outgoing: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id,
            addr,
            outgoing,
            evict: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Fix the nickname. The caller must have rejected empty names.
    pub fn bind(&self, nick: &str) -> Session {
        Session {
            id: self.id,
            nick: nick.to_string(),
            addr: self.addr,
            outgoing: self.outgoing.clone(),
            evict: self.evict.clone(),
        }
    }
}

/// A registered client. The nickname never changes for the session's life.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    nick: String,
    addr: SocketAddr,
    outgoing: mpsc::Sender<Arc<str>>,
    evict: CancellationToken,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queue one line for this client without waiting.
    ///
    /// A full queue means the client is not reading; it is evicted so one
    /// slow reader cannot grow memory or stall senders.
    pub fn deliver(&self, line: impl Into<Arc<str>>) -> Result<(), DeliveryError> {
        match self.outgoing.try_send(line.into()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.evict.cancel();
                Err(DeliveryError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DeliveryError::Disconnected),
        }
    }

    /// Resolves once the session has been marked for eviction.
    pub fn evicted(&self) -> tokio_util::sync::WaitForCancellationFuture<'_> {
        self.evict.cancelled()
    }
}
