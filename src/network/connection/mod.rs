//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task and goes through two phases:
//!
//! ```text
//! Phase 1: Handshake (sequential: prompt, read /nick, claim)
//!    ↓
//! Phase 2: Session loop (tokio::select!)
//!    ┌──────────────────────────────────────────────┐
//!    │  FramedRead ──▶ dispatch ──▶ other sessions'  │
//!    │                               outbound queues │
//!    │  outbound queue ──▶ FramedWrite               │
//!    │  eviction / idle timer ──▶ close              │
//!    └──────────────────────────────────────────────┘
//! ```
//!
//! The task is the only writer on its socket. Everything other sessions
//! send arrives through the bounded outbound queue.

mod handshake;
mod lifecycle;

use handshake::{HandshakeExit, negotiate};

use crate::state::{Hub, PendingSession, SessionId};
use futures_util::SinkExt;
use linechat_proto::{LineCodec, reply};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, instrument};

pub(crate) type LineReader = FramedRead<OwnedReadHalf, LineCodec>;
pub(crate) type LineWriter = FramedWrite<OwnedWriteHalf, LineCodec>;

/// How long a closing notice may take to reach a client that is not reading.
const CLOSE_NOTICE_TIMEOUT: Duration = Duration::from_secs(2);

/// A client connection handler.
pub struct Connection {
    sid: SessionId,
    stream: TcpStream,
    addr: SocketAddr,
    hub: Arc<Hub>,
}

impl Connection {
    pub fn new(sid: SessionId, stream: TcpStream, addr: SocketAddr, hub: Arc<Hub>) -> Self {
        Self {
            sid,
            stream,
            addr,
            hub,
        }
    }

    /// Drive the connection until the client leaves or is disconnected.
    #[instrument(skip(self), fields(sid = %self.sid, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Self {
            sid,
            stream,
            addr,
            hub,
        } = self;

        let (read_half, write_half) = stream.into_split();
        let codec = LineCodec::with_max_len(hub.limits.max_line_length);
        let mut reader: LineReader = FramedRead::new(read_half, codec.clone());
        let mut writer: LineWriter = FramedWrite::new(write_half, codec);

        let (outgoing_tx, outgoing_rx) = mpsc::channel(hub.limits.sendq);
        let pending = PendingSession::new(sid, addr, outgoing_tx);

        let handshake = negotiate(&hub, &pending, &mut reader, &mut writer);
        let negotiated = match hub.timeouts.registration() {
            Some(limit) => timeout(limit, handshake).await.ok(),
            None => Some(handshake.await),
        };
        let Some(negotiated) = negotiated else {
            info!("Nickname negotiation timed out");
            let _ = timeout(CLOSE_NOTICE_TIMEOUT, writer.send(reply::NEGOTIATION_TIMEOUT)).await;
            return Ok(());
        };

        let session = match negotiated {
            Ok(session) => session,
            Err(HandshakeExit::Disconnected) => {
                debug!("Client left before choosing a nickname");
                return Ok(());
            }
            Err(HandshakeExit::Rejected(nick)) => {
                info!(nick = %nick, "Closing connection after nickname rejection");
                return Ok(());
            }
            Err(HandshakeExit::Transport(e)) => {
                debug!(error = %e, "Transport error during negotiation");
                return Ok(());
            }
        };
        drop(pending);

        lifecycle::run_session(&hub, session, reader, writer, outgoing_rx).await
    }
}
