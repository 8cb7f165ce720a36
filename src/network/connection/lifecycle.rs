//! Phase 2: the registered session loop and its teardown.

use super::{CLOSE_NOTICE_TIMEOUT, LineReader, LineWriter};
use crate::handlers::{Context, HandlerError, announce_departure, dispatch};
use crate::network::FloodGuard;
use crate::state::{Hub, Session};
use futures_util::{SinkExt, StreamExt};
use linechat_proto::{ProtocolError, reply};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

/// Removes the session from the registry and announces the departure.
///
/// `run_session` tears down explicitly before its closing writes; the guard
/// covers the remaining exits (write errors, a panic, the task being
/// aborted). `announce_departure` is a no-op after the first call.
struct Teardown<'a> {
    hub: &'a Hub,
    session: Arc<Session>,
}

impl Drop for Teardown<'_> {
    fn drop(&mut self) {
        announce_departure(self.hub, &self.session);
    }
}

/// Why the session loop ended.
#[derive(Debug)]
enum SessionEnd {
    Disconnected,
    Quit,
    ExcessFlood,
    SendQExceeded,
    IdleTimeout,
    Transport(ProtocolError),
}

impl SessionEnd {
    /// Last line for the client, if this ending has one.
    fn notice(&self) -> Option<&'static str> {
        match self {
            Self::Quit => Some(reply::EXIT_ACK),
            Self::ExcessFlood => Some(reply::EXCESS_FLOOD),
            Self::SendQExceeded => Some(reply::SENDQ_EXCEEDED),
            Self::IdleTimeout => Some(reply::IDLE_TIMEOUT),
            Self::Disconnected | Self::Transport(_) => None,
        }
    }
}

impl fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("client disconnected"),
            Self::Quit => f.write_str("client quit"),
            Self::ExcessFlood => f.write_str("excess flood"),
            Self::SendQExceeded => f.write_str("SendQ exceeded"),
            Self::IdleTimeout => f.write_str("idle timeout"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

/// Outcome of a write raced against eviction.
enum Written {
    Sent,
    Evicted,
}

/// Write one line to the client unless the session is evicted first.
///
/// A client that stops reading blocks the write; eviction is what gets the
/// task out again.
async fn write_line<T: AsRef<str>>(
    writer: &mut LineWriter,
    session: &Session,
    line: T,
) -> Result<Written, ProtocolError> {
    tokio::select! {
        sent = writer.send(line) => sent.map(|()| Written::Sent),
        _ = session.evicted() => Ok(Written::Evicted),
    }
}

/// Send final lines without hanging on a client that stopped reading.
async fn send_closing<I, T>(writer: &mut LineWriter, lines: I)
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let sent = timeout(CLOSE_NOTICE_TIMEOUT, async move {
        for line in lines {
            writer.send(line).await?;
        }
        Ok::<_, ProtocolError>(())
    })
    .await;

    match sent {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(error = %e, "Closing notice not sent"),
        Err(_) => debug!("Closing notice timed out"),
    }
}

/// Run a registered session until it ends, then tear it down.
pub(super) async fn run_session(
    hub: &Hub,
    session: Arc<Session>,
    mut reader: LineReader,
    mut writer: LineWriter,
    mut outgoing: mpsc::Receiver<Arc<str>>,
) -> anyhow::Result<()> {
    let _teardown = Teardown {
        hub,
        session: Arc::clone(&session),
    };

    let ctx = Context {
        hub,
        session: &session,
    };
    let mut flood = FloodGuard::from_config(&hub.flood);
    let idle = hub.timeouts.idle();
    let idle_timer = sleep(idle.unwrap_or(Duration::from_secs(3600)));
    tokio::pin!(idle_timer);

    let end = 'session: {
        for line in reply::welcome(session.nick()) {
            if let Written::Evicted = write_line(&mut writer, &session, line).await? {
                break 'session SessionEnd::SendQExceeded;
            }
        }

        loop {
            tokio::select! {
                inbound = reader.next() => {
                    let line = match inbound {
                        None => break SessionEnd::Disconnected,
                        Some(Err(e)) => break SessionEnd::Transport(e),
                        Some(Ok(line)) => line,
                    };

                    if let Some(limit) = idle {
                        idle_timer.as_mut().reset(Instant::now() + limit);
                    }

                    if let Some(guard) = flood.as_mut()
                        && !guard.allow()
                    {
                        break SessionEnd::ExcessFlood;
                    }

                    match dispatch(&ctx, &line) {
                        Ok(()) => {}
                        Err(HandlerError::Quit) => break SessionEnd::Quit,
                        Err(e) => {
                            debug!(code = e.error_code(), error = %e, "Command failed");
                            hub.chat_log.record(format_args!("Error from {}: {}", session.nick(), e));
                            if let Some(reply) = e.to_reply()
                                && let Written::Evicted = write_line(&mut writer, &session, reply).await?
                            {
                                break SessionEnd::SendQExceeded;
                            }
                        }
                    }
                }

                Some(line) = outgoing.recv() => {
                    if let Written::Evicted = write_line(&mut writer, &session, line).await? {
                        break SessionEnd::SendQExceeded;
                    }
                }

                _ = session.evicted() => break SessionEnd::SendQExceeded,

                _ = &mut idle_timer, if idle.is_some() => break SessionEnd::IdleTimeout,
            }
        }
    };

    match &end {
        SessionEnd::Disconnected | SessionEnd::Quit => {
            info!(nick = %session.nick(), reason = %end, "Session ended");
        }
        SessionEnd::Transport(_) => {
            debug!(nick = %session.nick(), reason = %end, "Session ended");
        }
        _ => {
            warn!(nick = %session.nick(), reason = %end, "Session terminated");
        }
    }

    // Leave the registry before the closing writes so nobody routes to a
    // session that is only flushing its last lines.
    announce_departure(hub, &session);

    if let Some(notice) = end.notice() {
        let mut lines: Vec<Arc<str>> = Vec::new();
        if let SessionEnd::Quit = end {
            // Lines queued before /exit still go out ahead of the ack.
            while let Ok(queued) = outgoing.try_recv() {
                lines.push(queued);
            }
        }
        lines.push(Arc::from(notice));
        send_closing(&mut writer, lines).await;
    }

    match timeout(CLOSE_NOTICE_TIMEOUT, SinkExt::<&str>::close(&mut writer)).await {
        Ok(Err(e)) => debug!(error = %e, "Error closing stream"),
        Ok(Ok(())) | Err(_) => {}
    }
    Ok(())
}
