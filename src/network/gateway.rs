//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket and spawns a Connection task for
//! each incoming client without waiting on it.

use crate::network::Connection;
use crate::state::Hub;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    hub: Arc<Hub>,
}

impl Gateway {
    /// Bind the gateway to `addr`. Failure here is fatal to startup.
    pub async fn bind(addr: SocketAddr, hub: Arc<Hub>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Listener bound");
        Ok(Self { listener, hub })
    }

    /// Address actually bound (differs from the requested one for port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway", fields(server = %self.hub.server_name))]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let hub = Arc::clone(&self.hub);
                    let sid = hub.next_session_id();
                    info!(%sid, %addr, "Connection accepted");
                    hub.chat_log.record(format_args!("Client {addr} connected"));

                    tokio::spawn(async move {
                        if let Err(e) = Connection::new(sid, stream, addr, hub).run().await {
                            error!(%sid, %addr, error = %e, "Connection error");
                        }
                        info!(%sid, %addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
