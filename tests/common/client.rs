//! Test chat client.
//!
//! A line client for integration testing that sends raw lines and asserts
//! on received responses.

use linechat_proto::reply;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        let (read_half, write_half) = stream.into_split();
        let reader = BufReader::new(read_half);
        let writer = BufWriter::new(write_half);

        Ok(Self {
            reader,
            writer,
            nick: nick.to_string(),
        })
    }

    #[allow(dead_code)]
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send one line, terminated with `\r\n` like the interactive client.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line from the server.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout. End of stream is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive lines until the given predicate returns true.
    #[allow(dead_code)]
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let mut lines = Vec::new();
        loop {
            let line = self.recv().await?;
            let done = predicate(&line);
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines)
    }

    /// Answer the prompt with this client's nick and consume the welcome.
    pub async fn register(&mut self) -> anyhow::Result<()> {
        let prompt = self.recv().await?;
        anyhow::ensure!(prompt == reply::NICK_PROMPT, "unexpected prompt: {prompt:?}");

        self.send_line(&format!("/nick {}", self.nick)).await?;

        for expected in reply::welcome(&self.nick) {
            let line = self.recv().await?;
            anyhow::ensure!(line == expected, "expected {expected:?}, got {line:?}");
        }
        Ok(())
    }

    /// Assert nothing arrives within a short window.
    #[allow(dead_code)]
    pub async fn assert_silent(&mut self) {
        if let Ok(line) = self.recv_timeout(Duration::from_millis(300)).await {
            panic!("{} received unexpected line: {line:?}", self.nick);
        }
    }

    /// Wait for the server to close the connection.
    #[allow(dead_code)]
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        anyhow::ensure!(n == 0, "expected close, got {line:?}");
        Ok(())
    }
}
