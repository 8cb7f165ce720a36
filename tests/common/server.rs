//! Test server management.
//!
//! Spawns and manages linechatd instances for integration testing.

use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    chat_log: PathBuf,
    // Removed on drop.
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with the stock test configuration.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server, appending `extra` TOML sections to the test config.
    pub async fn spawn_with(extra: &str) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let port = free_port()?;
        let chat_log = data_dir.path().join("server.log");

        let config_content = format!(
            r#"
[server]
name = "test.linechat"

[listen]
address = "127.0.0.1:{port}"

[chat_log]
path = "{log}"

{extra}
"#,
            log = chat_log.display().to_string().replace('\\', "\\\\"),
        );

        let config_path = data_dir.path().join("config.toml");
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_linechatd"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            chat_log,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }

    /// Connect and complete nickname negotiation.
    pub async fn join(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = self.connect(nick).await?;
        client.register().await?;
        Ok(client)
    }

    /// Poll the chat log until a line containing `needle` shows up.
    #[allow(dead_code)]
    pub async fn wait_for_log(&self, needle: &str) -> anyhow::Result<Vec<String>> {
        for _ in 0..50 {
            let content = std::fs::read_to_string(&self.chat_log).unwrap_or_default();
            if content.contains(needle) {
                return Ok(content.lines().map(str::to_string).collect());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("chat log never contained {needle:?}")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn free_port() -> anyhow::Result<u16> {
    let listener = StdTcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
