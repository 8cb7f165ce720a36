//! Chat log side channel.
//!
//! Connects, nickname claims, disconnects, broadcasts and private messages
//! are appended to a plain text file as `[YYYY-MM-DD HH:MM:SS] text`.
//! Records go through a bounded queue to a single writer task; a full queue
//! or a failed write loses the record and nothing else.

use crate::config::ChatLogConfig;
use chrono::Local;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

/// Handle for appending to the chat log. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ChatLog {
    tx: Option<mpsc::Sender<String>>,
}

impl ChatLog {
    /// Start the writer task. Must be called inside a Tokio runtime.
    pub fn spawn(config: &ChatLogConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue);
        let path = config.path.clone();
        info!(path = %path.display(), "Chat log enabled");
        tokio::spawn(run_writer(path, rx));
        Self { tx: Some(tx) }
    }

    /// A log that discards every record.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Timestamp and enqueue one record. Never blocks.
    pub fn record(&self, text: impl Display) {
        let Some(tx) = &self.tx else {
            return;
        };
        let line = format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), text);
        match tx.try_send(line) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!("Chat log queue full, record dropped"),
            Err(TrySendError::Closed(_)) => debug!("Chat log writer gone, record dropped"),
        }
    }
}

async fn open(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path).await
}

async fn run_writer(path: PathBuf, mut rx: mpsc::Receiver<String>) {
    let mut file: Option<File> = None;

    while let Some(mut line) = rx.recv().await {
        if file.is_none() {
            match open(&path).await {
                Ok(f) => file = Some(f),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to open chat log");
                    continue;
                }
            }
        }

        line.push('\n');
        let Some(f) = file.as_mut() else {
            continue;
        };
        let written = match f.write_all(line.as_bytes()).await {
            Ok(()) => f.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            warn!(path = %path.display(), error = %e, "Failed to write chat log");
            // Reopen on the next record.
            file = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn read_until(path: &Path, needle: &str) -> String {
        for _ in 0..50 {
            if let Ok(content) = tokio::fs::read_to_string(path).await
                && content.contains(needle)
            {
                return content;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("chat log never contained {needle:?}");
    }

    #[tokio::test]
    async fn records_are_timestamped_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.log");
        std::fs::write(&path, "existing\n").unwrap();

        let log = ChatLog::spawn(&ChatLogConfig {
            enabled: true,
            path: path.clone(),
            queue: 16,
        });
        log.record("MSG Olena: привіт");
        log.record(format_args!("PM {} -> {}: {}", "Olena", "Taras", "hi"));

        let content = read_until(&path, "PM Olena -> Taras: hi").await;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "existing");
        assert!(lines[1].starts_with('['));
        assert!(lines[1].ends_with("] MSG Olena: привіт"));
        // "[YYYY-MM-DD HH:MM:SS] " prefix
        assert_eq!(&lines[1][20..22], "] ");
    }

    #[tokio::test]
    async fn unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let log = ChatLog::spawn(&ChatLogConfig {
            enabled: true,
            path: dir.path().join("missing").join("server.log"),
            queue: 4,
        });

        for i in 0..32 {
            log.record(i);
        }
    }

    #[test]
    fn disabled_log_accepts_records() {
        ChatLog::disabled().record("nothing happens");
    }
}
