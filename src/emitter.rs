//! Event emitter service.
//!
//! Owns the Unix domain socket lifecycle: claim the path, bind, accept one
//! peer at a time, and stream the configured event line at a fixed cadence
//! until the peer disconnects, then return to accepting. The original
//! test stub never left its send loop, so a second client could never
//! connect; here a failed write tears the session down and re-arms accept.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, SimError};
use crate::utils::sockfile::SocketFileGuard;

/// Streams a constant device event to one connected peer at a time.
pub struct EventEmitter {
    socket_path: PathBuf,
    interval: Duration,
    line: String,
    running: Arc<RwLock<bool>>,
}

impl EventEmitter {
    /// Create an emitter from configuration. The event line is encoded once
    /// here and replayed verbatim for the process lifetime.
    pub fn new(config: &Config) -> Self {
        Self {
            socket_path: config.socket_path.clone(),
            interval: Duration::from_secs(config.interval_secs),
            line: config.event.encode(),
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// The exact bytes sent to every peer.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Serve connections until [`stop`](Self::stop) is called.
    ///
    /// Claims the socket path (removing stale leftovers), binds, then loops:
    /// accept a peer, stream to it until it disconnects, re-arm accept.
    /// The socket file is removed when this returns.
    pub async fn run(&self) -> Result<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                warn!("Emitter already running");
                return Ok(());
            }
            *running = true;
        }

        let result = self.serve().await;
        *self.running.write().await = false;
        result
    }

    async fn serve(&self) -> Result<()> {
        let guard = SocketFileGuard::acquire(&self.socket_path)?;
        let listener = UnixListener::bind(guard.path()).map_err(|e| {
            SimError::Socket(format!(
                "Failed to bind {}: {}",
                self.socket_path.display(),
                e
            ))
        })?;

        info!(
            "Emitter listening on {} (interval={}s)",
            self.socket_path.display(),
            self.interval.as_secs()
        );

        loop {
            let stream = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, _addr)) => stream,
                    Err(e) => {
                        warn!("Accept failed: {}", e);
                        continue;
                    }
                },
                _ = Self::stopped(&self.running) => break,
            };

            info!("Peer connected");
            self.serve_peer(stream).await;
        }

        info!("Emitter stopped");
        drop(guard);
        Ok(())
    }

    /// Stream the event line to one peer until it disconnects or the
    /// emitter is stopped. The first line goes out immediately on accept.
    async fn serve_peer(&self, mut stream: UnixStream) {
        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = Self::stopped(&self.running) => return,
            }

            if let Err(e) = stream.write_all(self.line.as_bytes()).await {
                info!("Peer disconnected: {}", e);
                return;
            }
            debug!("Sent {} bytes", self.line.len());
        }
    }

    /// Signal the serve loop to exit. The current peer session ends at the
    /// next tick and the accept loop unwinds.
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }

    /// Returns whether the serve loop is active.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Resolves once the running flag has been cleared.
    async fn stopped(running: &RwLock<bool>) {
        loop {
            if !*running.read().await {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emitter_not_running_initially() {
        let emitter = EventEmitter::new(&Config::default());
        assert!(!emitter.is_running().await);
    }

    #[tokio::test]
    async fn test_line_is_default_literal() {
        let emitter = EventEmitter::new(&Config::default());
        assert_eq!(
            emitter.line(),
            "16:TDRawDeviceEvent93:class:command;protocol:arctech;\
             model:selflearning;house:902538;unit:4;group:0;method:turnoff;i1s\n"
        );
    }

    #[tokio::test]
    async fn test_run_rejects_unwritable_path() {
        let config = Config {
            socket_path: PathBuf::from("/proc/telldus-sim-test/events.sock"),
            ..Config::default()
        };
        let emitter = EventEmitter::new(&config);
        assert!(emitter.run().await.is_err());
    }
}
