//! Socket file management for single-instance enforcement.
//!
//! A crashed emitter leaves its socket special file behind, and a fresh bind
//! would fail with address-in-use. This module removes such stale files at
//! startup and cleans up the live one on shutdown. Before removing anything
//! it probes the path with a connect: if something answers, another emitter
//! owns the socket and we refuse to clobber it.

use std::fs;
use std::io;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, SimError};

/// Socket file guard that automatically cleans up on drop.
#[derive(Debug)]
pub struct SocketFileGuard {
    path: PathBuf,
}

impl SocketFileGuard {
    /// Claim the socket path, removing a stale file if one is present.
    ///
    /// Returns an error if a live emitter is already listening at the path.
    /// A missing file is not an error.
    pub fn acquire(path: &Path) -> Result<Self> {
        if path.exists() {
            if is_socket_live(path) {
                return Err(SimError::Config(format!(
                    "Emitter already running at {}. \
                     If this is incorrect, remove the file and try again.",
                    path.display()
                )));
            }
            warn!(
                "Found stale socket file at {}. Cleaning up.",
                path.display()
            );
            let _ = fs::remove_file(path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SimError::Socket(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Get the guarded socket path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Drop for SocketFileGuard {
    fn drop(&mut self) {
        // Best effort cleanup - don't panic on failure
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Failed to remove socket file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Check whether something is accepting connections at the given path.
///
/// A successful connect means a live listener owns the socket. Connection
/// refused (or any other failure) means the file is a stale leftover.
fn is_socket_live(path: &Path) -> bool {
    UnixStream::connect(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn unique_socket_path() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "telldus_sim_test_{}_{}.sock",
            std::process::id(),
            id
        ))
    }

    #[test]
    fn test_acquire_on_missing_file() {
        let path = unique_socket_path();
        let guard = SocketFileGuard::acquire(&path).unwrap();
        assert_eq!(guard.path(), &path);
    }

    #[test]
    fn test_acquire_removes_stale_file() {
        let path = unique_socket_path();
        // A bound-then-dropped listener leaves a dead socket file behind
        drop(UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let _guard = SocketFileGuard::acquire(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_acquire_rejects_live_listener() {
        let path = unique_socket_path();
        let _listener = UnixListener::bind(&path).unwrap();

        let result = SocketFileGuard::acquire(&path);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("already running"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_guard_cleanup_on_drop() {
        let path = unique_socket_path();
        {
            let _guard = SocketFileGuard::acquire(&path).unwrap();
            drop(UnixListener::bind(&path).unwrap());
            assert!(path.exists());
        }
        assert!(!path.exists());
    }
}
