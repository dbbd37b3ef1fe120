//! Shutdown coordination for the service.

use std::sync::OnceLock;

use tokio::sync::broadcast;

/// Process exit code for a clean stop (server closed successfully).
pub const CLEAN_STOP: i32 = 0;

/// Process exit code when a lifecycle error was reported.
pub const LIFECYCLE_ERROR: i32 = 1;

/// Process exit code when the server failed to close during stop.
pub const CLOSE_FAILURE: i32 = 2;

/// Coordinator for process exit.
///
/// Lifecycle handlers request an exit code here; the binary's main loop
/// observes the request and performs the actual exit. The first requested
/// code wins, so a teardown failure keeps its distinct code even when the
/// subsequent error report also requests termination.
pub struct Shutdown {
    /// Broadcast channel carrying the requested exit code.
    tx: broadcast::Sender<i32>,

    /// First requested code, set once.
    code: OnceLock<i32>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            tx,
            code: OnceLock::new(),
        }
    }

    /// Subscribe to exit requests.
    pub fn subscribe(&self) -> broadcast::Receiver<i32> {
        self.tx.subscribe()
    }

    /// Request process exit with the given code.
    ///
    /// Only the first request takes effect; later requests are ignored.
    pub fn request(&self, code: i32) {
        if self.code.set(code).is_ok() {
            let _ = self.tx.send(code);
        }
    }

    /// The requested exit code, if any exit has been requested.
    pub fn requested(&self) -> Option<i32> {
        self.code.get().copied()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_requested_code_wins() {
        let shutdown = Shutdown::new();
        assert_eq!(shutdown.requested(), None);

        shutdown.request(CLOSE_FAILURE);
        shutdown.request(LIFECYCLE_ERROR);

        assert_eq!(shutdown.requested(), Some(CLOSE_FAILURE));
    }

    #[tokio::test]
    async fn subscribers_observe_the_requested_code() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        shutdown.request(CLEAN_STOP);

        assert_eq!(rx.recv().await.unwrap(), CLEAN_STOP);
    }
}
