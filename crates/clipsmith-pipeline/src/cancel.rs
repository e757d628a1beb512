//! Batch-granular cancellation.

use std::sync::Arc;

use tokio::sync::watch;

/// Cancellation handle shared between the generator and its caller.
///
/// Cancellation stops the batch from starting the *next* clip; a
/// transcoder invocation already in flight runs to completion or failure.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelHandle {
    /// Create a new, uncancelled handle.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Receiver for components that poll the signal (e.g. the runner).
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
