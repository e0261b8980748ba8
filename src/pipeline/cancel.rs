//! Cancellation signalling for pipeline stages.
//!
//! A `CancelHandle`/`CancelSignal` pair links the supervisor to one stage.
//! Cancellation is level-triggered (the flag stays set) and also delivered
//! through a channel so a stage blocked in `select!` wakes immediately.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Creates a linked cancel handle/signal pair.
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let fired = Arc::new(AtomicBool::new(false));
    let (tx, rx) = bounded(1);
    (
        CancelHandle {
            fired: fired.clone(),
            tx: tx.clone(),
        },
        // The signal keeps a sender so the channel never disconnects:
        // dropping every handle must not read as a cancellation.
        CancelSignal {
            fired,
            rx,
            _keep: tx,
        },
    )
}

/// Requests cancellation of one stage. Held by the supervisor.
#[derive(Clone)]
pub struct CancelHandle {
    fired: Arc<AtomicBool>,
    tx: Sender<()>,
}

impl CancelHandle {
    /// Requests cancellation. Idempotent: only the first call delivers the
    /// wake-up, repeated calls are no-ops.
    pub fn cancel(&self) {
        if !self.fired.swap(true, Ordering::SeqCst) && self.tx.send(()).is_err() {
            // Stage already exited; nothing to wake.
        }
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

/// Observed by the stage being cancelled.
#[derive(Clone)]
pub struct CancelSignal {
    fired: Arc<AtomicBool>,
    rx: Receiver<()>,
    _keep: Sender<()>,
}

impl CancelSignal {
    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Channel handle for cancellable waits via `select!`.
    pub(crate) fn channel(&self) -> &Receiver<()> {
        &self.rx
    }
}
