//! Bounded hand-off queue between the producer and consumer stages.
//!
//! Capacity is fixed at construction (default 1): the consumer always works
//! on the newest admitted frame instead of a growing backlog. `offer` never
//! blocks; a full queue is the backpressure signal the producer resolves by
//! dropping the incoming frame. The end-of-stream marker is enqueued at
//! most once and is always the last entry, enforced by `finish` consuming
//! the sender.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// An entry travelling through the queue: a value or the end-of-stream
/// marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<T> {
    /// A regular value.
    Item(T),
    /// No further values will be produced.
    End,
}

/// Outcome of a non-blocking `offer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// The item was enqueued.
    Enqueued,
    /// The queue is full. Backpressure signal, not an error.
    Full,
    /// The receiving side is gone; no further items will be accepted.
    Closed,
}

/// Creates a bounded hand-off queue, returning the two halves.
pub fn handoff<T>(capacity: usize) -> (HandoffSender<T>, HandoffReceiver<T>) {
    let (tx, rx) = bounded(capacity);
    (HandoffSender { tx }, HandoffReceiver { rx })
}

/// Producing half of the hand-off queue.
pub struct HandoffSender<T> {
    tx: Sender<Entry<T>>,
}

impl<T> HandoffSender<T> {
    /// Non-blocking enqueue attempt.
    pub fn offer(&self, item: T) -> Offer {
        match self.tx.try_send(Entry::Item(item)) {
            Ok(()) => Offer::Enqueued,
            Err(TrySendError::Full(_)) => Offer::Full,
            Err(TrySendError::Disconnected(_)) => Offer::Closed,
        }
    }

    /// Enqueues the end-of-stream marker and consumes the sender.
    ///
    /// Blocks until there is room for the marker, so it lands after every
    /// admitted item. A send failure means the receiving side is already
    /// gone; that is ignored because teardown has happened through another
    /// path.
    pub fn finish(self) {
        if self.tx.send(Entry::End).is_err() {
            log::debug!("end marker discarded: consumer already gone");
        }
    }
}

/// Consuming half of the hand-off queue.
pub struct HandoffReceiver<T> {
    rx: Receiver<Entry<T>>,
}

impl<T> HandoffReceiver<T> {
    /// Blocks until the next entry is available, FIFO.
    ///
    /// A disconnected sender is reported as `Entry::End`: either way the
    /// producer is gone and no further values will arrive.
    pub fn take(&self) -> Entry<T> {
        self.rx.recv().unwrap_or(Entry::End)
    }

    /// Channel handle for cancellable waits via `select!`.
    pub(crate) fn channel(&self) -> &Receiver<Entry<T>> {
        &self.rx
    }
}
