use crate::engine::Evaluation;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Identifies one evaluation request within a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Holds the most recent published evaluation and guards it against late arrivals.
///
/// Each new evaluation takes a ticket with [`Session::begin`]. Only the holder of the latest
/// ticket may publish, so an evaluation that finishes after a newer one was started is dropped
/// instead of overwriting fresher state. In-flight work is never cancelled.
#[derive(Debug, Default)]
pub struct Session {
    latest: AtomicU64,
    current: Mutex<Option<Arc<Evaluation>>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new evaluation, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Store `evaluation` if `ticket` is still the latest one.
    ///
    /// Returns the stored evaluation, or `None` if the ticket was superseded.
    pub fn publish(&self, ticket: Ticket, evaluation: Evaluation) -> Option<Arc<Evaluation>> {
        let mut current = self.current.lock().expect("lock poisoned");

        // Checked under the lock so a superseded publisher cannot race past a newer one.
        if !self.is_current(ticket) {
            return None;
        }

        let evaluation = Arc::new(evaluation);
        *current = Some(Arc::clone(&evaluation));
        Some(evaluation)
    }

    /// The last published evaluation.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Evaluation>> {
        self.current.lock().expect("lock poisoned").clone()
    }
}
