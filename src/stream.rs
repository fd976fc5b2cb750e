//! Two-channel result delivery for concurrent query execution.
//!
//! Each query runs its search on a dedicated worker thread and talks to
//! the consumer through two independent channels: a bounded results
//! channel carrying each binding set in discovery order, and an error
//! channel carrying at most one runtime error. Neither channel pushes an
//! explicit "end" value; channel closure is the completion signal. An
//! error channel that closes without a value means the query finished
//! cleanly, so a consumer can drain partial results and still tell a
//! clean exhaustion from a failed search.
//!
//! The results channel is bounded: a slow consumer blocks the search
//! rather than growing an unbounded buffer during deep searches.
//! Dropping the `Query` disconnects both receivers and raises the
//! session's cancellation flag, so the worker stops within one step even
//! when it has produced nothing to send yet.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use tracing::trace;

use crate::ast::{Goal, RuleSet};
use crate::error::RuntimeError;
use crate::host::HostRegistry;
use crate::solver::{Session, SolveEvent};
use crate::term::Bindings;

/// Capacity of the results channel; the backpressure bound.
pub const RESULT_CHANNEL_CAPACITY: usize = 64;

/// A live query: two independently consumable channels.
pub struct Query {
    /// One `Bindings` per solution, in resolution order. Closes after
    /// the last solution.
    pub results: Receiver<Bindings>,
    /// At most one runtime error, then closes. Closing with no value is
    /// the success signal.
    pub error: Receiver<RuntimeError>,
    cancel: Arc<AtomicBool>,
}

impl Query {
    /// Drain all results, then report the query's terminal state.
    ///
    /// Returns the ordered solutions on clean exhaustion, or the runtime
    /// error if one occurred (regardless of how many solutions preceded
    /// it).
    pub fn collect(&self) -> Result<Vec<Bindings>, RuntimeError> {
        let solutions: Vec<Bindings> = self.results.iter().collect();
        match self.error.try_recv() {
            Ok(error) => Err(error),
            Err(_) => Ok(solutions),
        }
    }
}

impl Drop for Query {
    fn drop(&mut self) {
        // Abandonment is silent; the worker observes the flag (or the
        // disconnected channel) and exits.
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Spawn the worker thread for one query session.
pub(crate) fn spawn_query(rules: Arc<RuleSet>, host: Arc<HostRegistry>, goal: Goal) -> Query {
    let (result_tx, results) = mpsc::sync_channel(RESULT_CHANNEL_CAPACITY);
    let (error_tx, error) = mpsc::sync_channel(1);
    let cancel = Arc::new(AtomicBool::new(false));

    let mut session = Session::with_cancel(rules, host, goal, Arc::clone(&cancel));
    thread::spawn(move || {
        loop {
            match session.advance() {
                SolveEvent::Solution(bindings) => {
                    if result_tx.send(bindings).is_err() {
                        trace!("consumer disconnected, abandoning query");
                        break;
                    }
                }
                SolveEvent::Exhausted => break,
                SolveEvent::Fault(fault) => {
                    // Sent before the senders drop, so the error is
                    // already buffered when the results channel closes.
                    let _ = error_tx.send(fault);
                    break;
                }
            }
        }
        // Both senders drop here, closing the channels.
    });

    Query {
        results,
        error,
        cancel,
    }
}
