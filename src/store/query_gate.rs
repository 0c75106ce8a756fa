//! Discarding superseded query results.
//!
//! Remote queries can complete out of order. A caller issues a
//! [`QueryTicket`] before each query and publishes the response through
//! [`LatestResult::accept`]; a response whose ticket has been superseded by a
//! newer one is dropped, so stale data never overwrites fresher data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

/// Generation counter shared by the tickets it issues.
#[derive(Debug, Clone, Default)]
pub struct QueryGate {
    latest: Arc<AtomicU64>,
}

/// Proof of issue order for one query.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl QueryGate {
    /// A gate that has issued no tickets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket, superseding every ticket issued before it.
    pub fn issue(&self) -> QueryTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        QueryTicket {
            generation,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersedes every outstanding ticket without issuing a new query.
    pub fn cancel_all(&self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
    }
}

impl QueryTicket {
    /// This ticket's position in issue order, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while no newer ticket has been issued by the same gate.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Holds the result of the most recent query that was still current when it
/// completed.
///
/// # Example
///
/// ```
/// use leave_ledger::store::{LatestResult, QueryGate};
///
/// let gate = QueryGate::new();
/// let mut view = LatestResult::new();
///
/// let query_a = gate.issue();
/// let query_b = gate.issue();
///
/// assert!(view.accept(&query_b, "result of B"));
/// // A completes late and is discarded.
/// assert!(!view.accept(&query_a, "result of A"));
/// assert_eq!(view.get(), Some(&"result of B"));
/// ```
#[derive(Debug, Clone)]
pub struct LatestResult<T> {
    value: Option<T>,
    generation: u64,
}

impl<T> Default for LatestResult<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

impl<T> LatestResult<T> {
    /// Empty holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` if `ticket` is still current. Returns whether it was stored.
    pub fn accept(&mut self, ticket: &QueryTicket, value: T) -> bool {
        if !ticket.is_current() || ticket.generation < self.generation {
            debug!(
                generation = ticket.generation,
                "discarding superseded query result"
            );
            return false;
        }
        self.generation = ticket.generation;
        self.value = Some(value);
        true
    }

    /// The accepted value, if any.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Takes the accepted value out of the holder.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}
