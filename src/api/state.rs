//! Application state for the ledger API.

use std::sync::Arc;

use crate::store::LedgerStore;

/// Shared application state.
///
/// Holds the one ledger backend selected at startup; every handler works
/// through it.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<dyn LedgerStore>,
}

impl AppState {
    /// Creates a state serving `ledger`.
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// The ledger backend.
    pub fn ledger(&self) -> &dyn LedgerStore {
        self.ledger.as_ref()
    }
}
