//! Application state shared across handlers

use std::sync::Arc;

use common::RealtimeStore;

use crate::auth::{AuthProvider, InMemoryAccounts, UserDirectory};
use crate::likes::LikeLedger;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: LikeLedger,
    pub directory: Arc<dyn UserDirectory>,
    pub provider: Arc<dyn AuthProvider>,
}

impl AppState {
    /// State backed by `store` with process-local accounts
    pub fn with_in_memory_accounts(store: Arc<dyn RealtimeStore>) -> Self {
        let accounts = Arc::new(InMemoryAccounts::new());
        Self {
            ledger: LikeLedger::new(store),
            directory: accounts.clone(),
            provider: accounts,
        }
    }
}
