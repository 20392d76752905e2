use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenMaker;
use crate::ledger::{Database, Store};

/// Shared gateway state
pub struct AppState {
    /// Ledger store (pool-bound)
    pub store: Store,
    /// Raw database handle, kept for health checks
    pub db: Arc<Database>,
    /// Access-token issuer/verifier
    pub token_maker: TokenMaker,
    /// Lifetime of issued access tokens
    pub token_duration: chrono::Duration,
    /// Upper bound for a single transfer, commit included
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        token_maker: TokenMaker,
        token_duration: chrono::Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            store: Store::new(db.pool().clone()),
            db,
            token_maker,
            token_duration,
            request_timeout,
        }
    }
}
