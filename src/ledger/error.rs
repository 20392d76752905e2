use thiserror::Error;

use crate::currency::Currency;

/// Errors produced by the ledger store and the transfer orchestrator
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account [{0}] not found")]
    AccountNotFound(i64),

    #[error("entry [{0}] not found")]
    EntryNotFound(i64),

    #[error("transfer [{0}] not found")]
    TransferNotFound(i64),

    #[error("user [{0}] not found")]
    UserNotFound(String),

    #[error("account [{id}] currency mismatch: {actual} vs {expected}")]
    CurrencyMismatch {
        id: i64,
        actual: String,
        expected: Currency,
    },

    /// The caller abandoned the operation (timeout or disconnect). The open
    /// transaction is rolled back before this is returned.
    #[error("operation cancelled before commit")]
    Cancelled,

    /// A failed transaction body whose rollback also failed. Carries both
    /// errors so callers can tell a dirty unwind from a clean one.
    #[error("rollback failed: {rollback} (original error: {cause})")]
    RollbackFailed {
        cause: Box<StoreError>,
        rollback: sqlx::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True for the not-found family of errors (maps to HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::AccountNotFound(_)
                | StoreError::EntryNotFound(_)
                | StoreError::TransferNotFound(_)
                | StoreError::UserNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rollback_failed_keeps_both_errors() {
        let cause = StoreError::AccountNotFound(7);
        let err = StoreError::RollbackFailed {
            cause: Box::new(cause),
            rollback: sqlx::Error::PoolClosed,
        };
        let msg = err.to_string();
        assert!(msg.contains("rollback failed"));
        assert!(msg.contains("account [7] not found"));
    }

    #[test]
    fn test_not_found_classification() {
        assert!(StoreError::AccountNotFound(1).is_not_found());
        assert!(StoreError::UserNotFound("bob".into()).is_not_found());
        assert!(!StoreError::Cancelled.is_not_found());
        assert!(
            !StoreError::CurrencyMismatch {
                id: 1,
                actual: "USD".into(),
                expected: Currency::Eur,
            }
            .is_not_found()
        );
    }
}
