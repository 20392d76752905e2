//! Ledger store facade and transaction executor
//!
//! [`Store`] binds the row operations in [`queries`](super::queries) to the
//! connection pool, and [`Store::run_atomic`] rebinds them to a single
//! database transaction: the body either commits as a whole or leaves no
//! trace. All cross-request coordination is delegated to PostgreSQL row
//! locks; the store holds no in-process locks across await points.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};

use super::error::StoreError;
use super::models::{Account, Entry, Transfer, User};
use super::queries::{self, CreateUserParams};
use crate::currency::Currency;

/// Shared handle to the ledger store. Cheap to clone (clones the pool handle).
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `body` inside one database transaction.
    ///
    /// The closure receives the transaction's connection; every query it runs
    /// through that handle is part of the same atomic unit. On `Ok` the unit
    /// commits; on `Err` it rolls back and the body's error is returned
    /// unchanged. If the rollback itself fails, both errors are returned
    /// together as [`StoreError::RollbackFailed`].
    ///
    /// The transaction can never outlive this call: if the returned future is
    /// dropped mid-body (caller timeout), the transaction is rolled back when
    /// the connection returns to the pool.
    pub async fn run_atomic<T, F>(&self, body: F) -> Result<T, StoreError>
    where
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, Result<T, StoreError>>,
    {
        let mut tx = self.pool.begin().await?;

        match body(&mut *tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(cause) => match tx.rollback().await {
                Ok(()) => Err(cause),
                Err(rollback) => Err(StoreError::RollbackFailed {
                    cause: Box::new(cause),
                    rollback,
                }),
            },
        }
    }

    /// Check that an account exists and carries the expected currency.
    ///
    /// This is a plain, non-locking read meant to run before a transfer's
    /// transaction opens. Currency is immutable after account creation, so
    /// the gap between this check and the transfer's row locks is benign.
    pub async fn validate_account(
        &self,
        id: i64,
        currency: Currency,
    ) -> Result<Account, StoreError> {
        let account = queries::get_account(&self.pool, id).await?;
        if account.currency != currency.as_str() {
            return Err(StoreError::CurrencyMismatch {
                id,
                actual: account.currency,
                expected: currency,
            });
        }
        Ok(account)
    }

    // Pool-bound row operations

    pub async fn get_account(&self, id: i64) -> Result<Account, StoreError> {
        queries::get_account(&self.pool, id).await
    }

    pub async fn create_account(
        &self,
        owner: &str,
        currency: Currency,
    ) -> Result<Account, StoreError> {
        queries::create_account(&self.pool, owner, currency).await
    }

    pub async fn list_accounts(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, StoreError> {
        queries::list_accounts(&self.pool, owner, limit, offset).await
    }

    pub async fn get_entry(&self, id: i64) -> Result<Entry, StoreError> {
        queries::get_entry(&self.pool, id).await
    }

    pub async fn get_transfer(&self, id: i64) -> Result<Transfer, StoreError> {
        queries::get_transfer(&self.pool, id).await
    }

    pub async fn create_user(&self, params: &CreateUserParams) -> Result<User, StoreError> {
        queries::create_user(&self.pool, params).await
    }

    pub async fn get_user(&self, username: &str) -> Result<User, StoreError> {
        queries::get_user(&self.pool, username).await
    }
}
