//! Row-level operations for the ledger store
//!
//! Every function is generic over [`sqlx::PgExecutor`], so the same operation
//! runs in two bindings with identical contracts: against the root pool (plain
//! reads and standalone writes) or against the connection of an open
//! transaction inside [`Store::run_atomic`](super::Store::run_atomic), where
//! effects stay invisible until commit.

use sqlx::PgExecutor;

use super::error::StoreError;
use super::models::{Account, Entry, Transfer, User};
use crate::currency::Currency;

/// Parameters for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub hashed_password: String,
    pub full_name: String,
    pub email: String,
}

/// Get account by ID
pub async fn get_account(db: impl PgExecutor<'_>, id: i64) -> Result<Account, StoreError> {
    sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::AccountNotFound(id))
}

/// Get account by ID, taking its row lock for the rest of the transaction.
/// Only meaningful inside an open transaction.
pub async fn get_account_for_update(
    db: impl PgExecutor<'_>,
    id: i64,
) -> Result<Account, StoreError> {
    sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE id = $1
           FOR NO KEY UPDATE"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::AccountNotFound(id))
}

/// Create an account with a zero balance
pub async fn create_account(
    db: impl PgExecutor<'_>,
    owner: &str,
    currency: Currency,
) -> Result<Account, StoreError> {
    let account = sqlx::query_as::<_, Account>(
        r#"INSERT INTO accounts (owner, balance, currency)
           VALUES ($1, 0, $2)
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(owner)
    .bind(currency.as_str())
    .fetch_one(db)
    .await?;

    Ok(account)
}

/// List an owner's accounts, newest id first
pub async fn list_accounts(
    db: impl PgExecutor<'_>,
    owner: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<Account>, StoreError> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"SELECT id, owner, balance, currency, created_at
           FROM accounts WHERE owner = $1
           ORDER BY id
           LIMIT $2 OFFSET $3"#,
    )
    .bind(owner)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    Ok(accounts)
}

/// Atomically apply `balance += delta` and return the updated row.
///
/// This is a single conditional UPDATE so concurrent callers can never lose
/// each other's deltas; the row lock it takes is the serialization point for
/// competing transfers.
pub async fn add_account_balance(
    db: impl PgExecutor<'_>,
    id: i64,
    delta: i64,
) -> Result<Account, StoreError> {
    sqlx::query_as::<_, Account>(
        r#"UPDATE accounts
           SET balance = balance + $1
           WHERE id = $2
           RETURNING id, owner, balance, currency, created_at"#,
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::AccountNotFound(id))
}

/// Append a ledger entry for an account
pub async fn create_entry(
    db: impl PgExecutor<'_>,
    account_id: i64,
    amount: i64,
) -> Result<Entry, StoreError> {
    let entry = sqlx::query_as::<_, Entry>(
        r#"INSERT INTO entries (account_id, amount)
           VALUES ($1, $2)
           RETURNING id, account_id, amount, created_at"#,
    )
    .bind(account_id)
    .bind(amount)
    .fetch_one(db)
    .await?;

    Ok(entry)
}

/// Get entry by ID
pub async fn get_entry(db: impl PgExecutor<'_>, id: i64) -> Result<Entry, StoreError> {
    sqlx::query_as::<_, Entry>(
        r#"SELECT id, account_id, amount, created_at
           FROM entries WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::EntryNotFound(id))
}

/// Record a transfer between two accounts
pub async fn create_transfer(
    db: impl PgExecutor<'_>,
    from_account_id: i64,
    to_account_id: i64,
    amount: i64,
) -> Result<Transfer, StoreError> {
    let transfer = sqlx::query_as::<_, Transfer>(
        r#"INSERT INTO transfers (from_account_id, to_account_id, amount)
           VALUES ($1, $2, $3)
           RETURNING id, from_account_id, to_account_id, amount, created_at"#,
    )
    .bind(from_account_id)
    .bind(to_account_id)
    .bind(amount)
    .fetch_one(db)
    .await?;

    Ok(transfer)
}

/// Get transfer by ID
pub async fn get_transfer(db: impl PgExecutor<'_>, id: i64) -> Result<Transfer, StoreError> {
    sqlx::query_as::<_, Transfer>(
        r#"SELECT id, from_account_id, to_account_id, amount, created_at
           FROM transfers WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?
    .ok_or(StoreError::TransferNotFound(id))
}

/// Create a new user
pub async fn create_user(
    db: impl PgExecutor<'_>,
    params: &CreateUserParams,
) -> Result<User, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"INSERT INTO users (username, hashed_password, full_name, email)
           VALUES ($1, $2, $3, $4)
           RETURNING username, hashed_password, full_name, email, password_changed_at, created_at"#,
    )
    .bind(&params.username)
    .bind(&params.hashed_password)
    .bind(&params.full_name)
    .bind(&params.email)
    .fetch_one(db)
    .await?;

    Ok(user)
}

/// Get user by username
pub async fn get_user(db: impl PgExecutor<'_>, username: &str) -> Result<User, StoreError> {
    sqlx::query_as::<_, User>(
        r#"SELECT username, hashed_password, full_name, email, password_changed_at, created_at
           FROM users WHERE username = $1"#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| StoreError::UserNotFound(username.to_string()))
}
