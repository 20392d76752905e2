//! Ledger record store
//!
//! Durable storage for accounts, entries, and transfers, plus the
//! transaction executor and the transfer orchestrator that drive it.

pub mod db;
pub mod error;
pub mod models;
pub mod queries;
pub mod store;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testutil;

pub use db::Database;
pub use error::StoreError;
pub use models::{Account, Entry, Transfer, User};
pub use queries::CreateUserParams;
pub use store::Store;
pub use transfer::{TransferParams, TransferResult};
