//! Ironbank - a small ledger backend
//!
//! Accounts, users, and money transfers over PostgreSQL. The heart of the
//! crate is the transfer orchestrator: one database transaction writes the
//! transfer record, both double-entry rows, and both balance deltas, applying
//! the deltas in a fixed account-id order so concurrent opposite-direction
//! transfers can never deadlock.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration loading
//! - [`logging`] - tracing subscriber setup
//! - [`currency`] - supported-currency allow-list
//! - [`ledger`] - record store, transaction executor, transfer orchestrator
//! - [`auth`] - password hashing, JWT tokens, request middleware
//! - [`gateway`] - axum HTTP server

pub mod auth;
pub mod config;
pub mod currency;
pub mod gateway;
pub mod ledger;
pub mod logging;

// Convenient re-exports at crate root
pub use currency::Currency;
pub use ledger::{Account, Entry, Store, StoreError, Transfer, TransferParams, TransferResult};
