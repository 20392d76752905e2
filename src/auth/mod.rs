//! User authentication: password hashing, access tokens, request middleware

pub mod middleware;
pub mod password;
pub mod token;

pub use password::{PasswordError, hash_password, verify_password};
pub use token::{Claims, MIN_SECRET_LEN, TokenError, TokenMaker};
