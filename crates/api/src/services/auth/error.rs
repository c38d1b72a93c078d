//! Authentication error types.
//!
//! The `Display` impls of the domain variants are the caller-safe outcome
//! messages; they never carry internal detail.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Name missing on registration.
    #[error("Name is required.")]
    EmptyName,

    /// Invalid email format.
    #[error("Invalid email format.")]
    InvalidEmail(#[from] carstock_core::EmailError),

    /// Password too short.
    #[error("Password must be at least 6 characters long.")]
    WeakPassword,

    /// Email is already registered.
    #[error("Email already exists")]
    EmailExists,

    /// Invalid credentials (unknown email or wrong password; deliberately
    /// indistinguishable).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token issuance error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
