//! Dealer domain types.

use chrono::{DateTime, Utc};

use carstock_core::{DealerId, Email};

/// A registered dealer (domain type).
///
/// Created on registration; never mutated or deleted by the service.
#[derive(Debug, Clone)]
pub struct Dealer {
    /// Unique dealer ID.
    pub id: DealerId,
    /// Dealer display name.
    pub name: String,
    /// Dealer's email address (unique, case-sensitive as stored).
    pub email: Email,
    /// Argon2 PHC-format password hash. Never the raw password.
    pub password_hash: String,
    /// When the dealer registered.
    pub created_at: DateTime<Utc>,
}
