//! Inventory error types.
//!
//! The `Display` impls of the domain variants are the caller-safe outcome
//! messages. Absence and ownership mismatch share one message per operation
//! so callers cannot probe for cars that belong to other dealers.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A car with the same natural key already exists for this dealer.
    #[error("Car already exists for this dealer")]
    DuplicateCar,

    /// The car does not exist, or it belongs to another dealer.
    #[error("Car not found or you do not have permission to delete this car")]
    RemoveDenied,

    /// The car does not exist, or it belongs to another dealer.
    #[error("Car not found or you do not have permission to update this car")]
    UpdateDenied,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
