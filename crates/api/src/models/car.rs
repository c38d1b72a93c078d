//! Car domain types.

use chrono::{DateTime, Utc};

use carstock_core::{CarId, DealerId};

/// A car in a dealer's catalog (domain type).
///
/// The natural key for duplicate detection is
/// `(make, model, year, color, dealer_id)`. `stock` is the only field that
/// may change after creation; `dealer_id` is immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    /// Unique car ID.
    pub id: CarId,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    /// Units in stock. Non-negative.
    pub stock: i64,
    /// Owning dealer. All reads and mutations are scoped to this dealer.
    pub dealer_id: DealerId,
    /// When the car was added to the catalog.
    pub created_at: DateTime<Utc>,
}

/// Details for a car about to be added to a catalog.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub stock: i64,
}
