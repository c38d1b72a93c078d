//! Database operations for the car stock service (`SQLite`).
//!
//! ## Tables
//!
//! - `dealer` - Registered dealers and their password hashes
//! - `car` - Catalog entries, scoped to an owning dealer
//!
//! The schema is bootstrapped at startup via [`init_schema`]; both tables use
//! `CREATE TABLE IF NOT EXISTS` so restarts are idempotent. Uniqueness of the
//! dealer email and of the car natural key is enforced at the store as a
//! backstop for the service-layer checks; violations surface as
//! [`RepositoryError::Conflict`].
//!
//! Store access goes through the [`DealerStore`] and [`CarStore`] traits so
//! services can be exercised against the in-memory implementations in tests.

pub mod memory;
pub mod sqlite;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

use carstock_core::{CarId, DealerId, Email};

use crate::models::{Car, Dealer, NewCar};

pub use memory::{MemoryCarStore, MemoryDealerStore};
pub use sqlite::{SqliteCarStore, SqliteDealerStore};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email or natural key).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations for dealer identity records.
#[async_trait]
pub trait DealerStore: Send + Sync {
    /// Look up a dealer by email. Emails are matched exactly (case-sensitive).
    async fn get_by_email(&self, email: &Email) -> Result<Option<Dealer>, RepositoryError>;

    /// Insert a new dealer and return it with its store-assigned id.
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Dealer, RepositoryError>;
}

/// Persistence operations for catalog entries.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Look up a car by id, regardless of owner.
    async fn get_by_id(&self, id: CarId) -> Result<Option<Car>, RepositoryError>;

    /// Look up a car by its natural key `(make, model, year, color, dealer_id)`.
    async fn get_by_details(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: &str,
        year: i64,
        color: &str,
    ) -> Result<Option<Car>, RepositoryError>;

    /// Insert a new car owned by `dealer_id` and return it with its id.
    ///
    /// Returns `RepositoryError::Conflict` if the natural key already exists
    /// for this dealer.
    async fn insert(&self, dealer_id: DealerId, car: &NewCar) -> Result<Car, RepositoryError>;

    /// Delete a car by id.
    ///
    /// Returns `true` if a row was deleted, `false` if it didn't exist.
    async fn delete(&self, id: CarId) -> Result<bool, RepositoryError>;

    /// Replace the stock of a car, guarded by its owning dealer.
    ///
    /// Returns `RepositoryError::NotFound` if no row matched the
    /// `(id, dealer_id)` pair.
    async fn update_stock(
        &self,
        id: CarId,
        dealer_id: DealerId,
        stock: i64,
    ) -> Result<(), RepositoryError>;

    /// All cars owned by `dealer_id`, in store-defined order.
    async fn list_by_dealer(&self, dealer_id: DealerId) -> Result<Vec<Car>, RepositoryError>;

    /// Cars owned by `dealer_id` matching `make` exactly, and `model` exactly
    /// when present.
    async fn search(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: Option<&str>,
    ) -> Result<Vec<Car>, RepositoryError>;
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &secrecy::SecretString,
) -> Result<SqlitePool, sqlx::Error> {
    let options = database_url
        .expose_secret()
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Bootstrap the schema. Idempotent; runs at startup.
///
/// # Errors
///
/// Returns `sqlx::Error` if a statement fails.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS dealer (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS car (
            id INTEGER PRIMARY KEY,
            make TEXT NOT NULL,
            model TEXT NOT NULL,
            year INTEGER NOT NULL,
            color TEXT NOT NULL,
            stock INTEGER NOT NULL,
            dealer_id INTEGER NOT NULL REFERENCES dealer(id),
            created_at TEXT NOT NULL,
            UNIQUE (make, model, year, color, dealer_id)
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
