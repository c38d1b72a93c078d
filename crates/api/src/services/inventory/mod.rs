//! Dealer-scoped inventory service.
//!
//! Enforces the two central invariants around catalog mutations:
//!
//! - a dealer can only read or mutate cars it owns (ownership is checked
//!   against the authenticated dealer id on every per-car operation), and
//! - no two cars with the same natural key `(make, model, year, color,
//!   dealer_id)` exist for one dealer.
//!
//! Mutations report store failures; `list_cars` and `search_cars` are
//! fail-soft and return an empty list instead. That asymmetry is deliberate
//! and load-bearing for callers.

mod error;

pub use error::InventoryError;

use std::sync::Arc;

use carstock_core::{CarId, DealerId};

use crate::db::{CarStore, RepositoryError};
use crate::models::{Car, NewCar};

/// Dealer-scoped inventory service.
pub struct InventoryService {
    cars: Arc<dyn CarStore>,
}

impl InventoryService {
    /// Create a new inventory service.
    #[must_use]
    pub fn new(cars: Arc<dyn CarStore>) -> Self {
        Self { cars }
    }

    /// Add a car to the dealer's catalog.
    ///
    /// Performs no write when a car with the same natural key already exists
    /// for this dealer.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::DuplicateCar` on a natural-key duplicate and
    /// `InventoryError::Repository` if the store fails.
    pub async fn add_car(&self, dealer_id: DealerId, car: &NewCar) -> Result<Car, InventoryError> {
        let existing = self
            .cars
            .get_by_details(dealer_id, &car.make, &car.model, car.year, &car.color)
            .await
            .map_err(|e| store_error(dealer_id, "add_car", e))?;

        if existing.is_some() {
            tracing::warn!(
                dealer_id = %dealer_id,
                make = %car.make,
                model = %car.model,
                "attempt to add a duplicate car"
            );
            return Err(InventoryError::DuplicateCar);
        }

        let car = self
            .cars
            .insert(dealer_id, car)
            .await
            .map_err(|e| match e {
                // A concurrent identical add slipped past the check; same outcome.
                RepositoryError::Conflict(_) => InventoryError::DuplicateCar,
                other => store_error(dealer_id, "add_car", other),
            })?;

        tracing::info!(dealer_id = %dealer_id, car_id = %car.id, "car added");
        Ok(car)
    }

    /// Remove a car from the dealer's catalog.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::RemoveDenied` if the car does not exist or is
    /// owned by another dealer, and `InventoryError::Repository` if the store
    /// fails.
    pub async fn remove_car(&self, car_id: CarId, dealer_id: DealerId) -> Result<(), InventoryError> {
        let car = self
            .cars
            .get_by_id(car_id)
            .await
            .map_err(|e| store_error(dealer_id, "remove_car", e))?;

        match car {
            Some(car) if car.dealer_id == dealer_id => {}
            _ => {
                tracing::warn!(dealer_id = %dealer_id, car_id = %car_id, "remove denied");
                return Err(InventoryError::RemoveDenied);
            }
        }

        let deleted = self
            .cars
            .delete(car_id)
            .await
            .map_err(|e| store_error(dealer_id, "remove_car", e))?;
        if !deleted {
            // Vanished between check and delete.
            return Err(InventoryError::RemoveDenied);
        }

        tracing::info!(dealer_id = %dealer_id, car_id = %car_id, "car removed");
        Ok(())
    }

    /// Replace the stock of a car in the dealer's catalog.
    ///
    /// `new_stock` must be non-negative (validated upstream). The new value
    /// replaces the old one; there is no delta semantics.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::UpdateDenied` if the car does not exist or is
    /// owned by another dealer, and `InventoryError::Repository` if the store
    /// fails.
    pub async fn update_stock(
        &self,
        dealer_id: DealerId,
        car_id: CarId,
        new_stock: i64,
    ) -> Result<Car, InventoryError> {
        let car = self
            .cars
            .get_by_id(car_id)
            .await
            .map_err(|e| store_error(dealer_id, "update_stock", e))?;

        let mut car = match car {
            Some(car) if car.dealer_id == dealer_id => car,
            _ => {
                tracing::warn!(dealer_id = %dealer_id, car_id = %car_id, "stock update denied");
                return Err(InventoryError::UpdateDenied);
            }
        };

        self.cars
            .update_stock(car_id, dealer_id, new_stock)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => InventoryError::UpdateDenied,
                other => store_error(dealer_id, "update_stock", other),
            })?;

        car.stock = new_stock;
        tracing::info!(dealer_id = %dealer_id, car_id = %car_id, stock = new_stock, "stock updated");
        Ok(car)
    }

    /// All cars owned by the dealer, in store-defined order.
    ///
    /// Fail-soft: a store error is logged and an empty list returned.
    pub async fn list_cars(&self, dealer_id: DealerId) -> Vec<Car> {
        match self.cars.list_by_dealer(dealer_id).await {
            Ok(cars) => cars,
            Err(e) => {
                tracing::error!(dealer_id = %dealer_id, error = %e, "list_cars: store failed");
                Vec::new()
            }
        }
    }

    /// Cars owned by the dealer matching `make` exactly, narrowed by `model`
    /// when present.
    ///
    /// Fail-soft: a store error is logged and an empty list returned.
    pub async fn search_cars(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: Option<&str>,
    ) -> Vec<Car> {
        match self.cars.search(dealer_id, make, model).await {
            Ok(cars) => cars,
            Err(e) => {
                tracing::error!(dealer_id = %dealer_id, make, error = %e, "search_cars: store failed");
                Vec::new()
            }
        }
    }
}

fn store_error(dealer_id: DealerId, operation: &str, error: RepositoryError) -> InventoryError {
    tracing::error!(dealer_id = %dealer_id, operation, error = %error, "store operation failed");
    InventoryError::Repository(error)
}
