//! In-memory store implementations.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use chrono::Utc;

use carstock_core::{CarId, DealerId, Email};

use super::{CarStore, DealerStore, RepositoryError};
use crate::models::{Car, Dealer, NewCar};

/// In-memory dealer store.
#[derive(Debug, Default)]
pub struct MemoryDealerStore {
    dealers: RwLock<Vec<Dealer>>,
    next_id: AtomicI64,
}

impl MemoryDealerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DealerStore for MemoryDealerStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<Dealer>, RepositoryError> {
        let dealers = self
            .dealers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(dealers.iter().find(|d| &d.email == email).cloned())
    }

    async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Dealer, RepositoryError> {
        let mut dealers = self
            .dealers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if dealers.iter().any(|d| &d.email == email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let dealer = Dealer {
            id: DealerId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            name: name.to_owned(),
            email: email.clone(),
            password_hash: password_hash.to_owned(),
            created_at: Utc::now(),
        };
        dealers.push(dealer.clone());
        Ok(dealer)
    }
}

/// In-memory car store.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    cars: RwLock<Vec<Car>>,
    next_id: AtomicI64,
}

impl MemoryCarStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cars currently stored, across all dealers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl CarStore for MemoryCarStore {
    async fn get_by_id(&self, id: CarId) -> Result<Option<Car>, RepositoryError> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cars.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_details(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: &str,
        year: i64,
        color: &str,
    ) -> Result<Option<Car>, RepositoryError> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cars
            .iter()
            .find(|c| {
                c.dealer_id == dealer_id
                    && c.make == make
                    && c.model == model
                    && c.year == year
                    && c.color == color
            })
            .cloned())
    }

    async fn insert(&self, dealer_id: DealerId, car: &NewCar) -> Result<Car, RepositoryError> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);

        if cars.iter().any(|c| {
            c.dealer_id == dealer_id
                && c.make == car.make
                && c.model == car.model
                && c.year == car.year
                && c.color == car.color
        }) {
            return Err(RepositoryError::Conflict(
                "car natural key already exists for this dealer".to_owned(),
            ));
        }

        let car = Car {
            id: CarId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            make: car.make.clone(),
            model: car.model.clone(),
            year: car.year,
            color: car.color.clone(),
            stock: car.stock,
            dealer_id,
            created_at: Utc::now(),
        };
        cars.push(car.clone());
        Ok(car)
    }

    async fn delete(&self, id: CarId) -> Result<bool, RepositoryError> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);
        let before = cars.len();
        cars.retain(|c| c.id != id);
        Ok(cars.len() < before)
    }

    async fn update_stock(
        &self,
        id: CarId,
        dealer_id: DealerId,
        stock: i64,
    ) -> Result<(), RepositoryError> {
        let mut cars = self.cars.write().unwrap_or_else(PoisonError::into_inner);
        match cars
            .iter_mut()
            .find(|c| c.id == id && c.dealer_id == dealer_id)
        {
            Some(car) => {
                car.stock = stock;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn list_by_dealer(&self, dealer_id: DealerId) -> Result<Vec<Car>, RepositoryError> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cars
            .iter()
            .filter(|c| c.dealer_id == dealer_id)
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: Option<&str>,
    ) -> Result<Vec<Car>, RepositoryError> {
        let cars = self.cars.read().unwrap_or_else(PoisonError::into_inner);
        Ok(cars
            .iter()
            .filter(|c| {
                c.dealer_id == dealer_id
                    && c.make == make
                    && model.is_none_or(|m| c.model == m)
            })
            .cloned()
            .collect())
    }
}
