//! `SQLite` store implementations.
//!
//! Queries are runtime-checked with bound parameters; rows decode into
//! `FromRow` structs which convert to the domain types.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use carstock_core::{CarId, DealerId, Email};

use super::{CarStore, DealerStore, RepositoryError};
use crate::models::{Car, Dealer, NewCar};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for dealer queries.
#[derive(Debug, sqlx::FromRow)]
struct DealerRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<DealerRow> for Dealer {
    type Error = RepositoryError;

    fn try_from(row: DealerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: DealerId::new(row.id),
            name: row.name,
            email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for car queries.
#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: i64,
    make: String,
    model: String,
    year: i64,
    color: String,
    stock: i64,
    dealer_id: i64,
    created_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self {
            id: CarId::new(row.id),
            make: row.make,
            model: row.model,
            year: row.year,
            color: row.color,
            stock: row.stock,
            dealer_id: DealerId::new(row.dealer_id),
            created_at: row.created_at,
        }
    }
}

// =============================================================================
// Dealer Store
// =============================================================================

/// `SQLite`-backed dealer store.
#[derive(Debug, Clone)]
pub struct SqliteDealerStore {
    pool: SqlitePool,
}

impl SqliteDealerStore {
    /// Create a new dealer store over a pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DealerStore for SqliteDealerStore {
    async fn get_by_email(&self, email: &Email) -> Result<Option<Dealer>, RepositoryError> {
        let row = sqlx::query_as::<_, DealerRow>(
            r"
            SELECT id, name, email, password_hash, created_at
            FROM dealer
            WHERE email = ?
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Dealer::try_from).transpose()
    }

    async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Dealer, RepositoryError> {
        let row = sqlx::query_as::<_, DealerRow>(
            r"
            INSERT INTO dealer (name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, password_hash, created_at
            ",
        )
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Dealer::try_from(row)
    }
}

// =============================================================================
// Car Store
// =============================================================================

/// `SQLite`-backed car store.
#[derive(Debug, Clone)]
pub struct SqliteCarStore {
    pool: SqlitePool,
}

impl SqliteCarStore {
    /// Create a new car store over a pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CarStore for SqliteCarStore {
    async fn get_by_id(&self, id: CarId) -> Result<Option<Car>, RepositoryError> {
        let row = sqlx::query_as::<_, CarRow>(
            r"
            SELECT id, make, model, year, color, stock, dealer_id, created_at
            FROM car
            WHERE id = ?
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }

    async fn get_by_details(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: &str,
        year: i64,
        color: &str,
    ) -> Result<Option<Car>, RepositoryError> {
        let row = sqlx::query_as::<_, CarRow>(
            r"
            SELECT id, make, model, year, color, stock, dealer_id, created_at
            FROM car
            WHERE make = ? AND model = ? AND year = ? AND color = ? AND dealer_id = ?
            ",
        )
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(color)
        .bind(dealer_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }

    async fn insert(&self, dealer_id: DealerId, car: &NewCar) -> Result<Car, RepositoryError> {
        let row = sqlx::query_as::<_, CarRow>(
            r"
            INSERT INTO car (make, model, year, color, stock, dealer_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, make, model, year, color, stock, dealer_id, created_at
            ",
        )
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.year)
        .bind(&car.color)
        .bind(car.stock)
        .bind(dealer_id.as_i64())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "car natural key already exists for this dealer".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        Ok(Car::from(row))
    }

    async fn delete(&self, id: CarId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM car WHERE id = ?")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_stock(
        &self,
        id: CarId,
        dealer_id: DealerId,
        stock: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE car SET stock = ? WHERE id = ? AND dealer_id = ?")
            .bind(stock)
            .bind(id.as_i64())
            .bind(dealer_id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_by_dealer(&self, dealer_id: DealerId) -> Result<Vec<Car>, RepositoryError> {
        let rows = sqlx::query_as::<_, CarRow>(
            r"
            SELECT id, make, model, year, color, stock, dealer_id, created_at
            FROM car
            WHERE dealer_id = ?
            ",
        )
        .bind(dealer_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Car::from).collect())
    }

    async fn search(
        &self,
        dealer_id: DealerId,
        make: &str,
        model: Option<&str>,
    ) -> Result<Vec<Car>, RepositoryError> {
        let rows = match model {
            Some(model) => {
                sqlx::query_as::<_, CarRow>(
                    r"
                    SELECT id, make, model, year, color, stock, dealer_id, created_at
                    FROM car
                    WHERE dealer_id = ? AND make = ? AND model = ?
                    ",
                )
                .bind(dealer_id.as_i64())
                .bind(make)
                .bind(model)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CarRow>(
                    r"
                    SELECT id, make, model, year, color, stock, dealer_id, created_at
                    FROM car
                    WHERE dealer_id = ? AND make = ?
                    ",
                )
                .bind(dealer_id.as_i64())
                .bind(make)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Car::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use sqlx::sqlite::SqlitePoolOptions;

    /// A single-connection in-memory pool so the database survives between
    /// statements.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_schema(&pool).await.unwrap();
        pool
    }

    async fn test_dealer(pool: &SqlitePool) -> Dealer {
        let dealers = SqliteDealerStore::new(pool.clone());
        dealers
            .create(
                "John",
                &Email::parse("john@example.com").unwrap(),
                "$argon2id$fake-hash",
            )
            .await
            .unwrap()
    }

    fn audi_a4() -> NewCar {
        NewCar {
            make: "Audi".to_owned(),
            model: "A4".to_owned(),
            year: 2020,
            color: "Black".to_owned(),
            stock: 10,
        }
    }

    #[tokio::test]
    async fn dealer_create_and_lookup() {
        let pool = test_pool().await;
        let dealers = SqliteDealerStore::new(pool.clone());
        let created = test_dealer(&pool).await;

        let found = dealers
            .get_by_email(&Email::parse("john@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "John");
        assert_eq!(found.password_hash, "$argon2id$fake-hash");

        let missing = dealers
            .get_by_email(&Email::parse("nobody@example.com").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn dealer_email_unique_violation_maps_to_conflict() {
        let pool = test_pool().await;
        let dealers = SqliteDealerStore::new(pool.clone());
        test_dealer(&pool).await;

        let err = dealers
            .create(
                "Impostor",
                &Email::parse("john@example.com").unwrap(),
                "$argon2id$other-hash",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn car_insert_and_lookups() {
        let pool = test_pool().await;
        let dealer = test_dealer(&pool).await;
        let cars = SqliteCarStore::new(pool.clone());

        let car = cars.insert(dealer.id, &audi_a4()).await.unwrap();
        assert_eq!(car.dealer_id, dealer.id);
        assert_eq!(car.stock, 10);

        let by_id = cars.get_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(by_id, car);

        let by_details = cars
            .get_by_details(dealer.id, "Audi", "A4", 2020, "Black")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_details.id, car.id);

        // Different color is a different natural key
        let other = cars
            .get_by_details(dealer.id, "Audi", "A4", 2020, "Red")
            .await
            .unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn car_natural_key_unique_violation_maps_to_conflict() {
        let pool = test_pool().await;
        let dealer = test_dealer(&pool).await;
        let cars = SqliteCarStore::new(pool.clone());

        cars.insert(dealer.id, &audi_a4()).await.unwrap();
        let err = cars.insert(dealer.id, &audi_a4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_stock_is_dealer_guarded() {
        let pool = test_pool().await;
        let dealer = test_dealer(&pool).await;
        let cars = SqliteCarStore::new(pool.clone());
        let car = cars.insert(dealer.id, &audi_a4()).await.unwrap();

        cars.update_stock(car.id, dealer.id, 5).await.unwrap();
        let updated = cars.get_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(updated.stock, 5);

        // Wrong dealer matches no row
        let err = cars
            .update_stock(car.id, DealerId::new(9999), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let pool = test_pool().await;
        let dealer = test_dealer(&pool).await;
        let cars = SqliteCarStore::new(pool.clone());
        let car = cars.insert(dealer.id, &audi_a4()).await.unwrap();

        assert!(cars.delete(car.id).await.unwrap());
        assert!(!cars.delete(car.id).await.unwrap());
        assert!(cars.get_by_id(car.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_and_search_are_dealer_scoped() {
        let pool = test_pool().await;
        let dealers = SqliteDealerStore::new(pool.clone());
        let dealer_a = test_dealer(&pool).await;
        let dealer_b = dealers
            .create(
                "Jane",
                &Email::parse("jane@example.com").unwrap(),
                "$argon2id$fake-hash",
            )
            .await
            .unwrap();

        let cars = SqliteCarStore::new(pool.clone());
        cars.insert(dealer_a.id, &audi_a4()).await.unwrap();
        cars.insert(
            dealer_a.id,
            &NewCar {
                model: "A6".to_owned(),
                ..audi_a4()
            },
        )
        .await
        .unwrap();
        cars.insert(dealer_b.id, &audi_a4()).await.unwrap();

        assert_eq!(cars.list_by_dealer(dealer_a.id).await.unwrap().len(), 2);
        assert_eq!(cars.list_by_dealer(dealer_b.id).await.unwrap().len(), 1);

        let all_audis = cars.search(dealer_a.id, "Audi", None).await.unwrap();
        assert_eq!(all_audis.len(), 2);

        let a4_only = cars.search(dealer_a.id, "Audi", Some("A4")).await.unwrap();
        assert_eq!(a4_only.len(), 1);
        assert_eq!(a4_only[0].model, "A4");

        // Exact-equality matching, no partial match
        let none = cars.search(dealer_a.id, "Aud", None).await.unwrap();
        assert!(none.is_empty());
    }
}
