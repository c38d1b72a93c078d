//! Car catalog handlers.
//!
//! Every handler requires a bearer token via [`AuthDealer`]; the dealer id it
//! carries scopes all reads and writes. Request payloads are validated here,
//! before the service is invoked, and validation failures are 400s carrying
//! the validator's message.

use axum::extract::State;
use axum::{
    Json, Router,
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use carstock_core::CarId;

use crate::error::ApiError;
use crate::middleware::AuthDealer;
use crate::models::{Car, NewCar};
use crate::state::AppState;

/// First model year of a production automobile.
const MIN_YEAR: i64 = 1886;
const MAX_NAME_LENGTH: usize = 50;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_car))
        .route("/remove", post(remove_car))
        .route("/update-stock", post(update_stock))
        .route("/list", get(list_cars))
        .route("/search", post(search_cars))
}

// =============================================================================
// Request / response DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddCarRequest {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub stock: i64,
}

impl AddCarRequest {
    fn validate(&self) -> Result<NewCar, ApiError> {
        if self.make.is_empty() {
            return Err(bad_request("Make is required."));
        }
        if self.make.len() > MAX_NAME_LENGTH {
            return Err(bad_request("Make must be between 1 and 50 characters"));
        }
        if self.model.is_empty() {
            return Err(bad_request("Model is required."));
        }
        if self.model.len() > MAX_NAME_LENGTH {
            return Err(bad_request("Model must be up to 50 characters"));
        }
        let current_year = i64::from(Utc::now().year());
        if self.year < MIN_YEAR || self.year > current_year {
            return Err(bad_request(&format!(
                "Year must be between 1886 and {current_year}."
            )));
        }
        if self.color.is_empty() {
            return Err(bad_request("Color is required."));
        }
        if self.stock < 0 {
            return Err(bad_request("Stock must be a non-negative integer."));
        }

        Ok(NewCar {
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            color: self.color.clone(),
            stock: self.stock,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveCarRequest {
    pub car_id: i64,
}

impl RemoveCarRequest {
    fn validate(&self) -> Result<CarId, ApiError> {
        if self.car_id <= 0 {
            return Err(bad_request("CarId must be a positive integer"));
        }
        Ok(CarId::new(self.car_id))
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCarStockRequest {
    pub car_id: i64,
    pub new_stock: i64,
}

impl UpdateCarStockRequest {
    fn validate(&self) -> Result<(CarId, i64), ApiError> {
        if self.car_id <= 0 {
            return Err(bad_request("CarId must be a positive integer"));
        }
        if self.new_stock < 0 {
            return Err(bad_request("Stock must be zero or greater"));
        }
        Ok((CarId::new(self.car_id), self.new_stock))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchCarRequest {
    pub make: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl SearchCarRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.make.is_empty() {
            return Err(bad_request("Make is required."));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub car_id: i64,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
    pub stock: i64,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            car_id: car.id.as_i64(),
            make: car.make,
            model: car.model,
            year: car.year,
            color: car.color,
            stock: car.stock,
        }
    }
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_owned())
}

fn car_list_body(cars: Vec<Car>) -> Value {
    let message = if cars.is_empty() {
        "No cars found"
    } else {
        "Cars found"
    };
    let cars: Vec<CarResponse> = cars.into_iter().map(CarResponse::from).collect();
    json!({ "message": message, "cars": cars })
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/cars/add`
async fn add_car(
    State(state): State<AppState>,
    AuthDealer(dealer_id): AuthDealer,
    Json(req): Json<AddCarRequest>,
) -> Result<Json<Value>, ApiError> {
    let new_car = req.validate()?;
    let car = state.inventory().add_car(dealer_id, &new_car).await?;

    Ok(Json(json!({
        "message": "Car added successfully",
        "car": CarResponse::from(car),
    })))
}

/// `POST /api/cars/remove`
async fn remove_car(
    State(state): State<AppState>,
    AuthDealer(dealer_id): AuthDealer,
    Json(req): Json<RemoveCarRequest>,
) -> Result<Json<Value>, ApiError> {
    let car_id = req.validate()?;
    state.inventory().remove_car(car_id, dealer_id).await?;

    Ok(Json(json!({ "message": "Car removed successfully" })))
}

/// `POST /api/cars/update-stock`
async fn update_stock(
    State(state): State<AppState>,
    AuthDealer(dealer_id): AuthDealer,
    Json(req): Json<UpdateCarStockRequest>,
) -> Result<Json<Value>, ApiError> {
    let (car_id, new_stock) = req.validate()?;
    let car = state
        .inventory()
        .update_stock(dealer_id, car_id, new_stock)
        .await?;

    Ok(Json(json!({
        "message": "Stock updated successfully",
        "car": CarResponse::from(car),
    })))
}

/// `GET /api/cars/list`
async fn list_cars(
    State(state): State<AppState>,
    AuthDealer(dealer_id): AuthDealer,
) -> Json<Value> {
    let cars = state.inventory().list_cars(dealer_id).await;
    Json(car_list_body(cars))
}

/// `POST /api/cars/search`
///
/// Unlike `list`, an empty result is a 404 with "No cars found".
async fn search_cars(
    State(state): State<AppState>,
    AuthDealer(dealer_id): AuthDealer,
    Json(req): Json<SearchCarRequest>,
) -> Result<Json<Value>, ApiError> {
    req.validate()?;
    let cars = state
        .inventory()
        .search_cars(dealer_id, &req.make, req.model.as_deref())
        .await;

    if cars.is_empty() {
        return Err(ApiError::NotFound("No cars found".to_owned()));
    }

    Ok(Json(car_list_body(cars)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_request() -> AddCarRequest {
        AddCarRequest {
            make: "Audi".to_owned(),
            model: "A4".to_owned(),
            year: 2020,
            color: "Black".to_owned(),
            stock: 10,
        }
    }

    fn message_of(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn valid_add_request_passes() {
        let new_car = add_request().validate().unwrap();
        assert_eq!(new_car.make, "Audi");
        assert_eq!(new_car.stock, 10);
    }

    #[test]
    fn add_request_rejects_missing_fields() {
        let err = AddCarRequest {
            make: String::new(),
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Make is required.");

        let err = AddCarRequest {
            model: String::new(),
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Model is required.");

        let err = AddCarRequest {
            color: String::new(),
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Color is required.");
    }

    #[test]
    fn add_request_rejects_out_of_range_values() {
        let err = AddCarRequest {
            year: 1885,
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert!(message_of(err).starts_with("Year must be between 1886 and "));

        let err = AddCarRequest {
            year: i64::from(Utc::now().year()) + 1,
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert!(message_of(err).starts_with("Year must be between 1886 and "));

        let err = AddCarRequest {
            stock: -1,
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Stock must be a non-negative integer.");

        let err = AddCarRequest {
            make: "a".repeat(51),
            ..add_request()
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Make must be between 1 and 50 characters");
    }

    #[test]
    fn current_year_is_accepted() {
        let req = AddCarRequest {
            year: i64::from(Utc::now().year()),
            ..add_request()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn remove_request_requires_positive_id() {
        assert!(RemoveCarRequest { car_id: 1 }.validate().is_ok());

        let err = RemoveCarRequest { car_id: 0 }.validate().unwrap_err();
        assert_eq!(message_of(err), "CarId must be a positive integer");
    }

    #[test]
    fn update_request_rejects_negative_stock() {
        let err = UpdateCarStockRequest {
            car_id: 1,
            new_stock: -1,
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Stock must be zero or greater");

        // Zero is a legal stock level.
        assert!(
            UpdateCarStockRequest {
                car_id: 1,
                new_stock: 0,
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn search_request_requires_make() {
        let err = SearchCarRequest {
            make: String::new(),
            model: None,
        }
        .validate()
        .unwrap_err();
        assert_eq!(message_of(err), "Make is required.");
    }

    #[test]
    fn list_body_message_reflects_emptiness() {
        let body = car_list_body(Vec::new());
        assert_eq!(body["message"], "No cars found");
        assert!(body["cars"].as_array().unwrap().is_empty());
    }
}
