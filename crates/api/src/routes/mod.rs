//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ## Auth (anonymous)
//! - `POST /api/auth/register` - Register a new dealer
//! - `POST /api/auth/login` - Login, returns a bearer token
//!
//! ## Cars (bearer token required)
//! - `POST /api/cars/add` - Add a car to the dealer's catalog
//! - `POST /api/cars/remove` - Remove a car
//! - `POST /api/cars/update-stock` - Replace a car's stock level
//! - `GET  /api/cars/list` - List all of the dealer's cars
//! - `POST /api/cars/search` - Search by make, optionally narrowed by model
//!
//! All responses carry a JSON body with a `message` field.

pub mod auth;
pub mod cars;

use axum::Router;

use crate::state::AppState;

/// Compose all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::routes())
        .nest("/api/cars", cars::routes())
}
