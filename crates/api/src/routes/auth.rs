//! Dealer registration and login handlers.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/register`
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .auth()
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok(Json(json!({ "message": "Registration Success" })))
}

/// `POST /api/auth/login`
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (_, token) = state.auth().login(&req.email, &req.password).await?;

    Ok(Json(json!({ "message": "Login Success", "token": token })))
}
