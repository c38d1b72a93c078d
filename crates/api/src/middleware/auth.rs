//! Bearer token authentication extractor.
//!
//! Handlers take [`AuthDealer`] as an argument to require a valid token;
//! the extractor rejects with `401 {"message": "Unauthorized"}` otherwise.
//! All failures share that one body so clients cannot tell a missing header
//! from a bad or expired token.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use carstock_core::DealerId;

use crate::error::ApiError;
use crate::state::AppState;

/// The dealer authenticated by the request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthDealer(pub DealerId);

impl FromRequestParts<AppState> for AuthDealer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts).ok_or_else(unauthorized)?;

        let dealer_id = state.tokens().verify(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            unauthorized()
        })?;

        Ok(Self(dealer_id))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn extract_bearer(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/cars/list");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_header_and_wrong_scheme() {
        assert_eq!(extract_bearer(&parts_with_auth(None)), None);
        assert_eq!(extract_bearer(&parts_with_auth(Some("Basic abc"))), None);
        assert_eq!(extract_bearer(&parts_with_auth(Some("Bearer "))), None);
    }
}
