//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs with the dealer id as subject and a one hour
//! expiry. The rest of the service treats issued tokens as opaque strings.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use carstock_core::DealerId;

/// Token lifetime.
const TOKEN_TTL_HOURS: i64 = 1;

/// Errors from issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be signed.
    #[error("token encoding failed: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// The token is malformed, has a bad signature, or has expired.
    #[error("invalid token")]
    Invalid,
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Dealer id, as a string.
    pub sub: String,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Issues and verifies dealer bearer tokens.
#[derive(Clone)]
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtIssuer {
    /// Create an issuer from the configured signing secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
        }
    }

    /// Issue a token for a dealer.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Encode` if signing fails.
    pub fn issue(&self, dealer_id: DealerId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: dealer_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Encode)
    }

    /// Verify a token and return the dealer it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for a bad signature, malformed claims,
    /// or an expired token.
    pub fn verify(&self, token: &str) -> Result<DealerId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::Invalid)?;
        Ok(DealerId::new(id))
    }
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> JwtIssuer {
        JwtIssuer::new(&SecretString::from(secret.to_owned()))
    }

    #[test]
    fn issue_then_verify_roundtrips_dealer_id() {
        let issuer = issuer("kR9tP2vQ8wL5nZ3xJ7mC4bF6hD1gS0aY");
        let token = issuer.issue(DealerId::new(42)).unwrap();
        assert!(!token.is_empty());
        assert_eq!(issuer.verify(&token).unwrap(), DealerId::new(42));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = issuer("kR9tP2vQ8wL5nZ3xJ7mC4bF6hD1gS0aY")
            .issue(DealerId::new(1))
            .unwrap();
        let err = issuer("aB3cD4eF5gH6iJ7kL8mN9oP0qR1sT2uV")
            .verify(&token)
            .unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
    }

    #[test]
    fn verify_rejects_garbage() {
        let err = issuer("kR9tP2vQ8wL5nZ3xJ7mC4bF6hD1gS0aY")
            .verify("not-a-token")
            .unwrap_err();
        assert!(matches!(err, TokenError::Invalid));
    }
}
