//! Dealer authentication service.
//!
//! Handles dealer registration and login with email + password, and issues
//! bearer tokens on successful login.
//!
//! Unknown-email and wrong-password failures both surface as
//! [`AuthError::InvalidCredentials`] so callers cannot probe which emails are
//! registered.

mod error;

pub use error::AuthError;

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use carstock_core::Email;

use crate::db::{DealerStore, RepositoryError};
use crate::models::Dealer;
use crate::token::JwtIssuer;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Dealer authentication service.
pub struct AuthService {
    dealers: Arc<dyn DealerStore>,
    tokens: JwtIssuer,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(dealers: Arc<dyn DealerStore>, tokens: JwtIssuer) -> Self {
        Self { dealers, tokens }
    }

    /// Register a new dealer with name, email, and password.
    ///
    /// Performs no write when the email is already registered.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyName`/`InvalidEmail`/`WeakPassword` if the
    /// input fails validation, `AuthError::EmailExists` if the email is
    /// already registered, and an infrastructure variant if a collaborator
    /// fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Dealer, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::EmptyName);
        }
        let email = Email::parse(email)?;
        validate_password(password)?;

        if self.lookup(&email, "register").await?.is_some() {
            tracing::warn!(email = %email, "registration attempt with existing email");
            return Err(AuthError::EmailExists);
        }

        let password_hash = hash_password(password)?;

        let dealer = self
            .dealers
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                // A concurrent registration slipped past the lookup; same outcome.
                RepositoryError::Conflict(_) => AuthError::EmailExists,
                other => {
                    tracing::error!(email = %email, error = %other, "register: dealer insert failed");
                    AuthError::Repository(other)
                }
            })?;

        tracing::info!(dealer_id = %dealer.id, email = %dealer.email, "dealer registered");
        Ok(dealer)
    }

    /// Login with email and password, returning the dealer and a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password does not verify, and an infrastructure variant if a
    /// collaborator fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Dealer, String), AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let dealer = self
            .lookup(&email, "login")
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &dealer.password_hash)?;

        let token = self.tokens.issue(dealer.id).map_err(|e| {
            tracing::error!(dealer_id = %dealer.id, error = %e, "login: token issuance failed");
            AuthError::Token(e)
        })?;

        Ok((dealer, token))
    }

    async fn lookup(&self, email: &Email, operation: &str) -> Result<Option<Dealer>, AuthError> {
        self.dealers.get_by_email(email).await.map_err(|e| {
            tracing::error!(email = %email, operation, error = %e, "dealer lookup failed");
            AuthError::Repository(e)
        })
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
