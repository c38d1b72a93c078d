//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Dealer registration and login (argon2 password hashing, token
//!   issuance)
//! - `inventory` - Dealer-scoped catalog operations (add, remove, list,
//!   search, stock updates)
//!
//! Services own `Arc` references to the store traits they need and nothing
//! else; tests substitute in-memory stores.

pub mod auth;
pub mod inventory;

pub use auth::{AuthError, AuthService};
pub use inventory::{InventoryError, InventoryService};
