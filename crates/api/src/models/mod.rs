//! Domain models for the car stock service.

pub mod car;
pub mod dealer;

pub use car::{Car, NewCar};
pub use dealer::Dealer;
