//! `medstock-core` — domain building blocks shared by the inventory client.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no view code).

pub mod entity;
pub mod error;
pub mod price;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use price::{CURRENCY_SYMBOL, Price};
