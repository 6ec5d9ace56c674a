//! Medicine inventory domain.
//!
//! Business rules for medicines and the commands the client sends for them,
//! implemented as deterministic domain logic (no IO, no HTTP, no view code).

pub mod medicine;

pub use medicine::{Medicine, NewMedicine, PriceUpdate, UNKNOWN_MEDICINE};
