//! `medstock-client`
//!
//! **Responsibility:** the browser-side client of the medicine inventory.
//!
//! This crate provides:
//! - The Inventory API contract and its HTTP implementation
//! - The page view model (medicine list, inline price editing, form message,
//!   average price)
//! - The controller wiring user actions to API calls and view updates
//! - A Leptos frontend (wasm32) and a headless command line (native)
//!
//! The API is the only source of truth; the client keeps nothing between
//! fetches.

pub mod api;
pub mod client;
pub mod config;
pub mod host;
pub mod types;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(test)]
mod testing;

pub use api::{ApiError, HttpInventoryApi, InventoryApi};
pub use client::InventoryClient;
pub use config::ClientConfig;
pub use host::{Dialogs, Scheduler};
pub use view::{DocumentView, ListView, MessageKind, PriceField, RowKey, ViewState};
