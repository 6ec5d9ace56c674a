//! Inventory API wire types (match the JSON response shapes).
//!
//! Shared by the HTTP client and the frontend, so nothing here may depend on
//! native-only crates.

use medstock_inventory::Medicine;
use serde::{Deserialize, Serialize};

/// `GET /medicines`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineList {
    pub medicines: Vec<Medicine>,
}

/// Body of every mutating endpoint (`/create`, `/update`, `/delete`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// `GET /average-price`
///
/// `average` is optional on the wire; a body without it is a malformed
/// response, reported by the API layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageResponse {
    #[serde(default)]
    pub average: Option<f64>,
}

/// Form body carrying a name and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PriceForm<'a> {
    pub name: &'a str,
    pub price: String,
}

/// Form body carrying only a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct NameForm<'a> {
    pub name: &'a str,
}
