use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use medstock_core::price::{format_price, parse_float};
use medstock_core::{DomainError, DomainResult, Entity, Price};

/// Label shown for records that arrive without a name.
pub const UNKNOWN_MEDICINE: &str = "Unknown Medicine";

/// A medicine as listed by the Inventory API.
///
/// The server is the only source of truth; `name` and `price` accept any JSON
/// value so a single odd row never takes down the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
}

impl Medicine {
    pub fn new(name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Name label for the row.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_MEDICINE
        } else {
            &self.name
        }
    }

    /// Currency-prefixed price with two decimals, or the placeholder.
    pub fn price_label(&self) -> String {
        format_price(self.price)
    }
}

impl Entity for Medicine {
    type Id = str;

    fn id(&self) -> &str {
        &self.name
    }
}

/// Numbers and numeric strings become prices; anything else (null, bool,
/// objects, unparseable text) is "no price".
fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_float(&text),
        _ => None,
    })
}

/// Strings are kept, numbers are stringified, anything else is unnamed.
fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

/// Command: create a medicine from the create form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicine {
    pub name: String,
    pub price: Price,
}

impl NewMedicine {
    /// Validate raw form input. The name is trimmed and must be non-empty;
    /// the price must parse as a number.
    pub fn from_form(name: &str, price: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::missing("name"));
        }
        let price = Price::parse(price)?;
        Ok(Self {
            name: name.to_string(),
            price,
        })
    }
}

/// Command: replace the price of an existing medicine.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub name: String,
    pub price: Price,
}

impl PriceUpdate {
    /// Validate the text of an inline price input. The name is taken as-is
    /// from the listed record.
    pub fn from_input(name: impl Into<String>, input: &str) -> DomainResult<Self> {
        Ok(Self {
            name: name.into(),
            price: Price::parse(input)?,
        })
    }
}
