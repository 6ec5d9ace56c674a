//! Inventory API: the five HTTP calls the client makes, behind a trait so the
//! controller can run against the real service or a scripted stand-in.

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use medstock_inventory::{Medicine, NewMedicine, PriceUpdate};

use crate::config::ClientConfig;
use crate::types::{AverageResponse, MedicineList, MessageResponse, NameForm, PriceForm};

pub const LIST_PATH: &str = "/medicines";
pub const CREATE_PATH: &str = "/create";
pub const UPDATE_PATH: &str = "/update";
pub const DELETE_PATH: &str = "/delete";
pub const AVERAGE_PATH: &str = "/average-price";

/// Failure of a single API call.
///
/// Every variant is handled by the action that issued the call; nothing is
/// retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx status, whatever the body says.
    #[error("API error ({status})")]
    Status { status: u16, message: Option<String> },
    /// 2xx but the body was not the expected JSON.
    #[error("parse error: {0}")]
    Decode(String),
    /// 2xx, valid JSON, but a required field is missing.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Build a status error, keeping any message the server put in the body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "detail", "msg"]
                    .iter()
                    .find_map(|key| value.get(key)?.as_str().map(str::to_string))
            });
        Self::Status { status, message }
    }

    /// Message supplied by the server, if the failure carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The Inventory API contract.
///
/// `?Send` so the same implementations run on the browser's single thread.
#[async_trait(?Send)]
pub trait InventoryApi {
    /// `GET /medicines`, in server order.
    async fn list_medicines(&self) -> Result<Vec<Medicine>, ApiError>;

    /// `POST /create`
    async fn create_medicine(&self, medicine: &NewMedicine) -> Result<MessageResponse, ApiError>;

    /// `POST /update`
    async fn update_price(&self, update: &PriceUpdate) -> Result<MessageResponse, ApiError>;

    /// `DELETE /delete`
    async fn delete_medicine(&self, name: &str) -> Result<MessageResponse, ApiError>;

    /// `GET /average-price`; a body without a numeric `average` is
    /// [`ApiError::Malformed`].
    async fn average_price(&self) -> Result<f64, ApiError>;
}

/// [`InventoryApi`] over HTTP with form-encoded request bodies.
#[derive(Debug, Clone)]
pub struct HttpInventoryApi {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpInventoryApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let resp = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        tracing::debug!(url = %resp.url(), status = status.as_u16(), "inventory api response");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl InventoryApi for HttpInventoryApi {
    async fn list_medicines(&self) -> Result<Vec<Medicine>, ApiError> {
        let url = self.config.endpoint(LIST_PATH);
        let list: MedicineList = self.send(self.http.get(url)).await?;
        Ok(list.medicines)
    }

    async fn create_medicine(&self, medicine: &NewMedicine) -> Result<MessageResponse, ApiError> {
        let form = PriceForm {
            name: &medicine.name,
            price: medicine.price.to_form_value(),
        };
        let url = self.config.endpoint(CREATE_PATH);
        self.send(self.http.post(url).form(&form)).await
    }

    async fn update_price(&self, update: &PriceUpdate) -> Result<MessageResponse, ApiError> {
        let form = PriceForm {
            name: &update.name,
            price: update.price.to_form_value(),
        };
        let url = self.config.endpoint(UPDATE_PATH);
        self.send(self.http.post(url).form(&form)).await
    }

    async fn delete_medicine(&self, name: &str) -> Result<MessageResponse, ApiError> {
        let url = self.config.endpoint(DELETE_PATH);
        self.send(self.http.delete(url).form(&NameForm { name })).await
    }

    async fn average_price(&self) -> Result<f64, ApiError> {
        let url = self.config.endpoint(AVERAGE_PATH);
        let body: AverageResponse = self.send(self.http.get(url)).await?;
        body.average
            .ok_or_else(|| ApiError::Malformed("missing `average`".to_string()))
    }
}
