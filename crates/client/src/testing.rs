//! Scripted stand-ins for the client's collaborators.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;

use medstock_inventory::{Medicine, NewMedicine, PriceUpdate};

use crate::api::{ApiError, InventoryApi};
use crate::host::{Dialogs, Scheduler};
use crate::types::MessageResponse;

/// A request as seen by the API, with form fields as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Create { name: String, price: String },
    Update { name: String, price: String },
    Delete { name: String },
    Average,
}

pub struct FakeApi {
    pub calls: RefCell<Vec<ApiCall>>,
    lists: RefCell<VecDeque<Result<Vec<Medicine>, ApiError>>>,
    create: RefCell<Result<MessageResponse, ApiError>>,
    update: RefCell<Result<MessageResponse, ApiError>>,
    delete: RefCell<Result<MessageResponse, ApiError>>,
    average: RefCell<Result<f64, ApiError>>,
    update_gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            lists: RefCell::new(VecDeque::new()),
            create: RefCell::new(Ok(MessageResponse::new("Medicine created"))),
            update: RefCell::new(Ok(MessageResponse::new("Medicine updated"))),
            delete: RefCell::new(Ok(MessageResponse::new("Medicine deleted"))),
            average: RefCell::new(Ok(0.0)),
            update_gate: RefCell::new(None),
        }
    }
}

impl FakeApi {
    /// Queue the result of the next list call. Unqueued calls see an empty list.
    pub fn push_list(&self, result: Result<Vec<Medicine>, ApiError>) {
        self.lists.borrow_mut().push_back(result);
    }

    pub fn respond_create(&self, result: Result<MessageResponse, ApiError>) {
        *self.create.borrow_mut() = result;
    }

    pub fn respond_update(&self, result: Result<MessageResponse, ApiError>) {
        *self.update.borrow_mut() = result;
    }

    pub fn respond_delete(&self, result: Result<MessageResponse, ApiError>) {
        *self.delete.borrow_mut() = result;
    }

    pub fn respond_average(&self, result: Result<f64, ApiError>) {
        *self.average.borrow_mut() = result;
    }

    /// Hold the next update call until the returned sender fires.
    pub fn hold_next_update(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.update_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl InventoryApi for FakeApi {
    async fn list_medicines(&self) -> Result<Vec<Medicine>, ApiError> {
        self.record(ApiCall::List);
        self.lists.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn create_medicine(&self, medicine: &NewMedicine) -> Result<MessageResponse, ApiError> {
        self.record(ApiCall::Create {
            name: medicine.name.clone(),
            price: medicine.price.to_form_value(),
        });
        self.create.borrow().clone()
    }

    async fn update_price(&self, update: &PriceUpdate) -> Result<MessageResponse, ApiError> {
        self.record(ApiCall::Update {
            name: update.name.clone(),
            price: update.price.to_form_value(),
        });
        let gate = self.update_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.update.borrow().clone()
    }

    async fn delete_medicine(&self, name: &str) -> Result<MessageResponse, ApiError> {
        self.record(ApiCall::Delete {
            name: name.to_string(),
        });
        self.delete.borrow().clone()
    }

    async fn average_price(&self) -> Result<f64, ApiError> {
        self.record(ApiCall::Average);
        self.average.borrow().clone()
    }
}

/// Dialogs that record prompts and answer confirmations with a fixed reply.
pub struct RecordingDialogs {
    pub alerts: RefCell<Vec<String>>,
    pub confirms: RefCell<Vec<String>>,
    answer: Cell<bool>,
}

impl RecordingDialogs {
    pub fn answering(answer: bool) -> Self {
        Self {
            alerts: RefCell::new(Vec::new()),
            confirms: RefCell::new(Vec::new()),
            answer: Cell::new(answer),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.set(answer);
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Dialogs for RecordingDialogs {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answer.get()
    }
}

/// Scheduler driven by hand: tasks run only when the test fires them.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: RefCell<VecDeque<(Duration, Box<dyn FnOnce()>)>>,
}

impl ManualScheduler {
    pub fn pending(&self) -> Vec<Duration> {
        self.tasks.borrow().iter().map(|(delay, _)| *delay).collect()
    }

    /// Run the oldest scheduled task. Returns `false` if none was pending.
    pub fn fire_next(&self) -> bool {
        let task = self.tasks.borrow_mut().pop_front();
        match task {
            Some((_, task)) => {
                task();
                true
            }
            None => false,
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.tasks.borrow_mut().push_back((delay, task));
    }
}
