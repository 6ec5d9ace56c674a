//! The inventory client: every user-facing action, from API call to view
//! update.
//!
//! Actions are `async fn(&self)`; callers spawn them on the single UI thread
//! (`spawn_local` in the browser, a `LocalSet` natively). View borrows are
//! scoped to synchronous sections, so interleaved actions only ever observe
//! whole updates. Responses are applied in completion order: nothing guards
//! against a slow response overwriting newer state on the same row.

use std::rc::Rc;
use std::time::Duration;

use medstock_core::price::truncate_fraction;
use medstock_inventory::{NewMedicine, PriceUpdate};

use crate::api::InventoryApi;
use crate::host::{Dialogs, Scheduler};
use crate::view::{
    AVERAGE_ERROR_TEXT, DocumentView, FormMessage, MessageKind, PriceField, RowKey, average_label,
};

/// How long a form message stays visible.
pub const FORM_MESSAGE_TTL: Duration = Duration::from_secs(10);

pub const INVALID_FORM_TEXT: &str = "Please enter valid name and price.";
pub const MEDICINE_ADDED_TEXT: &str = "Medicine has been added.";
pub const ADD_FAILED_TEXT: &str = "Error adding medicine. Please try again.";
pub const INVALID_PRICE_TEXT: &str = "Please enter a valid price.";
pub const UPDATE_FAILED_TEXT: &str = "Error updating medicine. Please try again.";
pub const DELETE_FAILED_TEXT: &str = "Error deleting medicine. Please try again.";

pub fn delete_prompt(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?")
}

/// Inventory Client: owns the page's view state and drives the Inventory API.
pub struct InventoryClient {
    api: Rc<dyn InventoryApi>,
    dialogs: Rc<dyn Dialogs>,
    scheduler: Rc<dyn Scheduler>,
    document: DocumentView,
}

impl InventoryClient {
    pub fn new(
        api: Rc<dyn InventoryApi>,
        dialogs: Rc<dyn Dialogs>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            api,
            dialogs,
            scheduler,
            document: DocumentView::new(),
        }
    }

    pub fn document(&self) -> &DocumentView {
        &self.document
    }

    /// Page load.
    pub async fn load(&self) {
        self.fetch_medicines().await;
    }

    /// Fetch the full list and replace whatever is shown.
    pub async fn fetch_medicines(&self) {
        match self.api.list_medicines().await {
            Ok(medicines) => {
                tracing::debug!(count = medicines.len(), "medicine list fetched");
                self.document.update(|view| view.render_medicines(medicines));
            }
            Err(err) => {
                tracing::error!(error = %err, "there was a problem fetching medicines");
                self.document.update(|view| view.render_list_error());
            }
        }
    }

    /// The row's edit control. What it does depends on the row's current
    /// price field state: start editing, or save the typed price.
    pub async fn activate_edit_control(&self, key: RowKey) {
        let pending_save = self.document.update(|view| {
            let row = view.row_mut(key)?;
            if let PriceField::Editing { input } = &row.price {
                return Some((row.medicine.name.clone(), input.clone()));
            }
            row.price.begin_edit();
            tracing::debug!(medicine = %row.medicine.name, "editing price");
            None
        });

        if let Some((name, input)) = pending_save {
            self.save_price(key, name, &input).await;
        }
    }

    /// Keystroke in a row's price input.
    pub fn edit_price_input(&self, key: RowKey, raw: &str) {
        self.document.update(|view| {
            if let Some(row) = view.row_mut(key) {
                row.price.set_input(raw);
            }
        });
    }

    async fn save_price(&self, key: RowKey, name: String, input: &str) {
        let update = match PriceUpdate::from_input(name, input) {
            Ok(update) => update,
            Err(err) => {
                tracing::debug!(error = %err, "rejected price input");
                self.dialogs.alert(INVALID_PRICE_TEXT);
                return;
            }
        };

        match self.api.update_price(&update).await {
            Ok(resp) => {
                self.dialogs.alert(resp.message.as_deref().unwrap_or_default());
                // The row may belong to a list that has since been replaced.
                self.document.update(|view| {
                    if let Some(row) = view.row_mut(key) {
                        row.price.finish_edit(update.price);
                    }
                });
            }
            Err(err) => {
                tracing::error!(medicine = %update.name, error = %err, "failed to update medicine");
                self.dialogs.alert(UPDATE_FAILED_TEXT);
            }
        }
    }

    pub fn set_form_name(&self, name: &str) {
        self.document.update(|view| view.form.name = name.to_string());
    }

    /// Keystroke in the create form's price input.
    pub fn set_form_price(&self, raw: &str) {
        self.document.update(|view| view.form.price = truncate_fraction(raw));
    }

    /// Submit the create form.
    pub async fn add_medicine(&self) {
        let form = self.document.read(|view| view.form.clone());
        let medicine = match NewMedicine::from_form(&form.name, &form.price) {
            Ok(medicine) => medicine,
            Err(err) => {
                tracing::debug!(error = %err, "rejected create form");
                self.display_form_message(INVALID_FORM_TEXT, MessageKind::Error);
                return;
            }
        };

        match self.api.create_medicine(&medicine).await {
            Ok(resp) => {
                let message = resp.message.as_deref().unwrap_or(MEDICINE_ADDED_TEXT);
                self.display_form_message(message, MessageKind::Success);
                self.fetch_medicines().await;
            }
            Err(err) => {
                tracing::error!(medicine = %medicine.name, error = %err, "failed to add medicine");
                let message = err.server_message().unwrap_or(ADD_FAILED_TEXT);
                self.display_form_message(message, MessageKind::Error);
            }
        }
    }

    /// Delete a medicine after confirmation.
    pub async fn delete_medicine(&self, name: &str) {
        if !self.dialogs.confirm(&delete_prompt(name)) {
            return;
        }

        match self.api.delete_medicine(name).await {
            Ok(resp) => {
                self.dialogs.alert(resp.message.as_deref().unwrap_or_default());
                self.fetch_medicines().await;
            }
            Err(err) => {
                tracing::error!(medicine = %name, error = %err, "failed to delete medicine");
                self.dialogs.alert(DELETE_FAILED_TEXT);
            }
        }
    }

    /// Fetch the server-computed average price into the result area.
    pub async fn calculate_average_price(&self) {
        let text = match self.api.average_price().await {
            Ok(average) => average_label(average),
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch average price");
                AVERAGE_ERROR_TEXT.to_string()
            }
        };
        self.document.update(|view| view.average = Some(text));
    }

    /// Show a form message. The visible text is fixed per kind; `message` is
    /// only logged. Each call schedules its own clear, so an earlier timer
    /// may clear a later message early.
    pub fn display_form_message(&self, message: &str, kind: MessageKind) {
        tracing::info!(kind = kind.class(), %message, "form message");
        self.document
            .update(|view| view.form_message = Some(FormMessage::new(kind)));

        let document = self.document.clone();
        self.scheduler.schedule(
            FORM_MESSAGE_TTL,
            Box::new(move || document.update(|view| view.form_message = None)),
        );
    }
}
