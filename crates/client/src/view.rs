//! View model of the inventory page.
//!
//! [`ViewState`] is everything the page shows: the medicine list with the
//! per-row price field state machine, the create form, the transient form
//! message and the average-price result. [`DocumentView`] owns it and tells
//! observers (the Leptos frontend, the CLI) after every mutation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use medstock_core::{Entity, Price};
use medstock_core::price::{format_price, js_number_string, parse_displayed_price, truncate_fraction};
use medstock_inventory::Medicine;

pub const LIST_ERROR_TEXT: &str = "Error fetching medicines. Please try again later.";
pub const EMPTY_LIST_TEXT: &str = "No medicines available at the moment.";
pub const SUCCESS_MESSAGE_TEXT: &str = "Success, Medicine has been added";
pub const ERROR_MESSAGE_TEXT: &str = "Error";
pub const AVERAGE_ERROR_TEXT: &str = "Error calculating average price. Please try again.";

/// Address of a rendered row: the list render it belongs to plus its position.
///
/// Every successful list fetch starts a new generation, so keys held by
/// in-flight work stop matching once the list is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey {
    pub generation: u64,
    pub index: usize,
}

/// Icon on a row's edit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIcon {
    Edit,
    Save,
}

impl EditIcon {
    pub fn asset(self) -> &'static str {
        match self {
            EditIcon::Edit => "editButton.png",
            EditIcon::Save => "SaveButton.png",
        }
    }

    pub fn alt(self) -> &'static str {
        match self {
            EditIcon::Edit => "Edit",
            EditIcon::Save => "Save",
        }
    }
}

/// Per-row price field.
///
/// ```text
///   Display --(edit control)--> Editing --(save ok)--> Display
///                                  ^  |
///                                  +--+ (invalid input / save failed)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PriceField {
    /// Read-only label, e.g. `£12.50`.
    Display { text: String },
    /// Numeric input holding the typed text.
    Editing { input: String },
}

impl PriceField {
    pub fn for_medicine(medicine: &Medicine) -> Self {
        PriceField::Display {
            text: medicine.price_label(),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, PriceField::Editing { .. })
    }

    pub fn icon(&self) -> EditIcon {
        match self {
            PriceField::Display { .. } => EditIcon::Edit,
            PriceField::Editing { .. } => EditIcon::Save,
        }
    }

    /// `Display -> Editing`, pre-filling the input with the shown price.
    /// Returns `false` if the field was already editing.
    pub(crate) fn begin_edit(&mut self) -> bool {
        let PriceField::Display { text } = self else {
            return false;
        };
        let current = parse_displayed_price(text);
        *self = PriceField::Editing {
            input: js_number_string(current),
        };
        true
    }

    /// Keystroke into the editing input; extra fraction digits are cut.
    pub(crate) fn set_input(&mut self, raw: &str) -> bool {
        match self {
            PriceField::Editing { input } => {
                *input = truncate_fraction(raw);
                true
            }
            PriceField::Display { .. } => false,
        }
    }

    /// `Editing -> Display` after a successful save. The label shows the
    /// saved number as typed, without two-decimal formatting.
    pub(crate) fn finish_edit(&mut self, price: Price) {
        *self = PriceField::Display {
            text: price.display_raw(),
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicineRow {
    pub key: RowKey,
    pub medicine: Medicine,
    pub price: PriceField,
}

impl MedicineRow {
    pub fn name_label(&self) -> &str {
        self.medicine.display_name()
    }

    pub fn icon(&self) -> EditIcon {
        self.price.icon()
    }
}

/// Contents of the list container.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ListView {
    /// Nothing fetched yet.
    #[default]
    NotLoaded,
    /// A single literal row (empty list or fetch error).
    Notice(String),
    Rows { generation: u64, rows: Vec<MedicineRow> },
}

impl ListView {
    pub fn rows(&self) -> &[MedicineRow] {
        match self {
            ListView::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn row_keys(&self) -> Vec<RowKey> {
        self.rows().iter().map(|row| row.key).collect()
    }

    pub fn row(&self, key: RowKey) -> Option<&MedicineRow> {
        match self {
            ListView::Rows { generation, rows } if *generation == key.generation => {
                rows.get(key.index)
            }
            _ => None,
        }
    }

    fn row_mut(&mut self, key: RowKey) -> Option<&mut MedicineRow> {
        match self {
            ListView::Rows { generation, rows } if *generation == key.generation => {
                rows.get_mut(key.index)
            }
            _ => None,
        }
    }

    /// First row showing the medicine with this identity (its name).
    pub fn find(&self, name: &str) -> Option<&MedicineRow> {
        self.rows().iter().find(|row| row.medicine.id() == name)
    }
}

impl fmt::Display for ListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListView::NotLoaded => Ok(()),
            ListView::Notice(text) => writeln!(f, "- {text}"),
            ListView::Rows { rows, .. } => {
                for row in rows {
                    match &row.price {
                        PriceField::Display { text } => {
                            writeln!(f, "- {}  {text}", row.name_label())?
                        }
                        PriceField::Editing { input } => {
                            writeln!(f, "- {}  [{input}]", row.name_label())?
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

/// Kind of form message; drives both the style class and the shown text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            MessageKind::Success => SUCCESS_MESSAGE_TEXT,
            MessageKind::Error => ERROR_MESSAGE_TEXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormMessage {
    pub kind: MessageKind,
    pub text: &'static str,
}

impl FormMessage {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            text: kind.text(),
        }
    }
}

/// Raw values of the create form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub name: String,
    pub price: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub list: ListView,
    pub form: CreateForm,
    pub form_message: Option<FormMessage>,
    /// Text of the average-price result area.
    pub average: Option<String>,
    generation: u64,
}

impl ViewState {
    /// Replace the whole list with a fresh render of `medicines`.
    pub(crate) fn render_medicines(&mut self, medicines: Vec<Medicine>) {
        self.generation += 1;
        if medicines.is_empty() {
            self.list = ListView::Notice(EMPTY_LIST_TEXT.to_string());
            return;
        }

        let generation = self.generation;
        let rows = medicines
            .into_iter()
            .enumerate()
            .map(|(index, medicine)| MedicineRow {
                key: RowKey { generation, index },
                price: PriceField::for_medicine(&medicine),
                medicine,
            })
            .collect();
        self.list = ListView::Rows { generation, rows };
    }

    pub(crate) fn render_list_error(&mut self) {
        self.generation += 1;
        self.list = ListView::Notice(LIST_ERROR_TEXT.to_string());
    }

    pub fn row(&self, key: RowKey) -> Option<&MedicineRow> {
        self.list.row(key)
    }

    pub(crate) fn row_mut(&mut self, key: RowKey) -> Option<&mut MedicineRow> {
        self.list.row_mut(key)
    }
}

/// Text of the average-price result area for a fetched average.
pub fn average_label(average: f64) -> String {
    format!("Average Price: {}", format_price(Some(average)))
}

type Observer = Rc<dyn Fn(&ViewState)>;

#[derive(Default)]
struct DocumentInner {
    state: RefCell<ViewState>,
    observers: RefCell<Vec<Observer>>,
}

/// Shared handle to the page's [`ViewState`].
///
/// Single-threaded by construction; borrows never outlive a call, so no
/// borrow is held across an `.await` by code using this handle.
#[derive(Clone, Default)]
pub struct DocumentView {
    inner: Rc<DocumentInner>,
}

impl DocumentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.inner.state.borrow())
    }

    pub fn snapshot(&self) -> ViewState {
        self.read(ViewState::clone)
    }

    /// Mutate the view, then notify observers.
    pub fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let out = {
            let mut state = self.inner.state.borrow_mut();
            f(&mut state)
        };
        self.notify();
        out
    }

    pub fn subscribe(&self, observer: impl Fn(&ViewState) + 'static) {
        self.inner.observers.borrow_mut().push(Rc::new(observer));
    }

    fn notify(&self) {
        let observers = self.inner.observers.borrow().clone();
        let state = self.inner.state.borrow();
        for observer in observers {
            observer(&state);
        }
    }
}

impl fmt::Debug for DocumentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentView")
            .field("state", &self.inner.state.borrow())
            .field("observers", &self.inner.observers.borrow().len())
            .finish()
    }
}
