//! Leptos view of the inventory page.
//!
//! Components only render [`ViewState`] and forward events to the
//! [`InventoryClient`]; all behavior lives in the client.

use std::rc::Rc;

use leptos::*;

use crate::api::HttpInventoryApi;
use crate::client::InventoryClient;
use crate::config::ClientConfig;
use crate::frontend::browser::{BrowserDialogs, TimeoutScheduler};
use crate::view::{EditIcon, ListView, PriceField, RowKey, ViewState};

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    let client = Rc::new(InventoryClient::new(
        Rc::new(HttpInventoryApi::new(ClientConfig::from_build_env())),
        Rc::new(BrowserDialogs),
        Rc::new(TimeoutScheduler),
    ));

    let state = create_rw_signal(client.document().snapshot());
    client.document().subscribe(move |view| state.set(view.clone()));

    spawn_local({
        let client = client.clone();
        async move { client.load().await }
    });

    view! {
        <div class="app">
            <header>
                <h1>"Medicine Inventory"</h1>
            </header>

            <main>
                <MedicineForm client=client.clone() state=state/>
                <MedicineList client=client.clone() state=state/>
                <AveragePrice client=client state=state/>
            </main>
        </div>
    }
}

/// Create form plus its transient message.
#[component]
fn MedicineForm(client: Rc<InventoryClient>, state: RwSignal<ViewState>) -> impl IntoView {
    let on_submit = {
        let client = client.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            let client = client.clone();
            spawn_local(async move { client.add_medicine().await });
        }
    };
    let on_name = {
        let client = client.clone();
        move |ev: ev::Event| client.set_form_name(&event_target_value(&ev))
    };
    let on_price = move |ev: ev::Event| client.set_form_price(&event_target_value(&ev));

    let message = move || state.with(|s| s.form_message.clone());

    view! {
        <form id="medicineForm" on:submit=on_submit>
            <input
                type="text"
                id="medicineName"
                placeholder="Medicine name"
                prop:value=move || state.with(|s| s.form.name.clone())
                on:input=on_name
            />
            <input
                type="number"
                id="medicinePrice"
                step="0.01"
                placeholder="Price"
                prop:value=move || state.with(|s| s.form.price.clone())
                on:input=on_price
            />
            <button type="submit">"Add Medicine"</button>
        </form>
        <div
            id="formMessage"
            class=move || message().map(|m| m.kind.class()).unwrap_or_default()
        >
            {move || message().map(|m| m.text).unwrap_or_default()}
        </div>
    }
}

#[component]
fn MedicineList(client: Rc<InventoryClient>, state: RwSignal<ViewState>) -> impl IntoView {
    let notice = move || {
        state.with(|s| match &s.list {
            ListView::Notice(text) => Some(text.clone()),
            _ => None,
        })
    };

    view! {
        <ul id="medicines-container">
            {move || notice().map(|text| view! { <li>{text}</li> })}
            <For
                each=move || state.with(|s| s.list.row_keys())
                key=|row| *row
                children=move |row| {
                    view! { <MedicineItem client=client.clone() state=state row=row/> }
                }
            />
        </ul>
    }
}

/// One medicine row. Only the editing flag decides which element shows the
/// price, so typing into the input does not rebuild it.
#[component]
fn MedicineItem(client: Rc<InventoryClient>, state: RwSignal<ViewState>, row: RowKey) -> impl IntoView {
    let name = move || {
        state.with(|s| {
            s.row(row)
                .map(|r| r.name_label().to_string())
                .unwrap_or_default()
        })
    };
    let editing = create_memo(move |_| {
        state.with(|s| s.row(row).is_some_and(|r| r.price.is_editing()))
    });
    let price_text = move || {
        state.with(|s| match s.row(row).map(|r| &r.price) {
            Some(PriceField::Display { text }) => text.clone(),
            Some(PriceField::Editing { input }) => input.clone(),
            None => String::new(),
        })
    };
    let icon = move || if editing.get() { EditIcon::Save } else { EditIcon::Edit };

    let on_edit = {
        let client = client.clone();
        move |_: ev::MouseEvent| {
            let client = client.clone();
            spawn_local(async move { client.activate_edit_control(row).await });
        }
    };
    let on_delete = {
        let client = client.clone();
        move |_: ev::MouseEvent| {
            let name = state.with_untracked(|s| s.row(row).map(|r| r.medicine.name.clone()));
            if let Some(name) = name {
                let client = client.clone();
                spawn_local(async move { client.delete_medicine(&name).await });
            }
        }
    };
    let on_input = move |ev: ev::Event| client.edit_price_input(row, &event_target_value(&ev));

    view! {
        <li class="medicine-box">
            <div class="medicine-info">
                <strong>{name}</strong>
                <Show
                    when=move || editing.get()
                    fallback=move || view! { <div class="price-info">{price_text}</div> }
                >
                    <input
                        type="number"
                        step="0.01"
                        class="price-input"
                        prop:value=price_text
                        on:input=on_input.clone()
                    />
                </Show>
            </div>
            <div class="edit-delete-buttons">
                <button class="edit-button" on:click=on_edit>
                    <img src=move || icon().asset() alt=move || icon().alt() class="icon"/>
                </button>
                <button class="delete-button" on:click=on_delete>
                    <img src="deleteButton.png" alt="Delete" class="icon"/>
                </button>
            </div>
        </li>
    }
}

#[component]
fn AveragePrice(client: Rc<InventoryClient>, state: RwSignal<ViewState>) -> impl IntoView {
    let on_click = move |_: ev::MouseEvent| {
        let client = client.clone();
        spawn_local(async move { client.calculate_average_price().await });
    };

    view! {
        <section class="average-price">
            <button id="calculate-average-price-button" on:click=on_click>
                "Calculate Average Price"
            </button>
            <p id="average-price-result">
                {move || state.with(|s| s.average.clone().unwrap_or_default())}
            </p>
        </section>
    }
}
