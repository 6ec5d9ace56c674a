use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use medstock_client::api::{ApiError, HttpInventoryApi, InventoryApi};
use medstock_client::view::{AVERAGE_ERROR_TEXT, LIST_ERROR_TEXT, SUCCESS_MESSAGE_TEXT};
use medstock_client::{ClientConfig, Dialogs, InventoryClient, ListView, PriceField, Scheduler};
use medstock_inventory::{NewMedicine, PriceUpdate};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct PriceForm {
    name: String,
    price: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct NameForm {
    name: String,
}

/// In-memory stand-in for the Inventory API.
#[derive(Clone, Default)]
struct Store {
    medicines: Arc<Mutex<Vec<(String, f64)>>>,
    received: Arc<Mutex<Vec<String>>>,
}

impl Store {
    fn seeded(items: &[(&str, f64)]) -> Self {
        let store = Self::default();
        *store.medicines.lock().unwrap() = items
            .iter()
            .map(|(name, price)| (name.to_string(), *price))
            .collect();
        store
    }

    fn log(&self, entry: String) {
        self.received.lock().unwrap().push(entry);
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

async fn list(State(store): State<Store>) -> Json<Value> {
    store.log("list".into());
    let medicines: Vec<Value> = store
        .medicines
        .lock()
        .unwrap()
        .iter()
        .map(|(name, price)| json!({ "name": name, "price": price }))
        .collect();
    Json(json!({ "medicines": medicines }))
}

async fn create(State(store): State<Store>, Form(form): Form<PriceForm>) -> (StatusCode, Json<Value>) {
    store.log(format!("create {} {}", form.name, form.price));
    let mut medicines = store.medicines.lock().unwrap();
    if medicines.iter().any(|(name, _)| *name == form.name) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Medicine already exists" })),
        );
    }
    let price = form.price.parse().unwrap_or(0.0);
    medicines.push((form.name.clone(), price));
    (
        StatusCode::OK,
        Json(json!({ "message": format!("Medicine created successfully with name: {}", form.name) })),
    )
}

async fn update(State(store): State<Store>, Form(form): Form<PriceForm>) -> (StatusCode, Json<Value>) {
    store.log(format!("update {} {}", form.name, form.price));
    let mut medicines = store.medicines.lock().unwrap();
    match medicines.iter_mut().find(|(name, _)| *name == form.name) {
        Some(entry) => {
            entry.1 = form.price.parse().unwrap_or(entry.1);
            (StatusCode::OK, Json(json!({ "message": "Medicine updated successfully" })))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Medicine not found" }))),
    }
}

async fn remove(State(store): State<Store>, Form(form): Form<NameForm>) -> Json<Value> {
    store.log(format!("delete {}", form.name));
    store
        .medicines
        .lock()
        .unwrap()
        .retain(|(name, _)| *name != form.name);
    Json(json!({ "message": "Medicine deleted successfully" }))
}

async fn average(State(store): State<Store>) -> Json<Value> {
    store.log("average".into());
    let medicines = store.medicines.lock().unwrap();
    if medicines.is_empty() {
        return Json(json!({ "error": "No medicines" }));
    }
    let total: f64 = medicines.iter().map(|(_, price)| price).sum();
    Json(json!({ "average": total / medicines.len() as f64 }))
}

fn stub_app(store: Store) -> Router {
    Router::new()
        .route("/medicines", get(list))
        .route("/create", post(create))
        .route("/update", post(update))
        .route("/delete", delete(remove))
        .route("/average-price", get(average))
        .with_state(store)
}

fn failing_app() -> Router {
    let fail = || async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "database unavailable" })),
        )
    };
    Router::new()
        .route("/medicines", get(fail))
        .route("/average-price", get(fail))
}

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn api(&self) -> HttpInventoryApi {
        HttpInventoryApi::new(ClientConfig::new(&self.base_url))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[derive(Default)]
struct Prompts {
    alerts: RefCell<Vec<String>>,
}

impl Dialogs for Prompts {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Never fires; these tests do not wait for messages to clear.
struct NoTimers;

impl Scheduler for NoTimers {
    fn schedule(&self, _delay: Duration, _task: Box<dyn FnOnce()>) {}
}

#[tokio::test]
async fn list_preserves_server_order() {
    let store = Store::seeded(&[("Zinc", 1.0), ("Aspirin", 4.5)]);
    let server = TestServer::spawn(stub_app(store)).await;

    let medicines = server.api().list_medicines().await.unwrap();
    let names: Vec<_> = medicines.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Zinc", "Aspirin"]);
    assert_eq!(medicines[1].price, Some(4.5));
}

#[tokio::test]
async fn mutations_send_form_encoded_fields() {
    let store = Store::seeded(&[("Aspirin", 4.5)]);
    let server = TestServer::spawn(stub_app(store.clone())).await;
    let api = server.api();

    let created = api
        .create_medicine(&NewMedicine::from_form("Ibuprofen", "3.2").unwrap())
        .await
        .unwrap();
    assert_eq!(
        created.message.as_deref(),
        Some("Medicine created successfully with name: Ibuprofen")
    );

    api.update_price(&PriceUpdate::from_input("Aspirin", "5").unwrap())
        .await
        .unwrap();
    api.delete_medicine("Ibuprofen").await.unwrap();

    assert_eq!(
        store.received(),
        vec!["create Ibuprofen 3.2", "update Aspirin 5", "delete Ibuprofen"]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error_with_server_message() {
    let store = Store::seeded(&[("Aspirin", 4.5)]);
    let server = TestServer::spawn(stub_app(store)).await;

    let err = server
        .api()
        .create_medicine(&NewMedicine::from_form("Aspirin", "1").unwrap())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 409,
            message: Some("Medicine already exists".into())
        }
    );

    let failing = TestServer::spawn(failing_app()).await;
    let err = failing.api().list_medicines().await.unwrap_err();
    assert_eq!(err.server_message(), Some("database unavailable"));
}

#[tokio::test]
async fn average_without_field_is_malformed() {
    let server = TestServer::spawn(stub_app(Store::default())).await;
    let err = server.api().average_price().await.unwrap_err();
    assert!(matches!(err, ApiError::Malformed(_)));

    let store = Store::seeded(&[("A", 10.0), ("B", 14.69)]);
    let server = TestServer::spawn(stub_app(store)).await;
    let average = server.api().average_price().await.unwrap();
    assert!((average - 12.345).abs() < 1e-9);
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpInventoryApi::new(ClientConfig::new(format!("http://{addr}")));
    let err = api.list_medicines().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn client_runs_full_flow_against_http_api() {
    let store = Store::seeded(&[("Aspirin", 4.5)]);
    let server = TestServer::spawn(stub_app(store.clone())).await;
    let dialogs = Rc::new(Prompts::default());
    let client = InventoryClient::new(Rc::new(server.api()), dialogs.clone(), Rc::new(NoTimers));

    client.load().await;

    client.set_form_name("Ibuprofen");
    client.set_form_price("3.999");
    client.add_medicine().await;
    let view = client.document().snapshot();
    assert_eq!(view.form_message.map(|m| m.text), Some(SUCCESS_MESSAGE_TEXT));
    assert_eq!(view.list.rows().len(), 2);

    let row = view.list.find("Aspirin").unwrap().key;
    client.activate_edit_control(row).await;
    client.edit_price_input(row, "6.75");
    client.activate_edit_control(row).await;
    let price = client.document().read(|view| view.row(row).unwrap().price.clone());
    assert_eq!(price, PriceField::Display { text: "£6.75".into() });

    client.delete_medicine("Ibuprofen").await;
    client.calculate_average_price().await;
    let view = client.document().snapshot();
    assert_eq!(view.list.rows().len(), 1);
    assert_eq!(view.average.as_deref(), Some("Average Price: £6.75"));

    assert_eq!(
        dialogs.alerts.borrow().clone(),
        vec![
            "Medicine updated successfully".to_string(),
            "Medicine deleted successfully".to_string()
        ]
    );
    assert_eq!(
        store.received(),
        vec![
            "list",
            "create Ibuprofen 3.99",
            "list",
            "update Aspirin 6.75",
            "delete Ibuprofen",
            "list",
            "average"
        ]
    );
}

#[tokio::test]
async fn client_shows_literal_errors_when_api_fails() {
    let server = TestServer::spawn(failing_app()).await;
    let client = InventoryClient::new(
        Rc::new(server.api()),
        Rc::new(Prompts::default()),
        Rc::new(NoTimers),
    );

    client.load().await;
    client.calculate_average_price().await;

    let view = client.document().snapshot();
    assert_eq!(view.list, ListView::Notice(LIST_ERROR_TEXT.to_string()));
    assert_eq!(view.average.as_deref(), Some(AVERAGE_ERROR_TEXT));
}
