//! An in-process stand-in for the remote backend.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use time::macros::datetime;
use tokio::{net::TcpListener, task::JoinHandle};

use crate::transaction::{Amount, CategoryCatalog, Transaction, TransactionType};

pub(crate) const TEST_EMAIL: &str = "test@example.com";
pub(crate) const TEST_PASSWORD: &str = "password123";
pub(crate) const TEST_TOKEN: &str = "test-token";

#[derive(Clone)]
struct BackendState {
    transactions: Value,
    authorization_headers: Arc<Mutex<Vec<Option<String>>>>,
    added_transactions: Arc<AtomicUsize>,
}

/// A backend listening on a random local port. Stops when dropped.
pub(crate) struct StubBackend {
    address: SocketAddr,
    state: BackendState,
    task: JoinHandle<()>,
}

impl StubBackend {
    /// Registering with this email fails because the account already exists.
    pub(crate) const TAKEN_EMAIL: &'static str = "taken@example.com";
    /// Logging in with this email succeeds without a token being issued.
    pub(crate) const NO_TOKEN_EMAIL: &'static str = "no-token@example.com";
    /// Logging in with this email is refused with 400 Bad Request.
    pub(crate) const BAD_REQUEST_EMAIL: &'static str = "bad-request@example.com";

    /// Start a backend that serves [StubBackend::transactions].
    pub(crate) async fn start() -> Self {
        Self::start_with_transactions(Self::transactions_json()).await
    }

    /// Start a backend that answers `GET /transactions` with `transactions_json`.
    pub(crate) async fn start_with_transactions(transactions_json: Value) -> Self {
        let state = BackendState {
            transactions: transactions_json,
            authorization_headers: Arc::default(),
            added_transactions: Arc::default(),
        };

        let app = Router::new()
            .route("/login", post(log_in))
            .route("/register", post(register))
            .route("/logout", post(log_out))
            .route("/profile", get(profile))
            .route("/transactions", get(transactions))
            .route("/add-transaction", post(add_transaction))
            .with_state(state.clone());

        Self::serve(app, state).await
    }

    /// Start a backend that answers every request with a 500 error.
    pub(crate) async fn start_failing() -> Self {
        let state = BackendState {
            transactions: Value::Null,
            authorization_headers: Arc::default(),
            added_transactions: Arc::default(),
        };

        let app = Router::new().fallback(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Database unavailable" })),
            )
        });

        Self::serve(app, state).await
    }

    async fn serve(app: Router, state: BackendState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind stub backend");
        let address = listener
            .local_addr()
            .expect("Could not get stub backend address");
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub backend stopped unexpectedly");
        });

        Self {
            address,
            state,
            task,
        }
    }

    /// The base URL to point an API client at.
    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// The `Authorization` header of every request to an authenticated route.
    pub(crate) fn authorization_headers(&self) -> Vec<Option<String>> {
        self.state
            .authorization_headers
            .lock()
            .expect("Could not lock authorization headers")
            .clone()
    }

    /// How many transactions were added through `POST /add-transaction`.
    pub(crate) fn added_transactions(&self) -> usize {
        self.state.added_transactions.load(Ordering::SeqCst)
    }

    /// The fixture transactions as JSON, the way the backend sends them.
    pub(crate) fn transactions_json() -> Value {
        json!([
            {
                "id": "t1",
                "amount": 100,
                "type": "income",
                "note": "Salary",
                "createdAt": "2024-01-03T02:00:00.000Z",
                "categoryName": "Other"
            },
            {
                "id": "t2",
                "amount": "40.00",
                "type": "expense",
                "note": "Groceries",
                "createdAt": "2024-01-10T05:00:00.000Z",
                "categoryName": "Food"
            },
            {
                "id": "t3",
                "amount": 10,
                "type": "expense",
                "note": "Bus fare",
                "createdAt": "2024-02-01T05:00:00.000Z",
                "categoryName": "Transport"
            },
            {
                "id": "t4",
                "amount": 5.5,
                "type": "expense",
                "note": null
            }
        ])
    }

    /// The fixture transactions as domain values.
    pub(crate) fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: "t1".to_owned(),
                amount: Amount::from_cents(10_000),
                type_: TransactionType::Income,
                note: "Salary".to_owned(),
                category: Some("Other".to_owned()),
                created_at: Some(datetime!(2024-01-03 02:00 UTC)),
            },
            Transaction {
                id: "t2".to_owned(),
                amount: Amount::from_cents(4_000),
                type_: TransactionType::Expense,
                note: "Groceries".to_owned(),
                category: Some("Food".to_owned()),
                created_at: Some(datetime!(2024-01-10 05:00 UTC)),
            },
            Transaction {
                id: "t3".to_owned(),
                amount: Amount::from_cents(1_000),
                type_: TransactionType::Expense,
                note: "Bus fare".to_owned(),
                category: Some("Transport".to_owned()),
                created_at: Some(datetime!(2024-02-01 05:00 UTC)),
            },
            Transaction {
                id: "t4".to_owned(),
                amount: Amount::from_cents(550),
                type_: TransactionType::Expense,
                note: String::new(),
                category: None,
                created_at: None,
            },
        ]
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A URL that nothing is listening on.
pub(crate) async fn unreachable_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not reserve a free port");
    let address = listener
        .local_addr()
        .expect("Could not get the reserved port");
    drop(listener);

    format!("http://{address}")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid or expired token" })),
    )
        .into_response()
}

/// Record the `Authorization` header and check it carries the test token.
fn authorize(state: &BackendState, headers: &HeaderMap) -> Result<(), Response> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    state
        .authorization_headers
        .lock()
        .expect("Could not lock authorization headers")
        .push(header.clone());

    match header {
        Some(header) if header == format!("Bearer {TEST_TOKEN}") => Ok(()),
        _ => Err(unauthorized()),
    }
}

fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn log_in(Json(body): Json<Value>) -> Response {
    let email = field(&body, "email");
    let password = field(&body, "password");

    if email == StubBackend::NO_TOKEN_EMAIL {
        return Json(json!({ "message": "Logged in" })).into_response();
    }

    if email == StubBackend::BAD_REQUEST_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }

    if email == TEST_EMAIL && password == TEST_PASSWORD {
        Json(json!({ "token": TEST_TOKEN })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn register(Json(body): Json<Value>) -> Response {
    if field(&body, "email") == StubBackend::TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already registered" })),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    )
        .into_response()
}

async fn log_out(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    Json(json!({ "message": "Logged out" })).into_response()
}

async fn profile(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    Json(json!({
        "id": 1,
        "email": TEST_EMAIL,
        "createdAt": "2024-01-01T00:00:00.000Z"
    }))
    .into_response()
}

async fn transactions(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    Json(state.transactions.clone()).into_response()
}

async fn add_transaction(
    State(state): State<BackendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authorize(&state, &headers) {
        return response;
    }

    let catalog = CategoryCatalog::default();
    let Some(category) = catalog.find(field(&body, "categoryId")) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Category not found" })),
        )
            .into_response();
    };

    let count = state.added_transactions.fetch_add(1, Ordering::SeqCst) + 1;

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Transaction added successfully",
            "transaction": {
                "id": format!("new-{count}"),
                "amount": body.get("amount").cloned().unwrap_or(Value::Null),
                "type": field(&body, "type"),
                "note": field(&body, "note"),
                "createdAt": "2024-01-15T08:00:00.000Z",
                "categoryName": category.name,
            }
        })),
    )
        .into_response()
}
