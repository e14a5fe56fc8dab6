//! In-process stub of the remote catalog service
//!
//! An axum router serving `GET/POST {base}` and `PUT/DELETE {base}/{id}` on
//! a background tokio runtime. State lives in memory and can be inspected
//! from tests; the blocking client under test talks to it over real HTTP.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::runtime::Runtime;

const BASE_PATH: &str = "/api/books";

/// A request as seen by the stub
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct Catalog {
    books: Vec<Value>,
    next_id: i64,
    fail_status: Option<u16>,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<Catalog>>;

pub struct StubCatalog {
    base: String,
    state: Shared,
    // Dropping the runtime stops the server
    _runtime: Runtime,
}

impl StubCatalog {
    /// Starts a stub pre-loaded with `books`
    pub fn start(books: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(Catalog {
            next_id: books.len() as i64 + 100,
            books,
            ..Catalog::default()
        }));

        let app = Router::new()
            .route(BASE_PATH, get(list).post(create))
            .route(&format!("{}/:id", BASE_PATH), put(replace).delete(remove))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();
        runtime.spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            state,
            _runtime: runtime,
        }
    }

    /// Starts a stub holding the two-book sample inventory
    pub fn with_sample() -> Self {
        Self::start(sample_books())
    }

    /// Collection URL to hand to the client
    pub fn url(&self) -> String {
        format!("{}{}", self.base, BASE_PATH)
    }

    /// Makes every following request fail with `status`
    pub fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    pub fn books(&self) -> Vec<Value> {
        self.state.lock().unwrap().books.clone()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests rendered as `METHOD path`
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

pub fn sample_books() -> Vec<Value> {
    vec![
        json!({"id": 1, "title": "Dune", "author": "Herbert", "genre": "SciFi", "quantity": 1}),
        json!({"id": 2, "title": "Emma", "author": "Austen", "genre": "Classic", "quantity": 5}),
    ]
}

/// A closed local URL, for transport failures
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{BASE_PATH}")
}

/// Records every request and short-circuits when a failure is armed
async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let fail_status = {
        let mut catalog = state.lock().unwrap();
        catalog.requests.push(Recorded {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            body: serde_json::from_slice(&bytes).ok(),
        });
        catalog.fail_status
    };

    if let Some(status) = fail_status {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"error": "stub failure"}))).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn list(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().books.clone()))
}

async fn create(State(state): State<Shared>, Json(mut book): Json<Value>) -> impl IntoResponse {
    let mut catalog = state.lock().unwrap();
    book["id"] = json!(catalog.next_id);
    catalog.next_id += 1;
    catalog.books.push(book.clone());
    (StatusCode::CREATED, Json(book))
}

async fn replace(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut book): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut catalog = state.lock().unwrap();
    let slot = catalog
        .books
        .iter_mut()
        .find(|b| id_matches(b, &id))
        .ok_or(StatusCode::NOT_FOUND)?;
    book["id"] = slot["id"].clone();
    *slot = book.clone();
    Ok(Json(book))
}

async fn remove(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut catalog = state.lock().unwrap();
    let before = catalog.books.len();
    catalog.books.retain(|b| !id_matches(b, &id));
    if catalog.books.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn id_matches(book: &Value, id: &str) -> bool {
    match &book["id"] {
        Value::Number(n) => n.to_string() == id,
        Value::String(s) => s == id,
        _ => false,
    }
}
