#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use once_cell::sync::Lazy;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub static DIRECTORY: Lazy<Value> = Lazy::new(|| {
    json!([
        {
            "id": 101,
            "email": "A@x.com",
            "office_email": "alice@office.example",
            "full_name": "Alice Example",
            "nickname": "Ali",
            "score": 4
        },
        {
            "id": "E-202",
            "email": "bob@x.com",
            "office_email": "bob@office.example",
            "full_name": "Bob Example",
            "nickname": "Bobby",
            "score": 0
        }
    ])
});

pub const COMPANIES: [&str; 2] = ["Acme", "Globex"];

/// Stand-in for the configuration and attendance endpoints.
#[derive(Clone)]
pub struct MockBackend {
    received: Arc<Mutex<Vec<Value>>>,
    reply: Arc<Mutex<(StatusCode, Value)>>,
    company_hits: Arc<AtomicUsize>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new((
                StatusCode::OK,
                json!({ "status": "checked_in", "time": "09:00:00 AM", "ip": "127.0.0.1" }),
            ))),
            company_hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn reply_with(&self, status: StatusCode, body: Value) {
        *self.reply.lock().unwrap() = (status, body);
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }

    pub fn company_hits(&self) -> usize {
        self.company_hits.load(Ordering::SeqCst)
    }

    /// Serves on a random local port and returns the base URL.
    pub async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/config/employees", get(employees))
            .route("/config/companies", get(companies))
            .route("/attendance", post(attendance))
            .with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend stopped");
        });
        format!("http://{addr}")
    }
}

async fn employees() -> Json<Value> {
    Json(DIRECTORY.clone())
}

async fn companies(State(mock): State<MockBackend>) -> Json<Value> {
    mock.company_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "companies": COMPANIES }))
}

async fn attendance(
    State(mock): State<MockBackend>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.received.lock().unwrap().push(body);
    let (status, reply) = mock.reply.lock().unwrap().clone();
    (status, Json(reply))
}

/// An unsigned JWT carrying only an email claim, as the sign-in widget would hand over.
pub fn credential(email: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "email": email, "email_verified": true }).to_string());
    format!("{header}.{payload}.signature")
}
