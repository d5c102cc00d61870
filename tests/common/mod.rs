use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// How the mock answers a status query for an identity it has no record of.
/// Deployments of the real endpoint have been observed doing both.
#[derive(Clone, Copy)]
pub enum UnknownIdentity {
    NotFound,
    PendingDefault,
}

/// In-process stand-in for the remote status store: an upsert-by-email map
/// behind the `POST /submit` / `GET /status` wire contract.
#[derive(Clone)]
pub struct MockRemote {
    statuses: Arc<Mutex<HashMap<String, String>>>,
    fail_submit: Arc<AtomicBool>,
    variant: UnknownIdentity,
}

impl MockRemote {
    pub fn set_status(&self, email: &str, status: &str) {
        self.statuses
            .lock()
            .unwrap()
            .insert(email.to_string(), status.to_string());
    }

    pub fn status_of(&self, email: &str) -> Option<String> {
        self.statuses.lock().unwrap().get(email).cloned()
    }

    pub fn fail_next_submits(&self) {
        self.fail_submit.store(true, Ordering::SeqCst);
    }
}

/// Serves the mock on an ephemeral port and returns its base URL plus a
/// handle for seeding and inspecting the remote map.
pub async fn spawn_mock_remote(variant: UnknownIdentity) -> (String, MockRemote) {
    init_tracing();
    let state = MockRemote {
        statuses: Arc::default(),
        fail_submit: Arc::default(),
        variant,
    };
    let app = Router::new()
        .route("/submit", post(submit))
        .route("/status", get(status))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

async fn submit(
    State(state): State<MockRemote>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if state.fail_submit.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "unexpected failure"})),
        );
    }
    for field in ["name", "email", "phone"] {
        if body.get(field).and_then(Value::as_str).is_none() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("{field} is required")})),
            );
        }
    }
    let email = body["email"].as_str().unwrap();
    state
        .statuses
        .lock()
        .unwrap()
        .insert(email.to_string(), "submitted".to_string());
    (
        StatusCode::OK,
        Json(json!({"message": "Application submitted"})),
    )
}

async fn status(
    State(state): State<MockRemote>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let Some(email) = params.get("email") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "email is required"})),
        );
    };
    match state.statuses.lock().unwrap().get(email) {
        Some(status) => (StatusCode::OK, Json(json!({"status": status}))),
        None => match state.variant {
            UnknownIdentity::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "unknown identity"})),
            ),
            UnknownIdentity::PendingDefault => (StatusCode::OK, Json(json!({"status": "pending"}))),
        },
    }
}
