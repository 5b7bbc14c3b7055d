//! Mock hospital backend for HTTP round-trip testing
//!
//! Serves the four JSON documents under /api and applies writes in memory.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

type Reply = (StatusCode, Json<Value>);

/// Backend documents
struct MockBackendState {
    alerts: Vec<Value>,
    next_alert_id: i64,
    tokens: Value,
    inventory: Value,
    schedules: Value,
    /// Answer every route with 500 when set
    failing: bool,
}

pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<RwLock<MockBackendState>>,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock backend on a random port
    pub async fn start() -> Self {
        let state = Arc::new(RwLock::new(MockBackendState {
            alerts: Vec::new(),
            next_alert_id: 1,
            tokens: json!({"current_tokens": {}, "queue": {}}),
            inventory: json!({"medications": {}, "supplies": {}}),
            schedules: json!({"ot_schedules": {}, "consultations": {}}),
            failing: false,
        }));

        let app = Router::new()
            .route("/api/alerts", get(get_alerts).post(create_alert))
            .route("/api/alerts/{id}", delete(dismiss_alert))
            .route("/api/tokens", get(get_tokens).post(save_tokens))
            .route("/api/tokens/advance/{department}", post(advance_token))
            .route("/api/inventory", get(get_inventory).post(save_inventory))
            .route("/api/schedules", get(get_schedules))
            .fallback(|| async {
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"status": "error", "message": "Resource not found"})),
                )
            })
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_tokens(&self, tokens: Value) {
        self.state.write().await.tokens = tokens;
    }

    pub async fn tokens(&self) -> Value {
        self.state.read().await.tokens.clone()
    }

    pub async fn set_inventory(&self, inventory: Value) {
        self.state.write().await.inventory = inventory;
    }

    pub async fn inventory(&self) -> Value {
        self.state.read().await.inventory.clone()
    }

    pub async fn active_alerts(&self) -> Vec<Value> {
        self.state
            .read()
            .await
            .alerts
            .iter()
            .filter(|a| a["active"] == json!(true))
            .cloned()
            .collect()
    }

    pub async fn set_failing(&self, failing: bool) {
        self.state.write().await.failing = failing;
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

type Shared = State<Arc<RwLock<MockBackendState>>>;

fn server_error() -> Reply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"status": "error", "message": "Internal server error"})),
    )
}

fn ok(message: &str) -> Reply {
    (
        StatusCode::OK,
        Json(json!({"status": "success", "message": message})),
    )
}

async fn get_alerts(State(state): Shared) -> Reply {
    let state = state.read().await;
    if state.failing {
        return server_error();
    }
    let active: Vec<&Value> = state
        .alerts
        .iter()
        .rev()
        .filter(|a| a["active"] == json!(true))
        .collect();
    (
        StatusCode::OK,
        Json(json!({"active_alerts": active, "alert_history": []})),
    )
}

async fn create_alert(State(state): Shared, Json(body): Json<Value>) -> Reply {
    let mut state = state.write().await;
    if state.failing {
        return server_error();
    }
    let id = state.next_alert_id;
    state.next_alert_id += 1;
    state.alerts.push(json!({
        "id": id,
        "type": body.get("type").cloned().unwrap_or(json!("general")),
        "message": body.get("message").cloned().unwrap_or(json!("")),
        "location": body.get("location").cloned().unwrap_or(json!("")),
        "timestamp": "2026-10-16T09:00:00",
        "active": true
    }));
    ok("Alert created successfully")
}

async fn dismiss_alert(State(state): Shared, Path(id): Path<i64>) -> Reply {
    let mut state = state.write().await;
    if state.failing {
        return server_error();
    }
    match state.alerts.iter_mut().find(|a| a["id"] == json!(id)) {
        Some(alert) => {
            alert["active"] = json!(false);
            ok("Alert dismissed successfully")
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Resource not found"})),
        ),
    }
}

async fn get_tokens(State(state): Shared) -> Reply {
    let state = state.read().await;
    if state.failing {
        return server_error();
    }
    (StatusCode::OK, Json(state.tokens.clone()))
}

async fn save_tokens(State(state): Shared, Json(body): Json<Value>) -> Reply {
    let mut state = state.write().await;
    if state.failing {
        return server_error();
    }
    state.tokens = body;
    ok("Tokens updated successfully")
}

/// Call the first waiting token of `department`.
async fn advance_token(State(state): Shared, Path(department): Path<String>) -> Reply {
    let mut state = state.write().await;
    if state.failing {
        return server_error();
    }
    let next = state.tokens["queue"]
        .get_mut(&department)
        .and_then(Value::as_array_mut)
        .and_then(|queue| {
            let index = queue.iter().position(|e| e["status"] == json!("waiting"))?;
            Some(queue.remove(index))
        });
    match next {
        Some(entry) => {
            let token = entry["token_number"].clone();
            state.tokens["current_tokens"][&department] = token.clone();
            let message = format!("Advanced to token {}", token.as_str().unwrap_or_default());
            ok(&message)
        }
        None => (
            StatusCode::OK,
            Json(json!({"status": "info", "message": "No tokens in queue"})),
        ),
    }
}

async fn get_inventory(State(state): Shared) -> Reply {
    let state = state.read().await;
    if state.failing {
        return server_error();
    }
    (StatusCode::OK, Json(state.inventory.clone()))
}

async fn save_inventory(State(state): Shared, Json(body): Json<Value>) -> Reply {
    let mut state = state.write().await;
    if state.failing {
        return server_error();
    }
    state.inventory = body;
    ok("Inventory updated successfully")
}

async fn get_schedules(State(state): Shared) -> Reply {
    let state = state.read().await;
    if state.failing {
        return server_error();
    }
    (StatusCode::OK, Json(state.schedules.clone()))
}
