//! Backend wire types and the typed client the page controllers read through.
//!
//! Transport is abstracted behind [`Fetch`] so controllers can run against the
//! reqwest transport in production and a scripted fake in tests.

#[cfg(feature = "runner")]
pub mod http;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never produced a response (connection refused, DNS, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// Response arrived with a non-2xx status
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Body was not the JSON shape we expected
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

// =============================================================================
// Transport seam
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the backend origin, e.g. `/api/alerts`
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP exchange with the backend. No timeout is applied here; a hung
/// request stalls only the caller awaiting it.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

// =============================================================================
// Alerts
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AlertsResponse {
    #[serde(default)]
    pub active_alerts: Vec<Alert>,
    #[serde(default)]
    pub alert_history: Vec<Alert>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct NewAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub location: String,
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct QueueEntry {
    #[serde(default)]
    pub token_number: String,
    #[serde(default)]
    pub patient_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Backend-owned fields (`id`, `department`, `is_current`) round-trip untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct TokensDocument {
    #[serde(default)]
    pub current_tokens: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub queue: BTreeMap<String, Vec<QueueEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AdvanceResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Inventory
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub min_threshold: i64,
    #[serde(default)]
    pub max_capacity: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct InventoryDocument {
    #[serde(default)]
    pub medications: BTreeMap<String, InventoryItem>,
    #[serde(default)]
    pub supplies: BTreeMap<String, InventoryItem>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// =============================================================================
// Schedules
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct OtSchedule {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub procedure: Option<String>,
    /// Backend serializes the operating surgeon as `doctor`
    #[serde(default, alias = "doctor")]
    pub surgeon: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub completed: i64,
    #[serde(default)]
    pub total_appointments: i64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SchedulesDocument {
    #[serde(default)]
    pub ot_schedules: BTreeMap<String, OtSchedule>,
    #[serde(default)]
    pub consultations: BTreeMap<String, Consultation>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

// =============================================================================
// Typed client
// =============================================================================

/// Typed access to the display backend over any [`Fetch`] transport.
#[derive(Clone)]
pub struct ApiClient {
    fetch: Arc<dyn Fetch>,
}

impl ApiClient {
    pub fn new(fetch: Arc<dyn Fetch>) -> Self {
        Self { fetch }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .fetch
            .send(ApiRequest {
                method: Method::Get,
                path: path.to_string(),
                body: None,
            })
            .await?;
        if !response.is_success() {
            return Err(status_error(&response));
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Send a write and require a 2xx; the response body is not interpreted.
    async fn write(
        &self,
        method: Method,
        path: String,
        body: Option<Value>,
    ) -> Result<(), ApiError> {
        let response = self.fetch.send(ApiRequest { method, path, body }).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(status_error(&response))
        }
    }

    pub async fn alerts(&self) -> Result<AlertsResponse, ApiError> {
        self.get_json("/api/alerts").await
    }

    pub async fn create_alert(&self, alert: &NewAlert) -> Result<(), ApiError> {
        let body = serde_json::to_value(alert)?;
        self.write(Method::Post, "/api/alerts".to_string(), Some(body))
            .await
    }

    pub async fn dismiss_alert(&self, id: i64) -> Result<(), ApiError> {
        self.write(Method::Delete, format!("/api/alerts/{}", id), None)
            .await
    }

    pub async fn tokens(&self) -> Result<TokensDocument, ApiError> {
        self.get_json("/api/tokens").await
    }

    pub async fn save_tokens(&self, document: &TokensDocument) -> Result<(), ApiError> {
        let body = serde_json::to_value(document)?;
        self.write(Method::Post, "/api/tokens".to_string(), Some(body))
            .await
    }

    /// POST to the advance endpoint. On a non-2xx reply the `Status` message
    /// is the backend's JSON `message`, or empty if it sent none.
    pub async fn advance_token(&self, department: &str) -> Result<AdvanceResponse, ApiError> {
        let response = self
            .fetch
            .send(ApiRequest {
                method: Method::Post,
                path: format!("/api/tokens/advance/{}", urlencoding::encode(department)),
                body: None,
            })
            .await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                message: json_message(&response.body).unwrap_or_default(),
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn inventory(&self) -> Result<InventoryDocument, ApiError> {
        self.get_json("/api/inventory").await
    }

    pub async fn save_inventory(&self, document: &InventoryDocument) -> Result<(), ApiError> {
        let body = serde_json::to_value(document)?;
        self.write(Method::Post, "/api/inventory".to_string(), Some(body))
            .await
    }

    pub async fn schedules(&self) -> Result<SchedulesDocument, ApiError> {
        self.get_json("/api/schedules").await
    }
}

fn json_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Pull a human-readable message out of an error body (`{"message": ..}` or
/// `{"error": ..}`), falling back to the raw body.
fn status_error(response: &ApiResponse) -> ApiError {
    let message =
        json_message(&response.body).unwrap_or_else(|| response.body.trim().to_string());
    ApiError::Status {
        status: response.status,
        message,
    }
}
