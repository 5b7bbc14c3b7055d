//! Fakes for driving page controllers without a backend, a clock or a screen.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use hospital_display::api::{ApiClient, ApiError, ApiRequest, ApiResponse, Fetch, Method};
use hospital_display::audio::{AudioCue, Tone};
use hospital_display::clock::{DisplayZone, FixedClock};
use hospital_display::controllers::{PageContext, Timing};
use hospital_display::schedule::ManualScheduler;
use hospital_display::surface::{Region, Surface};
use hospital_display::views::View;

/// 2026-10-16 14:30:05 in IST
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 5).unwrap()
}

// =============================================================================
// Fetch
// =============================================================================

#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, Value),
    Raw(u16, String),
    /// Transport failure
    Fail(String),
    /// The transport itself panics
    Panic,
}

/// Scripted backend. Routes are sticky; unknown routes answer 404.
#[derive(Default)]
pub struct FakeFetch {
    routes: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
    /// Successful document saves replace what the GET route serves
    persist_saves: AtomicBool,
}

impl FakeFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
        self
    }

    pub fn get(&self, path: &str, body: Value) -> &Self {
        self.on(Method::Get, path, Reply::Json(200, body))
    }

    pub fn persist_saves(&self) -> &Self {
        self.persist_saves.store(true, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last_body(&self, method: Method, path: &str) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| r.body.clone())
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.path.clone()))
            .cloned()
            .unwrap_or_else(|| Reply::Json(404, json!({"error": "Resource not found"})));
        let response = match reply {
            Reply::Json(status, body) => ApiResponse {
                status,
                body: body.to_string(),
            },
            Reply::Raw(status, body) => ApiResponse { status, body },
            Reply::Fail(message) => return Err(ApiError::Transport(message)),
            Reply::Panic => panic!("transport exploded on {}", request.path),
        };
        if request.method == Method::Post
            && response.is_success()
            && self.persist_saves.load(Ordering::SeqCst)
        {
            if let Some(body) = &request.body {
                self.get(&request.path, body.clone());
            }
        }
        Ok(response)
    }
}

// =============================================================================
// Surface
// =============================================================================

pub struct RecordingSurface {
    mounted: Mutex<HashSet<Region>>,
    renders: Mutex<Vec<(Region, View)>>,
}

impl RecordingSurface {
    pub fn new(regions: &[Region]) -> Arc<Self> {
        Arc::new(Self {
            mounted: Mutex::new(regions.iter().copied().collect()),
            renders: Mutex::new(Vec::new()),
        })
    }

    pub fn unmount(&self, region: Region) {
        self.mounted.lock().unwrap().remove(&region);
    }

    pub fn renders(&self) -> Vec<(Region, View)> {
        self.renders.lock().unwrap().clone()
    }

    pub fn count(&self, region: Region) -> usize {
        self.renders
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == region)
            .count()
    }

    pub fn last(&self, region: Region) -> Option<View> {
        self.renders
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(r, _)| *r == region)
            .map(|(_, v)| v.clone())
    }

    pub fn clear(&self) {
        self.renders.lock().unwrap().clear();
    }
}

impl Surface for RecordingSurface {
    fn is_mounted(&self, region: Region) -> bool {
        self.mounted.lock().unwrap().contains(&region)
    }

    fn render(&self, region: Region, view: View) {
        self.renders.lock().unwrap().push((region, view));
    }
}

// =============================================================================
// Audio
// =============================================================================

#[derive(Default)]
pub struct CountingAudio {
    plays: AtomicUsize,
    closed: AtomicBool,
}

impl CountingAudio {
    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl AudioCue for CountingAudio {
    fn play(&self, _tone: Tone) {
        if !self.is_closed() {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// =============================================================================
// Harness
// =============================================================================

pub struct Harness {
    pub fetch: Arc<FakeFetch>,
    pub surface: Arc<RecordingSurface>,
    pub scheduler: Arc<ManualScheduler>,
    pub audio: Arc<CountingAudio>,
}

impl Harness {
    pub fn new(regions: &[Region]) -> Self {
        Self {
            fetch: FakeFetch::new(),
            surface: RecordingSurface::new(regions),
            scheduler: Arc::new(ManualScheduler::new()),
            audio: Arc::new(CountingAudio::default()),
        }
    }

    /// Harness whose backend serves the sample documents below.
    pub fn with_samples(regions: &[Region]) -> Self {
        let harness = Self::new(regions);
        harness
            .fetch
            .get("/api/alerts", alerts_json())
            .get("/api/tokens", tokens_json())
            .get("/api/inventory", inventory_json())
            .get("/api/schedules", schedules_json());
        harness
    }

    pub fn context(&self) -> PageContext {
        PageContext {
            api: ApiClient::new(self.fetch.clone()),
            clock: Arc::new(FixedClock(now())),
            zone: DisplayZone::default(),
            surface: self.surface.clone(),
            scheduler: self.scheduler.clone(),
            audio: self.audio.clone(),
            timing: Timing::default(),
        }
    }
}

// =============================================================================
// Sample documents
// =============================================================================

pub fn alerts_json() -> Value {
    json!({
        "active_alerts": [
            {
                "id": 1,
                "type": "code_blue",
                "message": "Cardiac arrest",
                "location": "ICU Bed 4",
                "timestamp": "2026-10-16T08:55:00",
                "active": true
            },
            {
                "id": 2,
                "type": "staff_only",
                "message": "Shift handover at 3pm",
                "location": null,
                "timestamp": "2026-10-16T08:00:00",
                "active": true
            }
        ],
        "alert_history": [],
        "last_updated": "2026-10-16T08:55:00"
    })
}

pub fn tokens_json() -> Value {
    json!({
        "current_tokens": {"cardiology": "C-12", "general": "G-3"},
        "queue": {
            "cardiology": [
                {"id": 41, "token_number": "C-13", "patient_type": "Senior", "status": "waiting"},
                {"id": 42, "token_number": "C-14"}
            ],
            "general": []
        },
        "last_updated": "2026-10-16T08:50:00"
    })
}

pub fn inventory_json() -> Value {
    json!({
        "medications": {
            "Adrenaline": {"quantity": 4, "unit": "ampoules", "min_threshold": 5, "max_capacity": 50, "category": "Emergency"},
            "Paracetamol": {"quantity": 400, "unit": "tablets", "min_threshold": 100, "max_capacity": 1000}
        },
        "supplies": {
            "Gloves": {"quantity": 20, "unit": "boxes", "min_threshold": 10, "max_capacity": 100, "category": "PPE"}
        },
        "last_updated": "2026-10-16T07:30:00"
    })
}

pub fn schedules_json() -> Value {
    json!({
        "ot_schedules": {
            "OT1_2026-10-16_09:00": {
                "start_time": "09:00",
                "end_time": "11:00",
                "procedure": "Knee replacement",
                "doctor": "Dr. Menon",
                "status": "in_progress"
            },
            "OT2_2026-10-17_09:00": {
                "start_time": "09:00",
                "end_time": "10:00",
                "procedure": "Cataract surgery",
                "doctor": "Dr. Shah",
                "status": "scheduled"
            }
        },
        "consultations": {
            "cardiology_2026-10-16": {
                "department": "Cardiology",
                "doctor": "Dr. Iyer",
                "time_slot": "10:00-13:00",
                "completed": 5,
                "total_appointments": 20,
                "status": "ongoing"
            }
        },
        "last_updated": "2026-10-16T06:00:00"
    })
}
