//! Page controllers: one object per display page, built from injected
//! capabilities so tests can swap every one of them for a fake.

pub mod messages;
pub mod overview;
pub mod patient;
pub mod staff;

use std::sync::Arc;
use std::time::Duration;

use crate::api::ApiClient;
use crate::audio::AudioCue;
use crate::clock::{Clock, DisplayZone};
use crate::schedule::Scheduler;
use crate::surface::Surface;

pub use messages::MessageBoard;
pub use overview::OverviewPage;
pub use patient::PatientPage;
pub use staff::StaffPage;

/// Refresh and expiry periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub overview_refresh: Duration,
    pub patient_refresh: Duration,
    pub staff_refresh: Duration,
    pub clock_tick: Duration,
    pub banner_ttl: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            overview_refresh: Duration::from_secs(30),
            patient_refresh: Duration::from_secs(15),
            staff_refresh: Duration::from_secs(10),
            clock_tick: Duration::from_secs(1),
            banner_ttl: Duration::from_secs(5),
        }
    }
}

/// Everything a page controller needs from the outside world.
#[derive(Clone)]
pub struct PageContext {
    pub api: ApiClient,
    pub clock: Arc<dyn Clock>,
    pub zone: DisplayZone,
    pub surface: Arc<dyn Surface>,
    pub scheduler: Arc<dyn Scheduler>,
    pub audio: Arc<dyn AudioCue>,
    pub timing: Timing,
}
