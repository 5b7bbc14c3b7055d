//! Where view-models end up.
//!
//! A page owns a fixed set of regions. Loaders complete asynchronously and
//! may finish after a region has gone away, so every paint goes through
//! [`paint`], which checks [`Surface::is_mounted`] first.

use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::{debug, warn};

use crate::views::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Clock,
    Messages,
    Refresh,
    Alerts,
    TokenSummary,
    InventorySummary,
    ScheduleSummary,
    CurrentTokens,
    Queue,
    TokenStatus,
    InventoryStatus,
    ScheduleStatus,
}

impl Region {
    pub const OVERVIEW: &'static [Region] = &[
        Region::Clock,
        Region::Refresh,
        Region::Alerts,
        Region::TokenSummary,
        Region::InventorySummary,
        Region::ScheduleSummary,
    ];

    pub const PATIENT: &'static [Region] = &[
        Region::Clock,
        Region::Messages,
        Region::CurrentTokens,
        Region::Queue,
        Region::Alerts,
    ];

    pub const STAFF: &'static [Region] = &[
        Region::Messages,
        Region::Refresh,
        Region::Alerts,
        Region::TokenStatus,
        Region::InventoryStatus,
        Region::ScheduleStatus,
    ];
}

pub trait Surface: Send + Sync {
    fn is_mounted(&self, region: Region) -> bool;

    /// Replace the whole content of `region`.
    fn render(&self, region: Region, view: View);
}

/// Render `view` if `region` is still mounted. Returns whether it was drawn.
pub fn paint(surface: &dyn Surface, region: Region, view: View) -> bool {
    if !surface.is_mounted(region) {
        debug!("Skipping render of {:?}: region not mounted", region);
        return false;
    }
    surface.render(region, view);
    true
}

#[derive(Serialize)]
struct Frame<'a> {
    region: Region,
    view: &'a View,
}

/// Writes each render as one JSON line to stdout.
pub struct JsonLinesSurface {
    regions: Mutex<Vec<Region>>,
}

impl JsonLinesSurface {
    pub fn new(regions: &[Region]) -> Self {
        Self {
            regions: Mutex::new(regions.to_vec()),
        }
    }

    /// Stop accepting renders, e.g. once the page is torn down.
    pub fn unmount_all(&self) {
        self.regions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Surface for JsonLinesSurface {
    fn is_mounted(&self, region: Region) -> bool {
        self.regions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&region)
    }

    fn render(&self, region: Region, view: View) {
        let line = match serde_json::to_string(&Frame {
            region,
            view: &view,
        }) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize {:?} view: {}", region, e);
                return;
            }
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            warn!("Failed to write {:?} view: {}", region, e);
        }
    }
}
