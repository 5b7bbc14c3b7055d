//! Pure state-to-view mapping.
//!
//! Every function here takes fetched backend shapes (plus the clock where a
//! page shows time) and returns a serializable view-model. Nothing in this
//! module performs I/O; binding view-models to pixels is a [`Surface`]'s job.
//!
//! [`Surface`]: crate::surface::Surface

pub mod alerts;
pub mod inventory;
pub mod labels;
pub mod schedules;
pub mod tokens;

use serde::Serialize;

pub use alerts::{AlertBoard, AlertCard, Audience, PatientAlerts};
pub use inventory::{InventoryStatus, InventorySummary, StockLevel, StockLine, StockRow};
pub use schedules::{ConsultationRow, OtRow, ScheduleStatus, ScheduleSummary};
pub use tokens::{
    DepartmentQueue, DepartmentSummary, NowServing, QueueBoard, QueueLine, ServingToken,
    TokenRow, TokenStatus, TokenSummary,
};

/// Lists on the boards never show more than this many rows.
pub const LIST_CAP: usize = 10;

/// Placeholder shown instead of an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub icon: &'static str,
    pub heading: &'static str,
    pub detail: &'static str,
}

/// First [`LIST_CAP`] items of a list plus how many were cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capped<T> {
    pub items: Vec<T>,
    pub hidden: usize,
    /// `+N more` when anything was cut
    pub more: Option<String>,
}

impl<T> Capped<T> {
    pub fn new(mut all: Vec<T>, limit: usize) -> Self {
        let hidden = all.len().saturating_sub(limit);
        all.truncate(limit);
        Self {
            items: all,
            hidden,
            more: (hidden > 0).then(|| format!("+{} more", hidden)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Success,
    Info,
    Danger,
}

/// Transient message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Banner {
    pub id: u64,
    pub kind: BannerKind,
    pub message: String,
    pub dismissible: bool,
}

/// State of the manual refresh control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefreshState {
    pub busy: bool,
}

/// Everything a page can put into one of its regions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum View {
    Clock(String),
    Banner(Option<Banner>),
    Refresh(RefreshState),
    Alerts(AlertBoard),
    PatientAlerts(PatientAlerts),
    TokenSummary(TokenSummary),
    NowServing(NowServing),
    Queue(QueueBoard),
    TokenStatus(TokenStatus),
    InventorySummary(InventorySummary),
    InventoryStatus(InventoryStatus),
    ScheduleSummary(ScheduleSummary),
    ScheduleStatus(ScheduleStatus),
}
