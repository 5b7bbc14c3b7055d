//! Staff panel: status tables plus the write flows (alerts, tokens, stock).
//!
//! Every write follows the same shape: mutate locally, persist the whole
//! document (or send the command), reload the affected category from the
//! backend and report the outcome once through the message banner. Nothing
//! is retried.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::FutureExt;
use serde_json::Map;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{MessageBoard, PageContext};
use crate::api::{ApiError, InventoryDocument, NewAlert, QueueEntry, TokensDocument};
use crate::lifecycle::{load_category, run_isolated, Page};
use crate::surface::{paint, Region, Surface};
use crate::views::alerts::alert_board;
use crate::views::inventory::inventory_status;
use crate::views::schedules::schedule_status;
use crate::views::tokens::token_status;
use crate::views::{Audience, Banner, BannerKind, View};

const PAGE: &str = "staff";

pub const LOAD_ERROR: &str = "Failed to load staff panel data";

// =============================================================================
// Errors
// =============================================================================

/// Why a write flow did not go through. `Display` is the banner text.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Item not found in inventory")]
    ItemNotFound(String),

    /// Form was incomplete; nothing was sent
    #[error("{0}")]
    Invalid(&'static str),

    /// Backend answered with a non-2xx status
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },

    /// Backend could not be reached or answered with garbage
    #[error("{message}")]
    Unreachable {
        message: &'static str,
        #[source]
        source: ApiError,
    },
}

/// Banner wording for one write flow.
struct Action {
    failed: &'static str,
    errored: &'static str,
}

impl Action {
    /// Failure while persisting: a non-2xx reply is a rejection.
    fn write_error(&self, e: ApiError) -> WriteError {
        match e {
            ApiError::Status { .. } => WriteError::Rejected {
                message: self.failed.to_string(),
                source: e,
            },
            _ => self.read_error(e),
        }
    }

    /// Failure before anything was written.
    fn read_error(&self, e: ApiError) -> WriteError {
        WriteError::Unreachable {
            message: self.errored,
            source: e,
        }
    }
}

const CREATE_ALERT: Action = Action {
    failed: "Failed to create alert",
    errored: "Error creating alert",
};
const QUICK_ALERT: Action = Action {
    failed: "Failed to create quick alert",
    errored: "Error creating quick alert",
};
const DISMISS_ALERT: Action = Action {
    failed: "Failed to dismiss alert",
    errored: "Error dismissing alert",
};
const ADD_TOKEN: Action = Action {
    failed: "Failed to add token",
    errored: "Error adding token",
};
const ADVANCE_TOKEN: Action = Action {
    failed: "Failed to advance token",
    errored: "Error advancing token",
};
const UPDATE_INVENTORY: Action = Action {
    failed: "Failed to update inventory",
    errored: "Error updating inventory",
};

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertForm {
    pub kind: String,
    pub message: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenForm {
    pub department: String,
    pub token_number: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockOperation {
    Add,
    Subtract,
    /// Anything that is not add or subtract sets the absolute quantity
    #[default]
    Set,
}

impl StockOperation {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "add" => StockOperation::Add,
            "subtract" => StockOperation::Subtract,
            _ => StockOperation::Set,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryForm {
    pub item_name: String,
    pub quantity: i64,
    pub operation: StockOperation,
}

/// One-press alerts with fixed wording, sent hospital-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAlert {
    CodeBlue,
    CodeRed,
    Emergency,
    Maintenance,
}

impl QuickAlert {
    pub const LOCATION: &'static str = "Hospital Wide";

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "code_blue" => Some(QuickAlert::CodeBlue),
            "code_red" => Some(QuickAlert::CodeRed),
            "emergency" => Some(QuickAlert::Emergency),
            "maintenance" => Some(QuickAlert::Maintenance),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QuickAlert::CodeBlue => "code_blue",
            QuickAlert::CodeRed => "code_red",
            QuickAlert::Emergency => "emergency",
            QuickAlert::Maintenance => "maintenance",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            QuickAlert::CodeBlue => "Medical emergency - response team required",
            QuickAlert::CodeRed => "Fire emergency - follow evacuation procedures",
            QuickAlert::Emergency => "Emergency situation - all staff report to stations",
            QuickAlert::Maintenance => "Scheduled maintenance in progress",
        }
    }

    pub fn alert(&self) -> NewAlert {
        NewAlert {
            kind: self.kind().to_string(),
            message: self.message().to_string(),
            location: Self::LOCATION.to_string(),
        }
    }
}

// =============================================================================
// Document transforms
// =============================================================================

/// Append a waiting entry to `department`'s queue, creating the queue if the
/// department is new.
pub fn enqueue(doc: &mut TokensDocument, department: &str, token_number: &str, now: DateTime<Utc>) {
    doc.queue
        .entry(department.to_string())
        .or_default()
        .push(QueueEntry {
            token_number: token_number.to_string(),
            patient_type: Some("General".to_string()),
            status: Some("waiting".to_string()),
            timestamp: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            extra: Map::new(),
        });
}

/// Apply a stock adjustment in place, looking in medications before
/// supplies. Returns the new quantity.
pub fn apply_adjustment(
    doc: &mut InventoryDocument,
    item_name: &str,
    quantity: i64,
    operation: StockOperation,
) -> Result<i64, WriteError> {
    let item = match doc.medications.get_mut(item_name) {
        Some(item) => item,
        None => doc
            .supplies
            .get_mut(item_name)
            .ok_or_else(|| WriteError::ItemNotFound(item_name.to_string()))?,
    };
    item.quantity = match operation {
        StockOperation::Add => item.quantity.saturating_add(quantity),
        StockOperation::Subtract => item.quantity.saturating_sub(quantity).max(0),
        StockOperation::Set => quantity,
    };
    Ok(item.quantity)
}

// =============================================================================
// Page
// =============================================================================

pub struct StaffPage {
    ctx: PageContext,
    messages: MessageBoard,
    alert_form: Mutex<AlertForm>,
    token_form: Mutex<TokenForm>,
    inventory_form: Mutex<InventoryForm>,
}

impl StaffPage {
    pub fn new(ctx: PageContext) -> Self {
        let messages = MessageBoard::new(
            ctx.surface.clone(),
            ctx.scheduler.clone(),
            ctx.timing.banner_ttl,
            true,
        );
        Self {
            ctx,
            messages,
            alert_form: Mutex::new(AlertForm::default()),
            token_form: Mutex::new(TokenForm::default()),
            inventory_form: Mutex::new(InventoryForm::default()),
        }
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    fn surface_ref(&self) -> &dyn Surface {
        self.ctx.surface.as_ref()
    }

    // -------------------------------------------------------------------------
    // Loaders
    // -------------------------------------------------------------------------

    pub async fn load_active_alerts(&self) {
        let data = load_category(PAGE, "active alerts", self.ctx.api.alerts()).await;
        let view = alert_board(&data.active_alerts, Audience::Staff, &self.ctx.zone);
        paint(self.surface_ref(), Region::Alerts, View::Alerts(view));
    }

    pub async fn load_token_status(&self) {
        let data = load_category(PAGE, "token status", self.ctx.api.tokens()).await;
        paint(
            self.surface_ref(),
            Region::TokenStatus,
            View::TokenStatus(token_status(&data)),
        );
    }

    pub async fn load_inventory_status(&self) {
        let data = load_category(PAGE, "inventory status", self.ctx.api.inventory()).await;
        paint(
            self.surface_ref(),
            Region::InventoryStatus,
            View::InventoryStatus(inventory_status(&data)),
        );
    }

    pub async fn load_schedule_status(&self) {
        let data = load_category(PAGE, "schedule status", self.ctx.api.schedules()).await;
        let today = self.ctx.zone.today(self.ctx.clock.now());
        paint(
            self.surface_ref(),
            Region::ScheduleStatus,
            View::ScheduleStatus(schedule_status(&data, today)),
        );
    }

    // -------------------------------------------------------------------------
    // Forms
    // -------------------------------------------------------------------------

    pub fn alert_form(&self) -> AlertForm {
        self.alert_form.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fill_alert_form(&self, form: AlertForm) {
        *self.alert_form.lock().unwrap_or_else(|e| e.into_inner()) = form;
    }

    pub fn token_form(&self) -> TokenForm {
        self.token_form.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn fill_token_form(&self, form: TokenForm) {
        *self.token_form.lock().unwrap_or_else(|e| e.into_inner()) = form;
    }

    pub fn inventory_form(&self) -> InventoryForm {
        self.inventory_form
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn fill_inventory_form(&self, form: InventoryForm) {
        *self.inventory_form.lock().unwrap_or_else(|e| e.into_inner()) = form;
    }

    // -------------------------------------------------------------------------
    // Write flows
    // -------------------------------------------------------------------------

    fn report(&self, flow: &str, outcome: Result<(BannerKind, String), WriteError>) -> Banner {
        match outcome {
            Ok((kind, message)) => {
                info!("{}: {}", flow, message);
                self.messages.show(kind, message)
            }
            Err(e) => {
                match std::error::Error::source(&e) {
                    Some(cause) => warn!("{} failed: {} ({})", flow, e, cause),
                    None => warn!("{} failed: {}", flow, e),
                }
                self.messages.danger(e.to_string())
            }
        }
    }

    /// Submit the alert form. The form is cleared only on success.
    pub async fn create_alert(&self) -> Banner {
        let form = self.alert_form();
        let outcome = self.try_create_alert(&form).await;
        if outcome.is_ok() {
            self.fill_alert_form(AlertForm::default());
        }
        self.report("create alert", outcome)
    }

    async fn try_create_alert(&self, form: &AlertForm) -> Result<(BannerKind, String), WriteError> {
        if form.kind.trim().is_empty() || form.message.trim().is_empty() {
            return Err(WriteError::Invalid("Alert type and message are required"));
        }
        let alert = NewAlert {
            kind: form.kind.clone(),
            message: form.message.clone(),
            location: form.location.clone(),
        };
        self.ctx
            .api
            .create_alert(&alert)
            .await
            .map_err(|e| CREATE_ALERT.write_error(e))?;
        self.load_active_alerts().await;
        Ok((BannerKind::Success, "Alert created successfully".to_string()))
    }

    pub async fn quick_alert(&self, quick: QuickAlert) -> Banner {
        let outcome = self.try_quick_alert(quick).await;
        self.report("quick alert", outcome)
    }

    async fn try_quick_alert(&self, quick: QuickAlert) -> Result<(BannerKind, String), WriteError> {
        self.ctx
            .api
            .create_alert(&quick.alert())
            .await
            .map_err(|e| QUICK_ALERT.write_error(e))?;
        self.load_active_alerts().await;
        Ok((
            BannerKind::Success,
            format!("{} alert activated", quick.kind().to_uppercase()),
        ))
    }

    pub async fn dismiss_alert(&self, id: i64) -> Banner {
        let outcome = self.try_dismiss_alert(id).await;
        self.report("dismiss alert", outcome)
    }

    async fn try_dismiss_alert(&self, id: i64) -> Result<(BannerKind, String), WriteError> {
        self.ctx
            .api
            .dismiss_alert(id)
            .await
            .map_err(|e| DISMISS_ALERT.write_error(e))?;
        self.load_active_alerts().await;
        Ok((BannerKind::Success, "Alert dismissed successfully".to_string()))
    }

    /// Submit the token form: read, append, write back, reload.
    pub async fn add_token(&self) -> Banner {
        let form = self.token_form();
        let outcome = self.try_add_token(&form).await;
        if outcome.is_ok() {
            self.fill_token_form(TokenForm::default());
        }
        self.report("add token", outcome)
    }

    async fn try_add_token(&self, form: &TokenForm) -> Result<(BannerKind, String), WriteError> {
        let department = form.department.trim();
        let token_number = form.token_number.trim();
        if department.is_empty() || token_number.is_empty() {
            return Err(WriteError::Invalid("Department and token number are required"));
        }
        let mut doc = self
            .ctx
            .api
            .tokens()
            .await
            .map_err(|e| ADD_TOKEN.read_error(e))?;
        enqueue(&mut doc, department, token_number, self.ctx.clock.now());
        self.ctx
            .api
            .save_tokens(&doc)
            .await
            .map_err(|e| ADD_TOKEN.write_error(e))?;
        self.load_token_status().await;
        Ok((
            BannerKind::Success,
            format!("Token {} added to {} queue", token_number, department),
        ))
    }

    /// Ask the backend to call the next token. Its status and message are
    /// shown as-is; token status is reloaded whatever the outcome. Returns
    /// `None` when the backend answered with a status it does not define.
    pub async fn advance_token(&self, department: &str) -> Option<Banner> {
        let outcome = self.try_advance_token(department).await;
        self.load_token_status().await;
        match outcome {
            Ok(Some(reply)) => Some(self.report("advance token", Ok(reply))),
            Ok(None) => None,
            Err(e) => Some(self.report("advance token", Err(e))),
        }
    }

    async fn try_advance_token(
        &self,
        department: &str,
    ) -> Result<Option<(BannerKind, String)>, WriteError> {
        let reply = match self.ctx.api.advance_token(department).await {
            Ok(reply) => reply,
            Err(ApiError::Status { status, message }) => {
                let shown = if message.is_empty() {
                    ADVANCE_TOKEN.failed.to_string()
                } else {
                    message.clone()
                };
                return Err(WriteError::Rejected {
                    message: shown,
                    source: ApiError::Status { status, message },
                });
            }
            Err(e) => return Err(ADVANCE_TOKEN.read_error(e)),
        };
        let message = reply.message.unwrap_or_default();
        Ok(match reply.status.as_str() {
            "success" => Some((BannerKind::Success, message)),
            "info" => Some((BannerKind::Info, message)),
            other => {
                debug!("Advance for {} returned status {:?}", department, other);
                None
            }
        })
    }

    /// Submit the inventory form: read, adjust, write back, reload.
    pub async fn update_inventory(&self) -> Banner {
        let form = self.inventory_form();
        let outcome = self.try_update_inventory(&form).await;
        if outcome.is_ok() {
            self.fill_inventory_form(InventoryForm::default());
        }
        self.report("update inventory", outcome)
    }

    async fn try_update_inventory(
        &self,
        form: &InventoryForm,
    ) -> Result<(BannerKind, String), WriteError> {
        let item_name = form.item_name.trim();
        if item_name.is_empty() {
            return Err(WriteError::Invalid("Item name is required"));
        }
        let mut doc = self
            .ctx
            .api
            .inventory()
            .await
            .map_err(|e| UPDATE_INVENTORY.read_error(e))?;
        let quantity = apply_adjustment(&mut doc, item_name, form.quantity, form.operation)?;
        debug!("{} now at {}", item_name, quantity);
        self.ctx
            .api
            .save_inventory(&doc)
            .await
            .map_err(|e| UPDATE_INVENTORY.write_error(e))?;
        self.load_inventory_status().await;
        Ok((BannerKind::Success, "Inventory updated successfully".to_string()))
    }
}

#[async_trait]
impl Page for StaffPage {
    fn name(&self) -> &'static str {
        PAGE
    }

    fn refresh_period(&self) -> Duration {
        self.ctx.timing.staff_refresh
    }

    fn surface(&self) -> &dyn Surface {
        self.surface_ref()
    }

    async fn load_all(&self) {
        let failed = run_isolated(vec![
            ("active alerts", self.load_active_alerts().boxed()),
            ("inventory status", self.load_inventory_status().boxed()),
            ("token status", self.load_token_status().boxed()),
            ("schedule status", self.load_schedule_status().boxed()),
        ])
        .await;
        if !failed.is_empty() {
            error!("Error loading staff data: {}", failed.join(", "));
            self.messages.danger(LOAD_ERROR);
        }
    }

    fn release(&self) {
        self.messages.release();
    }
}
