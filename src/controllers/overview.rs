//! Public overview dashboard: alerts, token, inventory and schedule summaries.

use async_trait::async_trait;
use futures::FutureExt;
use std::time::Duration;
use tracing::error;

use super::PageContext;
use crate::lifecycle::{load_category, run_isolated, Page};
use crate::surface::{paint, Region, Surface};
use crate::views::alerts::alert_board;
use crate::views::inventory::inventory_summary;
use crate::views::schedules::schedule_summary;
use crate::views::tokens::token_summary;
use crate::views::{Audience, View};

const PAGE: &str = "overview";

pub struct OverviewPage {
    ctx: PageContext,
}

impl OverviewPage {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    fn surface_ref(&self) -> &dyn Surface {
        self.ctx.surface.as_ref()
    }

    pub async fn load_alerts(&self) {
        let data = load_category(PAGE, "alerts", self.ctx.api.alerts()).await;
        let view = alert_board(&data.active_alerts, Audience::Overview, &self.ctx.zone);
        paint(self.surface_ref(), Region::Alerts, View::Alerts(view));
    }

    pub async fn load_token_summary(&self) {
        let data = load_category(PAGE, "token summary", self.ctx.api.tokens()).await;
        paint(
            self.surface_ref(),
            Region::TokenSummary,
            View::TokenSummary(token_summary(&data)),
        );
    }

    pub async fn load_inventory_summary(&self) {
        let data = load_category(PAGE, "inventory summary", self.ctx.api.inventory()).await;
        paint(
            self.surface_ref(),
            Region::InventorySummary,
            View::InventorySummary(inventory_summary(&data, &self.ctx.zone)),
        );
    }

    pub async fn load_schedule_summary(&self) {
        let data = load_category(PAGE, "schedule summary", self.ctx.api.schedules()).await;
        let today = self.ctx.zone.today(self.ctx.clock.now());
        paint(
            self.surface_ref(),
            Region::ScheduleSummary,
            View::ScheduleSummary(schedule_summary(&data, today, &self.ctx.zone)),
        );
    }
}

#[async_trait]
impl Page for OverviewPage {
    fn name(&self) -> &'static str {
        PAGE
    }

    fn refresh_period(&self) -> Duration {
        self.ctx.timing.overview_refresh
    }

    fn clock_period(&self) -> Option<Duration> {
        Some(self.ctx.timing.clock_tick)
    }

    fn surface(&self) -> &dyn Surface {
        self.surface_ref()
    }

    async fn load_all(&self) {
        let failed = run_isolated(vec![
            ("alerts", self.load_alerts().boxed()),
            ("token summary", self.load_token_summary().boxed()),
            ("inventory summary", self.load_inventory_summary().boxed()),
            ("schedule summary", self.load_schedule_summary().boxed()),
        ])
        .await;
        if !failed.is_empty() {
            error!("Failed to load dashboard data: {}", failed.join(", "));
        }
    }

    fn tick_clock(&self) {
        let text = self.ctx.zone.long_clock(self.ctx.clock.now());
        paint(self.surface_ref(), Region::Clock, View::Clock(text));
    }
}
