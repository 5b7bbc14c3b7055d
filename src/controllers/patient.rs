//! Waiting-room display: now serving, queues and patient-facing alerts.

use async_trait::async_trait;
use futures::FutureExt;
use std::time::Duration;
use tracing::{error, info};

use super::{MessageBoard, PageContext};
use crate::audio::CRITICAL_ALERT_TONE;
use crate::lifecycle::{load_category, run_isolated, Page};
use crate::surface::{paint, Region, Surface};
use crate::views::alerts::patient_alerts;
use crate::views::tokens::{now_serving, queue_board};
use crate::views::View;

const PAGE: &str = "patient";

pub const LOAD_ERROR: &str = "Unable to load current information";

pub struct PatientPage {
    ctx: PageContext,
    messages: MessageBoard,
}

impl PatientPage {
    pub fn new(ctx: PageContext) -> Self {
        let messages = MessageBoard::new(
            ctx.surface.clone(),
            ctx.scheduler.clone(),
            ctx.timing.banner_ttl,
            false,
        );
        Self { ctx, messages }
    }

    pub fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    fn surface_ref(&self) -> &dyn Surface {
        self.ctx.surface.as_ref()
    }

    pub async fn load_current_tokens(&self) {
        let data = load_category(PAGE, "current tokens", self.ctx.api.tokens()).await;
        paint(
            self.surface_ref(),
            Region::CurrentTokens,
            View::NowServing(now_serving(&data.current_tokens)),
        );
    }

    pub async fn load_queue(&self) {
        let data = load_category(PAGE, "queue", self.ctx.api.tokens()).await;
        paint(
            self.surface_ref(),
            Region::Queue,
            View::Queue(queue_board(&data.queue)),
        );
    }

    /// Renders patient-visible alerts and sounds the cue if any is critical.
    /// An empty list clears the region.
    pub async fn load_alerts(&self) {
        let data = load_category(PAGE, "alerts", self.ctx.api.alerts()).await;
        let view = patient_alerts(&data.active_alerts, &self.ctx.zone);
        let critical = view.critical;
        let shown = paint(self.surface_ref(), Region::Alerts, View::PatientAlerts(view));
        if shown && critical {
            info!("Critical alert on display, playing tone");
            self.ctx.audio.play(CRITICAL_ALERT_TONE);
        }
    }
}

#[async_trait]
impl Page for PatientPage {
    fn name(&self) -> &'static str {
        PAGE
    }

    fn refresh_period(&self) -> Duration {
        self.ctx.timing.patient_refresh
    }

    fn clock_period(&self) -> Option<Duration> {
        Some(self.ctx.timing.clock_tick)
    }

    fn surface(&self) -> &dyn Surface {
        self.surface_ref()
    }

    async fn load_all(&self) {
        let failed = run_isolated(vec![
            ("current tokens", self.load_current_tokens().boxed()),
            ("queue", self.load_queue().boxed()),
            ("alerts", self.load_alerts().boxed()),
        ])
        .await;
        if !failed.is_empty() {
            error!("Error loading patient data: {}", failed.join(", "));
            self.messages.danger(LOAD_ERROR);
        }
    }

    fn tick_clock(&self) {
        let text = self.ctx.zone.short_clock(self.ctx.clock.now());
        paint(self.surface_ref(), Region::Clock, View::Clock(text));
    }

    fn release(&self) {
        self.messages.release();
        self.ctx.audio.close();
    }
}
