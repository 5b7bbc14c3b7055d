//! Shared refresh/render lifecycle.
//!
//! Every page follows the same contract: `start()` renders once immediately,
//! then refreshes on a recurring timer (plus a clock tick on pages that show
//! one); `stop()` cancels every timer and releases page resources.
//!
//! Category loaders absorb their own errors through [`load_category`], and
//! [`run_isolated`] joins them so that a panicking loader cannot take the
//! others down with it.

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{error, info, warn};

use crate::api::ApiError;
use crate::schedule::{job, Scheduler, TaskHandle};
use crate::surface::{paint, Region, Surface};
use crate::views::{RefreshState, View};

/// One display page: a set of category loaders bound to a surface.
#[async_trait]
pub trait Page: Send + Sync + 'static {
    /// Page name for logs (e.g., "overview", "staff")
    fn name(&self) -> &'static str;

    fn refresh_period(&self) -> Duration;

    /// Clock tick period, for pages that show a clock.
    fn clock_period(&self) -> Option<Duration> {
        None
    }

    fn surface(&self) -> &dyn Surface;

    /// Run every category loader concurrently and render the results.
    /// Never fails; degraded categories render their empty state.
    async fn load_all(&self);

    fn tick_clock(&self) {}

    /// Free page resources (audio output, pending banners).
    fn release(&self) {}

    /// Manual refresh: mark the control busy, reload, restore it.
    async fn refresh_now(&self) {
        paint(
            self.surface(),
            Region::Refresh,
            View::Refresh(RefreshState { busy: true }),
        );
        self.load_all().await;
        paint(
            self.surface(),
            Region::Refresh,
            View::Refresh(RefreshState { busy: false }),
        );
    }
}

/// Owns the timers of one running page.
pub struct PageRunner<P: Page> {
    page: Arc<P>,
    scheduler: Arc<dyn Scheduler>,
    timers: Mutex<Vec<TaskHandle>>,
    running: AtomicBool,
}

impl<P: Page> PageRunner<P> {
    pub fn new(page: Arc<P>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            page,
            scheduler,
            timers: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
        }
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Render immediately, then keep refreshing. No-op if already running.
    ///
    /// Timers are armed before the initial load is awaited; their first run
    /// is one full period after start.
    pub async fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let name = self.page.name();
        info!(
            "Starting {} page (refresh every {:?})",
            name,
            self.page.refresh_period()
        );

        self.page.tick_clock();

        let mut handles = Vec::with_capacity(2);
        let page = self.page.clone();
        handles.push(self.scheduler.every(
            self.page.refresh_period(),
            job(move || {
                let page = page.clone();
                async move { page.load_all().await }
            }),
        ));
        if let Some(period) = self.page.clock_period() {
            let page = self.page.clone();
            handles.push(self.scheduler.every(
                period,
                job(move || {
                    let page = page.clone();
                    async move { page.tick_clock() }
                }),
            ));
        }
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(handles);

        self.page.load_all().await;
    }

    /// Cancel every timer and release page resources. In-flight loads are
    /// left to finish; their renders go through the mounted check.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let timers: Vec<TaskHandle> = self
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect();
        for timer in &timers {
            timer.cancel();
        }
        self.page.release();
        info!("Stopped {} page ({} timers cancelled)", self.page.name(), timers.len());
    }
}

impl<P: Page> Drop for PageRunner<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Await one category read; on any error log it and fall back to the
/// category's empty shape.
pub async fn load_category<T, F>(page: &str, category: &str, fetch: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, ApiError>>,
{
    match fetch.await {
        Ok(data) => data,
        Err(e) => {
            warn!("{}: error loading {}: {}", page, category, e);
            T::default()
        }
    }
}

/// Run loaders concurrently. A loader that panics is contained; the names of
/// those that did are returned.
pub async fn run_isolated<'a>(loaders: Vec<(&'static str, BoxFuture<'a, ()>)>) -> Vec<&'static str> {
    let outcomes = join_all(loaders.into_iter().map(|(name, loader)| async move {
        match AssertUnwindSafe(loader).catch_unwind().await {
            Ok(()) => None,
            Err(_) => {
                error!("{} loader panicked", name);
                Some(name)
            }
        }
    }))
    .await;
    outcomes.into_iter().flatten().collect()
}
