//! Transient message banner with auto-expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::schedule::{job, Scheduler, TaskHandle};
use crate::surface::{paint, Region, Surface};
use crate::views::{Banner, BannerKind, View};

/// Shows one banner at a time in the page's message region. A new banner
/// replaces the old one; each clears itself after the TTL unless replaced
/// or dismissed first.
pub struct MessageBoard {
    surface: Arc<dyn Surface>,
    scheduler: Arc<dyn Scheduler>,
    ttl: Duration,
    dismissible: bool,
    next_id: AtomicU64,
    /// Id of the banner on screen, 0 when none
    current: Arc<AtomicU64>,
    expiry: Mutex<Option<TaskHandle>>,
}

impl MessageBoard {
    pub fn new(
        surface: Arc<dyn Surface>,
        scheduler: Arc<dyn Scheduler>,
        ttl: Duration,
        dismissible: bool,
    ) -> Self {
        Self {
            surface,
            scheduler,
            ttl,
            dismissible,
            next_id: AtomicU64::new(1),
            current: Arc::new(AtomicU64::new(0)),
            expiry: Mutex::new(None),
        }
    }

    pub fn show(&self, kind: BannerKind, message: impl Into<String>) -> Banner {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let banner = Banner {
            id,
            kind,
            message: message.into(),
            dismissible: self.dismissible,
        };
        self.current.store(id, Ordering::SeqCst);
        paint(
            self.surface.as_ref(),
            Region::Messages,
            View::Banner(Some(banner.clone())),
        );

        let current = self.current.clone();
        let surface = self.surface.clone();
        let handle = self.scheduler.after(
            self.ttl,
            job(move || {
                let current = current.clone();
                let surface = surface.clone();
                async move {
                    if current
                        .compare_exchange(id, 0, Ordering::SeqCst, Ordering::SeqCst)
                        .is_ok()
                    {
                        paint(surface.as_ref(), Region::Messages, View::Banner(None));
                    }
                }
            }),
        );
        let previous = self
            .expiry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(handle);
        if let Some(previous) = previous {
            previous.cancel();
        }
        banner
    }

    pub fn success(&self, message: impl Into<String>) -> Banner {
        self.show(BannerKind::Success, message)
    }

    pub fn info(&self, message: impl Into<String>) -> Banner {
        self.show(BannerKind::Info, message)
    }

    pub fn danger(&self, message: impl Into<String>) -> Banner {
        self.show(BannerKind::Danger, message)
    }

    /// Id of the banner on screen.
    pub fn current(&self) -> Option<u64> {
        match self.current.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    /// Close banner `id` early. Returns false if it is no longer shown.
    pub fn dismiss(&self, id: u64) -> bool {
        if self
            .current
            .compare_exchange(id, 0, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        self.cancel_expiry();
        paint(self.surface.as_ref(), Region::Messages, View::Banner(None));
        true
    }

    /// Drop the pending expiry, leaving the surface as is.
    pub fn release(&self) {
        self.cancel_expiry();
    }

    fn cancel_expiry(&self) {
        let pending = self
            .expiry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(pending) = pending {
            pending.cancel();
        }
    }
}
