//! Hospital Display - headless runner
//!
//! Runs one display page against the backend and writes every rendered
//! view-model to stdout as a JSON line. The staff page also reads commands
//! from stdin.

use hospital_display::api::http::HttpFetch;
use hospital_display::api::ApiClient;
use hospital_display::audio::{AudioCue, Silent, TerminalBell};
use hospital_display::clock::SystemClock;
use hospital_display::commands;
use hospital_display::config::{self, PageKind};
use hospital_display::controllers::{OverviewPage, PageContext, PatientPage, StaffPage};
use hospital_display::lifecycle::{Page, PageRunner};
use hospital_display::schedule::TokioScheduler;
use hospital_display::surface::JsonLinesSurface;

use anyhow::Result;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered views
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hospital_display=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        "Starting Hospital Display v{} ({})",
        env!("HID_VERSION"),
        env!("HID_GIT_SHA")
    );

    let page_arg = std::env::args().nth(1);
    let config = config::load_config(page_arg.as_deref())?;
    tracing::info!(
        "Configuration loaded, page: {}, backend: {}",
        config.page.as_str(),
        config.base_url
    );

    let fetch = HttpFetch::new(&config.base_url)?;
    let surface = Arc::new(JsonLinesSurface::new(config.page.regions()));
    let audio: Arc<dyn AudioCue> = if config.audio {
        Arc::new(TerminalBell::new())
    } else {
        Arc::new(Silent)
    };
    let ctx = PageContext {
        api: ApiClient::new(Arc::new(fetch)),
        clock: Arc::new(SystemClock),
        zone: config.zone(),
        surface: surface.clone(),
        scheduler: Arc::new(TokioScheduler),
        audio,
        timing: config.timing(),
    };

    match config.page {
        PageKind::Overview => run_page(OverviewPage::new(ctx)).await,
        PageKind::Patient => run_page(PatientPage::new(ctx)).await,
        PageKind::Staff => {
            let shutdown = CancellationToken::new();
            let staff = Arc::new(StaffPage::new(ctx));
            let runner = PageRunner::new(staff.clone(), Arc::new(TokioScheduler));
            runner.start().await;

            let reader = BufReader::new(tokio::io::stdin());
            tokio::select! {
                _ = commands::run_commands(&staff, reader, shutdown.clone()) => {
                    tracing::info!("Command input finished, still refreshing");
                    shutdown_signal().await;
                }
                _ = shutdown_signal() => {}
            }
            shutdown.cancel();
            runner.stop();
        }
    }

    surface.unmount_all();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_page<P: Page>(page: P) {
    let runner = PageRunner::new(Arc::new(page), Arc::new(TokioScheduler));
    runner.start().await;
    shutdown_signal().await;
    runner.stop();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
