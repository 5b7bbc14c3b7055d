//! Hospital Display - poll-and-redraw controllers for hospital screens
//!
//! Three pages read from the display backend's REST API:
//! - Overview dashboard (alerts, token, inventory and schedule summaries)
//! - Patient waiting-room display (now serving, queues, public alerts)
//! - Staff panel (status tables plus alert, token and stock write flows)
//!
//! Each page is a controller built from injected capabilities (fetch, clock,
//! scheduler, surface, audio) and renders pure view-models.

pub mod api;
pub mod audio;
pub mod clock;
pub mod commands;
#[cfg(feature = "runner")]
pub mod config;
pub mod controllers;
pub mod lifecycle;
pub mod schedule;
pub mod surface;
pub mod views;
