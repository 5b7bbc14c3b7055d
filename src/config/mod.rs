//! Runner configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `hospital-display.{toml,json,yaml}` in the working directory (or the file
//! named by `HID_CONFIG`), then `HID_*` environment variables.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::clock::{DisplayZone, DEFAULT_UTC_OFFSET_MINUTES};
use crate::controllers::Timing;
use crate::surface::Region;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_VAR: &str = "HID_CONFIG";

const DEFAULT_CONFIG_NAME: &str = "hospital-display";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Overview,
    Patient,
    Staff,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageKind::Overview => "overview",
            PageKind::Patient => "patient",
            PageKind::Staff => "staff",
        }
    }

    /// Regions the page draws into.
    pub fn regions(&self) -> &'static [Region] {
        match self {
            PageKind::Overview => Region::OVERVIEW,
            PageKind::Patient => Region::PATIENT,
            PageKind::Staff => Region::STAFF,
        }
    }
}

impl FromStr for PageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overview" | "dashboard" => Ok(PageKind::Overview),
            "patient" => Ok(PageKind::Patient),
            "staff" => Ok(PageKind::Staff),
            other => bail!("unknown page '{}' (expected overview, patient or staff)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend origin the `/api/*` paths are joined to
    pub base_url: String,
    pub page: PageKind,
    pub overview_refresh_secs: u64,
    pub patient_refresh_secs: u64,
    pub staff_refresh_secs: u64,
    pub clock_tick_ms: u64,
    pub banner_ttl_secs: u64,
    /// Display time zone as minutes east of UTC
    pub utc_offset_minutes: i32,
    /// Ring the terminal bell for critical alerts on the patient page
    pub audio: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            page: PageKind::Overview,
            overview_refresh_secs: 30,
            patient_refresh_secs: 15,
            staff_refresh_secs: 10,
            clock_tick_ms: 1000,
            banner_ttl_secs: 5,
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            audio: true,
        }
    }
}

impl Config {
    pub fn timing(&self) -> Timing {
        Timing {
            overview_refresh: Duration::from_secs(self.overview_refresh_secs),
            patient_refresh: Duration::from_secs(self.patient_refresh_secs),
            staff_refresh: Duration::from_secs(self.staff_refresh_secs),
            clock_tick: Duration::from_millis(self.clock_tick_ms),
            banner_ttl: Duration::from_secs(self.banner_ttl_secs),
        }
    }

    pub fn zone(&self) -> DisplayZone {
        DisplayZone::from_minutes(self.utc_offset_minutes)
    }
}

/// Load configuration. `page` (the first CLI argument) wins over every
/// other layer.
pub fn load_config(page: Option<&str>) -> Result<Config> {
    let file = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) => ::config::File::from(PathBuf::from(path)).required(true),
        Err(_) => ::config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let mut builder = ::config::Config::builder()
        .add_source(file)
        // HID_BASE_URL, HID_STAFF_REFRESH_SECS, ...
        .add_source(
            ::config::Environment::with_prefix("HID")
                .separator("__")
                .try_parsing(true),
        );

    if let Some(page) = page {
        let page = PageKind::from_str(page)?;
        builder = builder.set_override("page", page.as_str())?;
    }

    let config: Config = builder.build()?.try_deserialize()?;
    if config.clock_tick_ms == 0 {
        bail!("clock_tick_ms must be greater than zero");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;

    fn clear_env() {
        for key in [
            CONFIG_PATH_VAR,
            "HID_BASE_URL",
            "HID_PAGE",
            "HID_STAFF_REFRESH_SECS",
            "HID_UTC_OFFSET_MINUTES",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_file_or_env() {
        clear_env();
        let config = load_config(None).expect("config should load");
        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.page, PageKind::Overview);
        assert_eq!(config.timing(), Timing::default());
    }

    #[test]
    #[serial]
    fn file_then_env_then_argument() {
        clear_env();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "base_url = \"http://ward-display:8080\"\npage = \"patient\"\nstaff_refresh_secs = 20"
        )
        .expect("write config");

        env::set_var(CONFIG_PATH_VAR, file.path());
        env::set_var("HID_STAFF_REFRESH_SECS", "3");

        let config = load_config(None).expect("config should load");
        assert_eq!(config.base_url, "http://ward-display:8080");
        assert_eq!(config.page, PageKind::Patient);
        assert_eq!(config.staff_refresh_secs, 3);

        let config = load_config(Some("staff")).expect("config should load");
        assert_eq!(config.page, PageKind::Staff);

        clear_env();
    }

    #[test]
    #[serial]
    fn unknown_page_argument_is_rejected() {
        clear_env();
        assert!(load_config(Some("cafeteria")).is_err());
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        clear_env();
        env::set_var(CONFIG_PATH_VAR, "/nonexistent/hospital-display.toml");
        let result = load_config(None);
        clear_env();
        assert!(result.is_err());
    }

    #[test]
    fn page_regions() {
        assert!(PageKind::Patient.regions().contains(&Region::Queue));
        assert!(!PageKind::Overview.regions().contains(&Region::Messages));
        assert_eq!("Staff".parse::<PageKind>().unwrap(), PageKind::Staff);
    }
}
