//! Wall-clock capability and the display-time formats used on every page.
//!
//! All display strings are rendered in a fixed UTC offset (IST by default),
//! lower-case am/pm like the en-IN locale.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};

/// India Standard Time, +05:30
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed instant, for tests and replays.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// How timestamps are shown on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// `Oct 16, 02:30 pm` (overview, staff)
    DayAndTime,
    /// `02:30 pm` (patient display)
    TimeOnly,
}

/// Local-time conversions for one display.
#[derive(Debug, Clone, Copy)]
pub struct DisplayZone {
    offset: FixedOffset,
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_UTC_OFFSET_MINUTES)
    }
}

impl DisplayZone {
    /// Out-of-range offsets fall back to UTC.
    pub fn from_minutes(minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(minutes * 60).unwrap_or(Utc.fix());
        Self { offset }
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// Local calendar date, used for the "today" schedule filter.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local(now).date_naive()
    }

    /// `Friday, 16 October 2026, 02:30:05 pm`
    pub fn long_clock(&self, now: DateTime<Utc>) -> String {
        self.local(now)
            .format("%A, %-d %B %Y, %I:%M:%S %P")
            .to_string()
    }

    /// `02:30:05 pm`
    pub fn short_clock(&self, now: DateTime<Utc>) -> String {
        self.local(now).format("%I:%M:%S %P").to_string()
    }

    /// Render a backend timestamp. Missing → `N/A`; unparseable → echoed raw.
    ///
    /// Naive ISO timestamps (the backend's `datetime.utcnow().isoformat()`)
    /// are taken as UTC.
    pub fn format_timestamp(&self, timestamp: Option<&str>, style: TimeStyle) -> String {
        let Some(raw) = timestamp.filter(|s| !s.trim().is_empty()) else {
            return "N/A".to_string();
        };
        let Some(instant) = parse_timestamp(raw) else {
            return raw.to_string();
        };
        let local = self.local(instant);
        match style {
            TimeStyle::DayAndTime => local.format("%b %d, %I:%M %P").to_string(),
            TimeStyle::TimeOnly => local.format("%I:%M %P").to_string(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
