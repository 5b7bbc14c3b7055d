//! Alert presentation tables and alert board views.
//!
//! Each page shows alerts to a different audience, so class and title wording
//! differ per [`Audience`]. The icon table is shared.

use serde::Serialize;

use super::EmptyState;
use crate::api::Alert;
use crate::clock::{DisplayZone, TimeStyle};

/// Alert types the backend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    CodeBlue,
    CodeRed,
    General,
    Emergency,
    Maintenance,
    StaffOnly,
    Unknown,
}

impl AlertKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "code_blue" => AlertKind::CodeBlue,
            "code_red" => AlertKind::CodeRed,
            "general" => AlertKind::General,
            "emergency" => AlertKind::Emergency,
            "maintenance" => AlertKind::Maintenance,
            "staff_only" => AlertKind::StaffOnly,
            _ => AlertKind::Unknown,
        }
    }

    /// Fire and mass-casualty alerts sound the patient display cue.
    pub fn is_critical(&self) -> bool {
        matches!(self, AlertKind::CodeRed | AlertKind::Emergency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// Public overview dashboard
    Overview,
    /// Waiting-room display
    Patient,
    /// Staff panel
    Staff,
}

/// Container class for an alert.
pub fn alert_class(kind: AlertKind, audience: Audience) -> &'static str {
    use AlertKind::*;
    match audience {
        Audience::Patient => match kind {
            CodeBlue => "code-blue",
            CodeRed | Emergency => "code-red",
            General => "warning",
            Maintenance => "info",
            _ => "info",
        },
        Audience::Overview | Audience::Staff => match kind {
            CodeBlue => "code-blue",
            CodeRed | Emergency => "code-red",
            _ => "general",
        },
    }
}

/// Heading shown above an alert message.
pub fn alert_title(kind: AlertKind, audience: Audience) -> &'static str {
    use AlertKind::*;
    match audience {
        Audience::Patient => match kind {
            CodeBlue => "MEDICAL EMERGENCY",
            CodeRed => "FIRE EMERGENCY",
            General => "HOSPITAL NOTICE",
            Emergency => "EMERGENCY ALERT",
            Maintenance => "MAINTENANCE NOTICE",
            _ => "NOTICE",
        },
        Audience::Overview | Audience::Staff => match kind {
            CodeBlue => "CODE BLUE",
            CodeRed => "CODE RED",
            General => "GENERAL ALERT",
            Emergency => "EMERGENCY",
            _ => "ALERT",
        },
    }
}

/// Badge colour. Only the staff panel distinguishes maintenance.
pub fn alert_badge(kind: AlertKind, audience: Audience) -> &'static str {
    use AlertKind::*;
    match kind {
        CodeBlue => "primary",
        CodeRed | Emergency => "danger",
        General => "warning",
        Maintenance if audience != Audience::Overview => "info",
        _ => "secondary",
    }
}

pub fn alert_icon(kind: AlertKind) -> &'static str {
    use AlertKind::*;
    match kind {
        CodeBlue => "fas fa-heartbeat",
        CodeRed => "fas fa-fire",
        General => "fas fa-info-circle",
        Emergency => "fas fa-exclamation-triangle",
        Maintenance => "fas fa-wrench",
        _ => "fas fa-bell",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertCard {
    pub id: i64,
    /// Raw backend type, e.g. `code_blue`
    pub kind: String,
    /// Upper-cased type for the badge
    pub badge_label: String,
    pub class: &'static str,
    pub title: &'static str,
    pub badge: &'static str,
    pub icon: &'static str,
    pub message: String,
    pub location: Option<String>,
    pub time: String,
}

impl AlertCard {
    pub fn new(alert: &Alert, audience: Audience, zone: &DisplayZone) -> Self {
        let kind = AlertKind::parse(&alert.kind);
        let style = match audience {
            Audience::Patient => TimeStyle::TimeOnly,
            Audience::Overview | Audience::Staff => TimeStyle::DayAndTime,
        };
        let location = match audience {
            Audience::Staff => Some(
                alert
                    .location
                    .clone()
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| "Not specified".to_string()),
            ),
            Audience::Patient => alert.location.clone().filter(|l| !l.is_empty()),
            Audience::Overview => alert.location.clone(),
        };
        Self {
            id: alert.id,
            kind: alert.kind.clone(),
            badge_label: alert.kind.to_uppercase(),
            class: alert_class(kind, audience),
            title: alert_title(kind, audience),
            badge: alert_badge(kind, audience),
            icon: alert_icon(kind),
            message: alert.message.clone(),
            location,
            time: zone.format_timestamp(alert.timestamp.as_deref(), style),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum AlertBoard {
    Empty(EmptyState),
    Alerts(Vec<AlertCard>),
}

pub const OVERVIEW_NO_ALERTS: EmptyState = EmptyState {
    icon: "fas fa-shield-alt",
    heading: "No Active Alerts",
    detail: "All systems operating normally",
};

pub const STAFF_NO_ALERTS: EmptyState = EmptyState {
    icon: "fas fa-shield-alt",
    heading: "No Active Alerts",
    detail: "All systems normal",
};

/// Active alerts for the overview or staff panel.
pub fn alert_board(alerts: &[Alert], audience: Audience, zone: &DisplayZone) -> AlertBoard {
    if alerts.is_empty() {
        return AlertBoard::Empty(match audience {
            Audience::Staff => STAFF_NO_ALERTS,
            _ => OVERVIEW_NO_ALERTS,
        });
    }
    AlertBoard::Alerts(
        alerts
            .iter()
            .map(|alert| AlertCard::new(alert, audience, zone))
            .collect(),
    )
}

/// Alerts shown in the waiting room. An empty list clears the region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientAlerts {
    pub cards: Vec<AlertCard>,
    /// At least one card should sound the audible cue
    pub critical: bool,
}

/// Drops staff-only and inactive alerts.
pub fn patient_alerts(alerts: &[Alert], zone: &DisplayZone) -> PatientAlerts {
    let visible: Vec<&Alert> = alerts
        .iter()
        .filter(|alert| alert.active && AlertKind::parse(&alert.kind) != AlertKind::StaffOnly)
        .collect();
    PatientAlerts {
        critical: visible
            .iter()
            .any(|alert| AlertKind::parse(&alert.kind).is_critical()),
        cards: visible
            .into_iter()
            .map(|alert| AlertCard::new(alert, Audience::Patient, zone))
            .collect(),
    }
}
