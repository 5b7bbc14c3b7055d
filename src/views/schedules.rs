//! Today's OT procedures and consultations.

use chrono::NaiveDate;
use serde::Serialize;

use super::labels::{format_status, schedule_status_color};
use super::EmptyState;
use crate::api::{Consultation, OtSchedule, SchedulesDocument};
use crate::clock::{DisplayZone, TimeStyle};

pub const NO_SCHEDULES_TODAY: EmptyState = EmptyState {
    icon: "fas fa-calendar",
    heading: "No Schedules Today",
    detail: "No OT procedures or consultations scheduled",
};

/// Schedule keys embed their date; a plain substring match decides "today".
pub fn is_today(key: &str, today: NaiveDate) -> bool {
    key.contains(&today.format("%Y-%m-%d").to_string())
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("N/A")
        .to_string()
}

fn status_or_scheduled(status: Option<&str>) -> &str {
    status.filter(|s| !s.is_empty()).unwrap_or("scheduled")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleSummary {
    pub ot_today: usize,
    pub consultations_today: usize,
    pub last_updated: String,
}

pub fn schedule_summary(
    doc: &SchedulesDocument,
    today: NaiveDate,
    zone: &DisplayZone,
) -> ScheduleSummary {
    ScheduleSummary {
        ot_today: doc.ot_schedules.keys().filter(|k| is_today(k, today)).count(),
        consultations_today: doc
            .consultations
            .keys()
            .filter(|k| is_today(k, today))
            .count(),
        last_updated: zone.format_timestamp(doc.last_updated.as_deref(), TimeStyle::DayAndTime),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtRow {
    pub time: String,
    pub procedure: String,
    pub surgeon: String,
    pub status: String,
    pub status_color: &'static str,
}

impl From<&OtSchedule> for OtRow {
    fn from(ot: &OtSchedule) -> Self {
        let status = status_or_scheduled(ot.status.as_deref());
        Self {
            time: format!(
                "{}-{}",
                or_na(ot.start_time.as_deref()),
                or_na(ot.end_time.as_deref())
            ),
            procedure: or_na(ot.procedure.as_deref()),
            surgeon: or_na(ot.surgeon.as_deref()),
            status: format_status(status),
            status_color: schedule_status_color(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsultationRow {
    pub department: String,
    pub doctor: String,
    pub time_slot: String,
    /// `completed/total`
    pub progress: String,
    pub status: String,
    pub status_color: &'static str,
}

impl From<&Consultation> for ConsultationRow {
    fn from(c: &Consultation) -> Self {
        let status = status_or_scheduled(c.status.as_deref());
        let time_slot = match (&c.time_slot, &c.start_time, &c.end_time) {
            (Some(slot), _, _) if !slot.is_empty() => slot.clone(),
            (_, Some(start), Some(end)) => format!("{start}-{end}"),
            _ => "N/A".to_string(),
        };
        Self {
            department: or_na(c.department.as_deref()),
            doctor: or_na(c.doctor.as_deref()),
            time_slot,
            progress: format!("{}/{}", c.completed, c.total_appointments),
            status: format_status(status),
            status_color: schedule_status_color(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleStatus {
    pub ot_today: usize,
    pub consultations_today: usize,
    pub ot: Vec<OtRow>,
    pub consultations: Vec<ConsultationRow>,
    /// Present when neither table has rows
    pub empty: Option<EmptyState>,
}

pub fn schedule_status(doc: &SchedulesDocument, today: NaiveDate) -> ScheduleStatus {
    let ot: Vec<OtRow> = doc
        .ot_schedules
        .iter()
        .filter(|(key, _)| is_today(key, today))
        .map(|(_, ot)| OtRow::from(ot))
        .collect();
    let consultations: Vec<ConsultationRow> = doc
        .consultations
        .iter()
        .filter(|(key, _)| is_today(key, today))
        .map(|(_, c)| ConsultationRow::from(c))
        .collect();
    let empty = (ot.is_empty() && consultations.is_empty()).then_some(NO_SCHEDULES_TODAY);
    ScheduleStatus {
        ot_today: ot.len(),
        consultations_today: consultations.len(),
        ot,
        consultations,
        empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn doc() -> SchedulesDocument {
        let mut doc = SchedulesDocument::default();
        doc.ot_schedules.insert(
            "ot1_2026-10-16_0900".to_string(),
            OtSchedule {
                start_time: Some("09:00".to_string()),
                end_time: Some("11:00".to_string()),
                procedure: Some("Appendectomy".to_string()),
                surgeon: Some("Dr. Rao".to_string()),
                status: Some("in_progress".to_string()),
            },
        );
        doc.ot_schedules
            .insert("ot2_2026-10-15_0900".to_string(), OtSchedule::default());
        doc.consultations.insert(
            "cardiology_2026-10-16".to_string(),
            Consultation {
                department: Some("cardiology".to_string()),
                doctor: Some("Dr. Iyer".to_string()),
                start_time: Some("10:00".to_string()),
                end_time: Some("13:00".to_string()),
                completed: 4,
                total_appointments: 12,
                ..Default::default()
            },
        );
        doc
    }

    #[test]
    fn today_is_a_substring_match() {
        assert!(is_today("ot1_2026-10-16_0900", today()));
        assert!(is_today("2026-10-16", today()));
        assert!(!is_today("ot1_2026-10-15", today()));
        assert!(!is_today("ot1_20261016", today()));
    }

    #[test]
    fn summary_counts_only_today() {
        let summary = schedule_summary(&doc(), today(), &DisplayZone::default());
        assert_eq!(summary.ot_today, 1);
        assert_eq!(summary.consultations_today, 1);
        assert_eq!(summary.last_updated, "N/A");
    }

    #[test]
    fn staff_rows_fill_fallbacks() {
        let status = schedule_status(&doc(), today());
        assert!(status.empty.is_none());
        assert_eq!(status.ot[0].time, "09:00-11:00");
        assert_eq!(status.ot[0].status, "In Progress");
        assert_eq!(status.ot[0].status_color, "warning");

        let c = &status.consultations[0];
        assert_eq!(c.time_slot, "10:00-13:00");
        assert_eq!(c.progress, "4/12");
        assert_eq!(c.status, "Scheduled");
        assert_eq!(c.status_color, "primary");
    }

    #[test]
    fn no_rows_today_is_empty_state() {
        let other_day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let status = schedule_status(&doc(), other_day);
        assert_eq!(status.ot_today, 0);
        assert_eq!(status.empty, Some(NO_SCHEDULES_TODAY));
    }
}
