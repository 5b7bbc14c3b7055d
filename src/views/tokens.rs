//! Token and queue views: overview summary, patient now-serving and queue
//! boards, staff token table.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::labels::{department_name, format_status};
use super::{Capped, EmptyState, LIST_CAP};
use crate::api::{QueueEntry, TokensDocument};

pub const NO_ACTIVE_TOKENS: EmptyState = EmptyState {
    icon: "fas fa-ticket-alt",
    heading: "No Active Tokens",
    detail: "No patients in queue currently",
};

pub const NO_ACTIVE_CONSULTATIONS: EmptyState = EmptyState {
    icon: "fas fa-clock",
    heading: "No Active Consultations",
    detail: "Please wait for announcements",
};

pub const NO_QUEUE_INFORMATION: EmptyState = EmptyState {
    icon: "fas fa-users",
    heading: "No Queue Information",
    detail: "Queue information will appear here",
};

pub const NO_TOKEN_DATA: EmptyState = EmptyState {
    icon: "fas fa-ticket-alt",
    heading: "No Token Data",
    detail: "Token information will appear here",
};

// =============================================================================
// Overview
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    /// Raw department key, shown as a badge
    pub department: String,
    pub current: String,
    pub waiting: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum TokenSummary {
    Empty(EmptyState),
    Departments(Vec<DepartmentSummary>),
}

/// One row per department that has a current-token entry.
pub fn token_summary(doc: &TokensDocument) -> TokenSummary {
    if doc.current_tokens.is_empty() {
        return TokenSummary::Empty(NO_ACTIVE_TOKENS);
    }
    TokenSummary::Departments(
        doc.current_tokens
            .iter()
            .map(|(dept, current)| DepartmentSummary {
                department: dept.clone(),
                current: current_or_none(current.as_deref()),
                waiting: doc.queue.get(dept).map_or(0, Vec::len),
            })
            .collect(),
    )
}

fn current_or_none(current: Option<&str>) -> String {
    current
        .filter(|t| !t.is_empty())
        .unwrap_or("None")
        .to_string()
}

// =============================================================================
// Patient display
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServingToken {
    pub token: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum NowServing {
    Empty(EmptyState),
    Tokens(Vec<ServingToken>),
}

pub fn now_serving(current_tokens: &BTreeMap<String, Option<String>>) -> NowServing {
    if current_tokens.is_empty() {
        return NowServing::Empty(NO_ACTIVE_CONSULTATIONS);
    }
    NowServing::Tokens(
        current_tokens
            .iter()
            .map(|(dept, token)| ServingToken {
                token: current_or_none(token.as_deref()),
                department: department_name(dept),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueLine {
    pub token_number: String,
    pub patient_type: String,
    /// Raw status, used as a style class
    pub status: String,
    pub status_label: String,
}

impl From<&QueueEntry> for QueueLine {
    fn from(entry: &QueueEntry) -> Self {
        let status = entry
            .status
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "waiting".to_string());
        Self {
            token_number: entry.token_number.clone(),
            patient_type: entry
                .patient_type
                .clone()
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "General".to_string()),
            status_label: format_status(&status),
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentQueue {
    pub department: String,
    pub entries: Capped<QueueLine>,
    /// Set when the department exists but nobody is waiting
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum QueueBoard {
    Empty(EmptyState),
    Departments(Vec<DepartmentQueue>),
}

pub fn queue_board(queue: &BTreeMap<String, Vec<QueueEntry>>) -> QueueBoard {
    if queue.is_empty() {
        return QueueBoard::Empty(NO_QUEUE_INFORMATION);
    }
    QueueBoard::Departments(
        queue
            .iter()
            .map(|(dept, entries)| DepartmentQueue {
                department: department_name(dept),
                entries: Capped::new(entries.iter().map(QueueLine::from).collect(), LIST_CAP),
                note: entries.is_empty().then_some("No patients in queue"),
            })
            .collect(),
    )
}

// =============================================================================
// Staff panel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRow {
    /// Raw key, passed back to the advance action
    pub department: String,
    pub label: String,
    pub current: String,
    pub queue_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum TokenStatus {
    Empty(EmptyState),
    Rows(Vec<TokenRow>),
}

/// Departments from either map appear once.
pub fn token_status(doc: &TokensDocument) -> TokenStatus {
    let departments: BTreeSet<&String> = doc
        .current_tokens
        .keys()
        .chain(doc.queue.keys())
        .collect();
    if departments.is_empty() {
        return TokenStatus::Empty(NO_TOKEN_DATA);
    }
    TokenStatus::Rows(
        departments
            .into_iter()
            .map(|dept| TokenRow {
                department: dept.clone(),
                label: department_name(dept),
                current: current_or_none(doc.current_tokens.get(dept).and_then(|t| t.as_deref())),
                queue_length: doc.queue.get(dept).map_or(0, Vec::len),
            })
            .collect(),
    )
}
