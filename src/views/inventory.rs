//! Stock level classification and inventory views.

use serde::Serialize;
use std::collections::BTreeMap;

use super::{Capped, EmptyState, LIST_CAP};
use crate::api::{InventoryDocument, InventoryItem};
use crate::clock::{DisplayZone, TimeStyle};

/// Below this fill ratio a non-critical item counts as low.
pub const LOW_STOCK_RATIO: f64 = 0.3;

pub const NO_INVENTORY_OVERVIEW: EmptyState = EmptyState {
    icon: "fas fa-boxes",
    heading: "No Inventory Data",
    detail: "Inventory information not available",
};

pub const NO_INVENTORY_STAFF: EmptyState = EmptyState {
    icon: "fas fa-boxes",
    heading: "No Inventory Data",
    detail: "Add inventory items to track stock levels",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Critical,
    Low,
    Normal,
}

impl StockLevel {
    /// `quantity <= min_threshold` is critical; otherwise a fill ratio
    /// strictly below [`LOW_STOCK_RATIO`] is low.
    pub fn classify(item: &InventoryItem) -> Self {
        if item.quantity <= item.min_threshold {
            return StockLevel::Critical;
        }
        // x / 0 is inf (or NaN for 0 / 0), neither of which is < 0.3
        let ratio = item.quantity as f64 / item.max_capacity as f64;
        if ratio < LOW_STOCK_RATIO {
            StockLevel::Low
        } else {
            StockLevel::Normal
        }
    }

    pub fn stock_class(&self) -> &'static str {
        match self {
            StockLevel::Critical => "stock-low",
            StockLevel::Low => "stock-medium",
            StockLevel::Normal => "stock-high",
        }
    }

    pub fn bar_color(&self) -> &'static str {
        match self {
            StockLevel::Critical => "danger",
            StockLevel::Low => "warning",
            StockLevel::Normal => "success",
        }
    }
}

/// Medications and supplies as one name-sorted map. A supply shadows a
/// medication of the same name.
pub fn all_items(doc: &InventoryDocument) -> BTreeMap<&str, &InventoryItem> {
    doc.medications
        .iter()
        .chain(doc.supplies.iter())
        .map(|(name, item)| (name.as_str(), item))
        .collect()
}

/// Fill percentage for the stock bar; 0 when capacity is unknown.
pub fn fill_percentage(item: &InventoryItem) -> i64 {
    if item.max_capacity <= 0 {
        return 0;
    }
    (item.quantity as f64 / item.max_capacity as f64 * 100.0).round() as i64
}

// =============================================================================
// Overview
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockLine {
    pub name: String,
    /// `"{quantity} {unit}"`
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum InventorySummary {
    Empty(EmptyState),
    Items {
        /// Empty means all levels are normal
        critical: Vec<StockLine>,
        total_items: usize,
        last_updated: String,
    },
}

pub fn inventory_summary(doc: &InventoryDocument, zone: &DisplayZone) -> InventorySummary {
    let items = all_items(doc);
    if items.is_empty() {
        return InventorySummary::Empty(NO_INVENTORY_OVERVIEW);
    }
    InventorySummary::Items {
        critical: items
            .iter()
            .filter(|(_, item)| StockLevel::classify(item) == StockLevel::Critical)
            .map(|(name, item)| StockLine {
                name: name.to_string(),
                stock: format!("{} {}", item.quantity, item.unit),
            })
            .collect(),
        total_items: items.len(),
        last_updated: zone.format_timestamp(doc.last_updated.as_deref(), TimeStyle::DayAndTime),
    }
}

// =============================================================================
// Staff panel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockRow {
    pub name: String,
    pub category: String,
    pub stock: String,
    pub level: StockLevel,
    pub stock_class: &'static str,
    pub bar_color: &'static str,
    pub percentage: i64,
}

impl StockRow {
    fn new(name: &str, item: &InventoryItem, level: StockLevel) -> Self {
        Self {
            name: name.to_string(),
            category: item
                .category
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "General".to_string()),
            stock: format!("{} {}", item.quantity, item.unit),
            level,
            stock_class: level.stock_class(),
            bar_color: level.bar_color(),
            percentage: fill_percentage(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum InventoryStatus {
    Empty(EmptyState),
    /// Rendered in field order; empty buckets are omitted by the surface
    Buckets {
        critical: Vec<StockRow>,
        low: Vec<StockRow>,
        normal: Capped<StockRow>,
    },
}

pub fn inventory_status(doc: &InventoryDocument) -> InventoryStatus {
    let items = all_items(doc);
    if items.is_empty() {
        return InventoryStatus::Empty(NO_INVENTORY_STAFF);
    }
    let mut critical = Vec::new();
    let mut low = Vec::new();
    let mut normal = Vec::new();
    for (name, item) in items {
        let level = StockLevel::classify(item);
        let row = StockRow::new(name, item, level);
        match level {
            StockLevel::Critical => critical.push(row),
            StockLevel::Low => low.push(row),
            StockLevel::Normal => normal.push(row),
        }
    }
    InventoryStatus::Buckets {
        critical,
        low,
        normal: Capped::new(normal, LIST_CAP),
    }
}
