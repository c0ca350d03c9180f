use crate::data::color::resolve_category_color;
use crate::foundation::core::Rgba8;
use serde::{Deserialize, Serialize};

/// One row produced by an aggregation source: a category and its signed total over a ledger
/// partition, in integer minor currency units.
///
/// Rows arrive for every category, including ones with zero or negative totals. `color_hex` is
/// kept as the raw string so a single malformed color never poisons a whole refresh.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    /// Display name of the category.
    #[serde(alias = "label")]
    pub category_label: String,
    /// `#RRGGBB`, possibly missing or malformed.
    #[serde(default, alias = "color")]
    pub color_hex: Option<String>,
    /// Net signed sum in minor units (cents).
    #[serde(alias = "total")]
    pub signed_total_minor_units: i64,
}

impl AggregateRecord {
    pub fn new(label: impl Into<String>, color_hex: impl Into<String>, total_minor: i64) -> Self {
        Self {
            category_label: label.into(),
            color_hex: Some(color_hex.into()),
            signed_total_minor_units: total_minor,
        }
    }

    /// Record without any color information.
    pub fn uncolored(label: impl Into<String>, total_minor: i64) -> Self {
        Self {
            category_label: label.into(),
            color_hex: None,
            signed_total_minor_units: total_minor,
        }
    }
}

/// A category's net signed sum over one ledger partition, with its color resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryAggregate {
    pub label: String,
    pub color: Rgba8,
    pub total_minor: i64,
}

impl CategoryAggregate {
    pub(crate) fn from_record(record: AggregateRecord) -> Self {
        let color = resolve_category_color(&record.category_label, record.color_hex.as_deref());
        Self {
            label: record.category_label,
            color,
            total_minor: record.signed_total_minor_units,
        }
    }
}
