use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::dataset::ChartDataset;
use crate::data::record::AggregateRecord;
use crate::foundation::error::{ChartError, ChartResult};

/// Which side of the ledger a chart shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerPartition {
    /// Money received. Totals are the signed sum of income entries.
    Income,
    /// Money spent. Expense amounts are stored negative; totals are their negated sum.
    Expense,
}

impl std::str::FromStr for LedgerPartition {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            other => Err(ChartError::validation(format!(
                "unknown ledger partition \"{other}\" (expected income|expense)"
            ))),
        }
    }
}

/// Producer of per-category totals for one ledger partition.
///
/// Implementations return one record per known category, in a stable order, including categories
/// without activity. Normalization (dropping non-positive totals) is the caller's job.
pub trait AggregationSource {
    fn aggregate(&self, partition: LedgerPartition) -> ChartResult<Vec<AggregateRecord>>;

    /// Fetch and normalize in one step.
    fn dataset(&self, partition: LedgerPartition) -> ChartResult<ChartDataset> {
        Ok(ChartDataset::from_records(self.aggregate(partition)?))
    }
}

/// A user-defined category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// One recorded operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub category_id: u32,
    /// Signed amount in minor units. Expenses are conventionally negative.
    pub amount_minor: i64,
    pub kind: LedgerPartition,
}

/// Categories and operations held in memory, aggregated the way the app's ledger query does.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryLedger {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entries: Vec<LedgerEntry>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> ChartResult<Self> {
        serde_json::from_str(s).map_err(|e| ChartError::serde(e.to_string()))
    }

    pub fn from_path(path: &Path) -> ChartResult<Self> {
        let s = std::fs::read_to_string(path).map_err(|e| {
            ChartError::validation(format!("failed to read ledger '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }

    pub fn with_category(mut self, id: u32, name: impl Into<String>, color: &str) -> Self {
        self.categories.push(Category {
            id,
            name: name.into(),
            color: Some(color.to_owned()),
        });
        self
    }

    pub fn record(&mut self, category_id: u32, amount_minor: i64, kind: LedgerPartition) {
        self.entries.push(LedgerEntry {
            category_id,
            amount_minor,
            kind,
        });
    }
}

impl AggregationSource for InMemoryLedger {
    fn aggregate(&self, partition: LedgerPartition) -> ChartResult<Vec<AggregateRecord>> {
        let mut categories: Vec<&Category> = self.categories.iter().collect();
        categories.sort_by_key(|c| c.id);

        let rows = categories
            .into_iter()
            .map(|c| {
                let total = self
                    .entries
                    .iter()
                    .filter(|e| e.category_id == c.id && e.kind == partition)
                    .map(|e| match partition {
                        LedgerPartition::Income => e.amount_minor,
                        LedgerPartition::Expense => e.amount_minor.saturating_neg(),
                    })
                    .fold(0i64, i64::saturating_add);
                AggregateRecord {
                    category_label: c.name.clone(),
                    color_hex: c.color.clone(),
                    signed_total_minor_units: total,
                }
            })
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/ledger.rs"]
mod tests;
