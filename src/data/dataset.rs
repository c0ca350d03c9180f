use std::sync::Arc;

use crate::data::record::{AggregateRecord, CategoryAggregate};

/// Renderable, order-stable category totals.
///
/// Only strictly positive totals survive normalization. The order of the source query is kept and
/// drives wedge order and legend order. Cloning is cheap: animation runs snapshot the dataset.
///
/// Invariant: `grand_total() == 0` iff `is_empty()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChartDataset {
    entries: Arc<[CategoryAggregate]>,
    grand_total: i128,
}

impl ChartDataset {
    /// The canonical empty sentinel (renders as the placeholder wedge).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize raw aggregation rows: resolve colors, drop non-positive totals, sum the rest.
    #[tracing::instrument(level = "debug", skip(records))]
    pub fn from_records(records: impl IntoIterator<Item = AggregateRecord>) -> Self {
        Self::from_aggregates(records.into_iter().map(CategoryAggregate::from_record))
    }

    /// Same as [`ChartDataset::from_records`] for rows whose color is already resolved.
    pub fn from_aggregates(aggregates: impl IntoIterator<Item = CategoryAggregate>) -> Self {
        let mut dropped = 0usize;
        let entries: Vec<CategoryAggregate> = aggregates
            .into_iter()
            .filter(|a| {
                let keep = a.total_minor > 0;
                dropped += usize::from(!keep);
                keep
            })
            .collect();
        let grand_total = entries.iter().map(|a| i128::from(a.total_minor)).sum();
        tracing::debug!(kept = entries.len(), dropped, "normalized chart dataset");
        Self {
            entries: entries.into(),
            grand_total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[CategoryAggregate] {
        &self.entries
    }

    pub fn get(&self, idx: usize) -> Option<&CategoryAggregate> {
        self.entries.get(idx)
    }

    /// Sum of all kept totals, in minor units.
    pub fn grand_total(&self) -> i128 {
        self.grand_total
    }

    /// Share of entry `idx` in `[0, 1]`; 0 for an out-of-range index or an empty dataset.
    pub fn fraction(&self, idx: usize) -> f64 {
        match self.entries.get(idx) {
            Some(a) if self.grand_total > 0 => a.total_minor as f64 / self.grand_total as f64,
            _ => 0.0,
        }
    }

    /// Iterate `(entry, fraction)` pairs in dataset order.
    pub fn fractions(&self) -> impl Iterator<Item = (&CategoryAggregate, f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, a)| (a, self.fraction(i)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/dataset.rs"]
mod tests;
