use serde::Serialize;

use crate::data::dataset::ChartDataset;
use crate::data::money::format_minor_units;
use crate::foundation::core::{Progress, Rgba8};
use crate::layout::label::{LabelAnchor, PercentLabels, place_labels};
use crate::layout::sector::{WedgeGeometry, layout_sectors};

/// One legend row: a color swatch and `"<label> — <total in major units>"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub color: Rgba8,
    pub text: String,
}

/// Legend rows in dataset order. Empty for an empty dataset.
pub fn legend_entries(dataset: &ChartDataset) -> Vec<LegendEntry> {
    dataset
        .entries()
        .iter()
        .map(|a| LegendEntry {
            color: a.color,
            text: format!("{} — {}", a.label, format_minor_units(a.total_minor)),
        })
        .collect()
}

/// Everything a backend needs to draw one frame; no pixels yet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartFrame {
    pub progress: Progress,
    pub wedges: Vec<WedgeGeometry>,
    pub labels: Vec<LabelAnchor>,
    pub legend: Vec<LegendEntry>,
}

impl ChartFrame {
    /// `true` when the frame shows the empty-dataset placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.legend.is_empty()
    }
}

/// Sector layout + label placement + legend for one progress value.
pub fn compose_frame(
    dataset: &ChartDataset,
    percents: &PercentLabels,
    progress: Progress,
) -> ChartFrame {
    let wedges = layout_sectors(dataset, progress);
    let labels = place_labels(&wedges, dataset, percents);
    ChartFrame {
        progress,
        wedges,
        labels,
        legend: legend_entries(dataset),
    }
}
