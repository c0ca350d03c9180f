use serde::Serialize;

use crate::data::dataset::ChartDataset;
use crate::foundation::math::clock_deg_to_math_rad;
use crate::layout::sector::WedgeGeometry;

/// Anchor radius of a category label, as a fraction of the chart radius.
pub const LABEL_RADIUS: f64 = 0.65;
/// Vertical offset of the name line from the anchor (normalized units, y up).
pub const NAME_OFFSET_Y: f64 = 0.07;
/// Vertical offset of the percentage line from the anchor (normalized units, y up).
pub const PERCENT_OFFSET_Y: f64 = -0.08;
/// Shares below this percentage get an empty percentage label.
pub const MIN_LABELED_PERCENT: f64 = 0.5;

/// Percentage strings for every dataset entry, computed once from the final dataset.
///
/// One animation run holds a single instance, so the text is identical on every frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PercentLabels(Vec<String>);

impl PercentLabels {
    pub fn new(dataset: &ChartDataset) -> Self {
        Self(
            dataset
                .fractions()
                .map(|(_, fraction)| format_percent(fraction * 100.0))
                .collect(),
        )
    }

    pub fn get(&self, idx: usize) -> &str {
        self.0.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

fn format_percent(pct: f64) -> String {
    if pct < MIN_LABELED_PERCENT {
        return String::new();
    }
    format!("{pct:.1}%")
}

/// Text anchor for one category wedge, in the normalized chart space.
///
/// The unit circle is the chart outline, the origin its center, and y points up. `(x, y)` is the
/// point at [`LABEL_RADIUS`] along the wedge bisector.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelAnchor {
    /// Index into the dataset.
    pub entry: usize,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub percent_text: String,
}

impl LabelAnchor {
    /// Where the category name is centered.
    pub fn name_pos(&self) -> (f64, f64) {
        (self.x, self.y + NAME_OFFSET_Y)
    }

    /// Where the percentage is centered.
    pub fn percent_pos(&self) -> (f64, f64) {
        (self.x, self.y + PERCENT_OFFSET_Y)
    }
}

/// Anchors for the category wedges of one frame.
///
/// Positions follow the geometry handed in (the animated wedges), while names and percentages come
/// from the dataset and `percents`, so only the position moves between frames. Placeholder and
/// remainder wedges get no label; neither do wedges that have not started to reveal.
pub fn place_labels(
    wedges: &[WedgeGeometry],
    dataset: &ChartDataset,
    percents: &PercentLabels,
) -> Vec<LabelAnchor> {
    wedges
        .iter()
        .filter(|w| w.sweep_deg() > 0.0)
        .filter_map(|w| {
            let entry = w.category_index()?;
            let aggregate = dataset.get(entry)?;
            let theta = clock_deg_to_math_rad(w.mid_angle_deg());
            Some(LabelAnchor {
                entry,
                x: LABEL_RADIUS * theta.cos(),
                y: LABEL_RADIUS * theta.sin(),
                text: aggregate.label.clone(),
                percent_text: percents.get(entry).to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/label.rs"]
mod tests;
