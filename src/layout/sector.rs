use serde::Serialize;

use crate::data::color::PLACEHOLDER_COLOR;
use crate::data::dataset::ChartDataset;
use crate::foundation::core::{Progress, Rgba8};

/// Where the first wedge starts, in degrees clockwise from 12 o'clock.
pub const START_ANGLE_DEG: f64 = 0.0;

/// Smallest sweep (as a fraction of the circle) a revealed category can have, capped at the
/// category's own share. Keeps thin slices present while the reveal is still small.
pub const SWEEP_FLOOR: f64 = 1e-6;

/// What a wedge stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum WedgeKind {
    /// A dataset entry, by index.
    Category(usize),
    /// The single neutral wedge drawn for an empty dataset.
    Placeholder,
    /// Transparent slack absorbing the unrevealed part of the circle.
    Remainder,
}

/// Angular extent of one wedge.
///
/// Angles are degrees measured clockwise from 12 o'clock; `end_angle_deg >= start_angle_deg`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WedgeGeometry {
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub color: Rgba8,
    pub kind: WedgeKind,
}

impl WedgeGeometry {
    pub fn sweep_deg(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }

    pub fn mid_angle_deg(&self) -> f64 {
        (self.start_angle_deg + self.end_angle_deg) * 0.5
    }

    /// `true` when the wedge puts paint on the frame.
    pub fn is_visible(&self) -> bool {
        self.sweep_deg() > 0.0 && !self.color.is_transparent()
    }

    pub fn category_index(&self) -> Option<usize> {
        match self.kind {
            WedgeKind::Category(i) => Some(i),
            WedgeKind::Placeholder | WedgeKind::Remainder => None,
        }
    }
}

/// Wedge geometry for `dataset` revealed up to `progress`.
///
/// Shares come from the final dataset; only the fill grows with progress. Order is fixed:
/// categories in dataset order, then the remainder. For an empty dataset the result is a single
/// full-circle placeholder regardless of progress.
pub fn layout_sectors(dataset: &ChartDataset, progress: Progress) -> Vec<WedgeGeometry> {
    if dataset.is_empty() {
        return vec![WedgeGeometry {
            start_angle_deg: START_ANGLE_DEG,
            end_angle_deg: START_ANGLE_DEG + 360.0,
            color: PLACEHOLDER_COLOR,
            kind: WedgeKind::Placeholder,
        }];
    }

    let p = progress.get();
    let mut out = Vec::with_capacity(dataset.len() + 1);
    let mut cursor = START_ANGLE_DEG;
    let mut push = |sweep: f64, color: Rgba8, kind: WedgeKind| {
        let start = cursor;
        cursor += sweep * 360.0;
        out.push(WedgeGeometry {
            start_angle_deg: start,
            end_angle_deg: cursor,
            color,
            kind,
        });
    };

    for (i, (entry, fraction)) in dataset.fractions().enumerate() {
        // The floor never exceeds the final share, so p = 1 lands exactly on the shares.
        let sweep = if p > 0.0 {
            (fraction * p).max(SWEEP_FLOOR.min(fraction))
        } else {
            0.0
        };
        push(sweep, entry.color, WedgeKind::Category(i));
    }
    push((1.0 - p).max(0.0), Rgba8::TRANSPARENT, WedgeKind::Remainder);

    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/sector.rs"]
mod tests;
