use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::color::ColorDef;
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{ChartError, ChartResult};

/// Smallest frame edge the layout is designed for.
pub const MIN_FRAME_SIZE_PX: u32 = 32;

/// Visual configuration of the chart.
///
/// Every field has a default, so a config document only needs to name what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    /// Edge length of the square output image.
    pub size_px: u32,
    /// Font used for labels and legend. Without a font only wedges are drawn.
    pub font_path: Option<PathBuf>,
    /// In-memory font, takes precedence over `font_path`.
    #[serde(skip)]
    pub font_bytes: Option<Arc<Vec<u8>>>,
    /// Font size of the on-wedge category name and percentage.
    pub label_size_px: f32,
    /// Font size of legend rows.
    pub legend_size_px: f32,
    /// Width of the outline stroked around label and legend glyphs.
    pub outline_px: f32,
    /// Fill of on-wedge text.
    pub label_color: ColorDef,
    /// Fill of legend text.
    pub legend_text_color: ColorDef,
    /// Outline color. `None` picks black or white against the text fill.
    pub outline_color: Option<ColorDef>,
    /// Background fill. `None` leaves the frame transparent.
    pub background: Option<ColorDef>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            size_px: 400,
            font_path: None,
            font_bytes: None,
            label_size_px: 14.0,
            legend_size_px: 13.0,
            outline_px: 2.5,
            label_color: ColorDef(Rgba8::WHITE),
            legend_text_color: ColorDef(Rgba8::BLACK),
            outline_color: None,
            background: None,
        }
    }
}

impl ChartStyle {
    pub fn validate(&self) -> ChartResult<()> {
        if self.size_px < MIN_FRAME_SIZE_PX || self.size_px > u32::from(u16::MAX) {
            return Err(ChartError::validation(format!(
                "size_px must be within [{MIN_FRAME_SIZE_PX}, {}], got {}",
                u16::MAX,
                self.size_px
            )));
        }
        for (name, v) in [
            ("label_size_px", self.label_size_px),
            ("legend_size_px", self.legend_size_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(ChartError::validation(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.outline_px.is_finite() || self.outline_px < 0.0 {
            return Err(ChartError::validation("outline_px must be finite and >= 0"));
        }
        Ok(())
    }

    /// Font bytes, loading `font_path` if no in-memory font was given.
    pub(crate) fn load_font(&self) -> ChartResult<Option<Arc<Vec<u8>>>> {
        if let Some(bytes) = &self.font_bytes {
            return Ok(Some(bytes.clone()));
        }
        let Some(path) = &self.font_path else {
            return Ok(None);
        };
        let bytes = std::fs::read(path).map_err(|e| {
            ChartError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Ok(Some(Arc::new(bytes)))
    }

    pub(crate) fn outline_for(&self, fill: Rgba8) -> Rgba8 {
        self.outline_color.map(|c| c.0).unwrap_or_else(|| fill.contrasting())
    }
}

/// Pixel placement of the circle and the legend band inside a square frame.
///
/// The circle is horizontally centered in the upper part of the frame; the legend band sits
/// below it so legend rows never overlap wedges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartGeometry {
    pub size: f64,
    pub center: Point,
    pub radius: f64,
    pub legend_top: f64,
    pub legend_bottom: f64,
    pub margin: f64,
}

impl ChartGeometry {
    const RADIUS_FRAC: f64 = 0.35;
    const CENTER_Y_FRAC: f64 = 0.4;
    const LEGEND_GAP_FRAC: f64 = 0.03;
    const MARGIN_FRAC: f64 = 0.03;

    pub fn for_size(size_px: u32) -> Self {
        let size = f64::from(size_px);
        let radius = size * Self::RADIUS_FRAC;
        let center = Point::new(size * 0.5, size * Self::CENTER_Y_FRAC);
        let margin = size * Self::MARGIN_FRAC;
        Self {
            size,
            center,
            radius,
            legend_top: center.y + radius + size * Self::LEGEND_GAP_FRAC,
            legend_bottom: size - margin,
            margin,
        }
    }

    /// Map a point of the normalized chart space (unit circle, y up) to pixels (y down).
    pub fn to_pixels(&self, x: f64, y: f64) -> Point {
        Point::new(self.center.x + x * self.radius, self.center.y - y * self.radius)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
