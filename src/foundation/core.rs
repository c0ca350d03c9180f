use crate::foundation::error::{ChartError, ChartResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Animation completion fraction, always within `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize)]
pub struct Progress(f64);

impl Progress {
    /// Nothing revealed.
    pub const ZERO: Self = Self(0.0);
    /// Final chart.
    pub const FULL: Self = Self(1.0);

    /// Validate an externally requested progress value.
    pub fn new(value: f64) -> ChartResult<Self> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(ChartError::validation(format!(
                "progress must be within [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Clamp an internally computed value into `[0, 1]`. NaN maps to 0.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw fraction.
    pub fn get(self) -> f64 {
        self.0
    }

    /// `true` once the reveal is complete.
    pub fn is_full(self) -> bool {
        self.0 >= 1.0
    }
}

/// Identifier of one animation run on one controller. Strictly increasing per controller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RunId(pub u64);

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Relative luminance approximation (Rec. 601 weights), in `[0, 1]`.
    pub fn luma(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Black or white, whichever reads better on top of `self`.
    pub fn contrasting(self) -> Self {
        if self.luma() > 0.5 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }

    pub fn to_premul_array(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| crate::foundation::math::mul_div255_u8(u16::from(c), a);
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
