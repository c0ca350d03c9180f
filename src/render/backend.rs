use crate::{
    foundation::error::{ChartError, ChartResult},
    foundation::math::unpremultiply_rgba8_in_place,
    layout::frame::ChartFrame,
    render::style::ChartStyle,
};

/// A rendered chart frame as RGBA8 pixels.
///
/// Backends produce **premultiplied alpha**; the `premultiplied` flag makes that explicit at API
/// boundaries. Use [`FrameRGBA::to_straight_rgba8`] before handing pixels to encoders that expect
/// straight alpha (PNG).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
            premultiplied: true,
        }
    }

    /// Pixel at `(x, y)` as stored, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut out);
        }
        out
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// A rasterizer for composed [`ChartFrame`]s.
pub trait ChartBackend {
    /// Draw wedges, labels and legend of `frame` into a fresh square image.
    fn render_frame(&mut self, frame: &ChartFrame) -> ChartResult<FrameRGBA>;

    /// Edge length in pixels of the frames this backend produces.
    fn frame_size(&self) -> u32;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Create a rendering backend implementation.
pub fn create_backend(kind: BackendKind, style: &ChartStyle) -> ChartResult<Box<dyn ChartBackend>> {
    style.validate()?;
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuChartBackend::new(
            style.clone(),
        )?)),
    }
}

impl From<image::ImageError> for ChartError {
    fn from(e: image::ImageError) -> Self {
        Self::Other(anyhow::Error::new(e))
    }
}
