use std::path::{Path, PathBuf};

use crate::foundation::core::{Progress, RunId};
use crate::foundation::error::{ChartError, ChartResult};
use crate::render::backend::FrameRGBA;

/// Identifies which run and tick produced a presented frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameMeta {
    pub run: RunId,
    /// 0 for static renders, `n` for the frame drawn by the n-th tick.
    pub tick: u32,
    pub progress: Progress,
}

/// Host display target. Each successful `present` replaces what is shown.
pub trait ChartSurface {
    fn present(&mut self, frame: &FrameRGBA, meta: FrameMeta) -> ChartResult<()>;
}

/// Surface that keeps the current frame and a log of everything presented.
#[derive(Debug, Default)]
pub struct InMemorySurface {
    current: Option<FrameRGBA>,
    history: Vec<FrameMeta>,
}

impl InMemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame currently on display.
    pub fn current(&self) -> Option<&FrameRGBA> {
        self.current.as_ref()
    }

    /// Metadata of every presented frame, oldest first.
    pub fn history(&self) -> &[FrameMeta] {
        &self.history
    }

    pub fn last_meta(&self) -> Option<FrameMeta> {
        self.history.last().copied()
    }
}

impl ChartSurface for InMemorySurface {
    fn present(&mut self, frame: &FrameRGBA, meta: FrameMeta) -> ChartResult<()> {
        self.current = Some(frame.clone());
        self.history.push(meta);
        Ok(())
    }
}

/// Surface that writes every presented frame as a PNG file.
///
/// Files are named `<prefix>_<run>_<tick>.png` with a zero-padded tick.
#[derive(Debug)]
pub struct PngSequenceSurface {
    dir: PathBuf,
    prefix: String,
    written: Vec<PathBuf>,
}

impl PngSequenceSurface {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> ChartResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ChartError::surface(format!("create output dir '{}': {e}", dir.display()))
        })?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in presentation order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, meta: FrameMeta) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{:04}.png", self.prefix, meta.run.0, meta.tick))
    }
}

impl ChartSurface for PngSequenceSurface {
    fn present(&mut self, frame: &FrameRGBA, meta: FrameMeta) -> ChartResult<()> {
        let path = self.path_for(meta);
        let rgba = frame.to_straight_rgba8();
        image::save_buffer_with_format(
            &path,
            &rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| ChartError::surface(format!("write '{}': {e}", path.display())))?;
        tracing::debug!(path = %path.display(), tick = meta.tick, "wrote frame");
        self.written.push(path);
        Ok(())
    }
}
