use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::core::{FrameIndex, SurfaceId};
use crate::foundation::error::VhdsResult;
use crate::render::backend::FrameRGBA;

/// Consumer of rendered frames.
///
/// Ordering contract: for one surface, `push_frame` is called with strictly increasing
/// [`FrameIndex`] values. Frames of different surfaces interleave freely.
pub trait FrameSink {
    /// Accept one frame of `surface`.
    fn push_frame(
        &mut self,
        surface: &SurfaceId,
        idx: FrameIndex,
        frame: &FrameRGBA,
    ) -> VhdsResult<()>;
}

/// Sink that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl FrameSink for DiscardSink {
    fn push_frame(&mut self, _: &SurfaceId, _: FrameIndex, _: &FrameRGBA) -> VhdsResult<()> {
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<(SurfaceId, FrameIndex, FrameRGBA)>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every captured frame in arrival order.
    pub fn frames(&self) -> &[(SurfaceId, FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Frames of one surface in arrival order.
    pub fn frames_for<'a>(
        &'a self,
        surface: &'a SurfaceId,
    ) -> impl Iterator<Item = (FrameIndex, &'a FrameRGBA)> + 'a {
        self.frames
            .iter()
            .filter(move |(id, _, _)| id == surface)
            .map(|(_, idx, f)| (*idx, f))
    }

    /// Number of captured frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop captured frames.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl FrameSink for InMemorySink {
    fn push_frame(
        &mut self,
        surface: &SurfaceId,
        idx: FrameIndex,
        frame: &FrameRGBA,
    ) -> VhdsResult<()> {
        self.frames.push((surface.clone(), idx, frame.clone()));
        Ok(())
    }
}

/// Writes `<dir>/<surface>_<frame:05>.png` with straight alpha.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`, created if missing.
    pub fn new(dir: impl Into<PathBuf>) -> VhdsResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, surface: &SurfaceId, idx: FrameIndex) -> PathBuf {
        let stem: String = surface
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{stem}_{:05}.png", idx.0))
    }
}

impl FrameSink for PngSequenceSink {
    fn push_frame(
        &mut self,
        surface: &SurfaceId,
        idx: FrameIndex,
        frame: &FrameRGBA,
    ) -> VhdsResult<()> {
        let path = self.path_for(surface, idx);
        image::save_buffer_with_format(
            &path,
            &frame.to_straight_rgba8(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::trace!(path = %path.display(), "frame written");
        self.written.push(path);
        Ok(())
    }
}
