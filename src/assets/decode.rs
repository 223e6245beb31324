use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{VhdsError, VhdsResult};

/// Decoded background picture in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

const SVG_RASTER_SCALE: f32 = 2.0;
const MAX_SVG_DIM: u32 = 4096;

/// Load a raster (PNG/JPEG/...) or SVG image from disk.
///
/// Callers are expected to degrade on error rather than abort; see
/// [`HeatmapRenderer::with_background`](crate::HeatmapRenderer::with_background).
#[tracing::instrument]
pub fn load_background(path: &Path) -> VhdsResult<BackgroundImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read background '{}'", path.display()))?;
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        rasterize_svg(&bytes)
    } else {
        decode_image(&bytes)
    }
}

pub(crate) fn decode_image(bytes: &[u8]) -> VhdsResult<BackgroundImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(BackgroundImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub(crate) fn rasterize_svg(bytes: &[u8]) -> VhdsResult<BackgroundImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    if !size.width().is_finite() || !size.height().is_finite() {
        return Err(VhdsError::asset("svg has invalid width/height"));
    }
    let width = ((size.width() * SVG_RASTER_SCALE).ceil() as u32).clamp(1, MAX_SVG_DIM);
    let height = ((size.height() * SVG_RASTER_SCALE).ceil() as u32).clamp(1, MAX_SVG_DIM);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| VhdsError::asset("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied.
    Ok(BackgroundImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
