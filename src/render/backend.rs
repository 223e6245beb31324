use crate::foundation::error::VhdsResult;
use crate::render::plan::FramePlan;
use crate::render::surface::RenderTarget;

/// A rendered frame as RGBA8 pixels.
///
/// Frames leave the CPU backend premultiplied; the flag makes that explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Copy of the pixels with straight alpha.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            for px in out.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        out
    }

    /// Straight-alpha pixel at `(x, y)`, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        let mut out = [px[0], px[1], px[2], px[3]];
        if self.premultiplied && out[3] != 0 {
            let a = u16::from(out[3]);
            for c in &mut out[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Some(out)
    }
}

/// Executes a [`FramePlan`] against a fitted [`RenderTarget`].
///
/// The controller refits the target before every call, so implementations may rely on
/// [`RenderTarget::fitted`] being set.
pub trait RenderBackend {
    /// Draw `plan` into `target` and read the frame back.
    fn render(&mut self, target: &mut RenderTarget, plan: &FramePlan) -> VhdsResult<FrameRGBA>;
}
