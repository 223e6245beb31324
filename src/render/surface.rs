use std::collections::BTreeMap;

use crate::foundation::core::{Affine, Canvas, LogicalSize, SurfaceId};

/// Fallback logical size for a host box that reports nothing usable.
pub const DEFAULT_LOGICAL_SIZE: LogicalSize = LogicalSize::new(520.0, 420.0);

// vello_cpu pixmaps are addressed with u16 dimensions.
const MAX_PIXEL_SIDE: u32 = u16::MAX as u32;

/// Box the host reports for one surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HostBox {
    /// Logical width.
    pub logical_width: f64,
    /// Logical height.
    pub logical_height: f64,
    /// Physical pixels per logical unit.
    pub device_pixel_ratio: f64,
}

impl HostBox {
    /// Create a host box.
    pub fn new(logical_width: f64, logical_height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            logical_width,
            logical_height,
            device_pixel_ratio,
        }
    }
}

/// Result of fitting a surface: logical size, pixel buffer size and the logical-to-pixel
/// transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FittedSurface {
    /// Size drawing code works in.
    pub logical: LogicalSize,
    /// Effective, capped pixel ratio.
    pub pixel_ratio: f64,
    /// Backing buffer size.
    pub canvas: Canvas,
    /// Logical units to device pixels.
    pub transform: Affine,
}

/// One drawing surface: the host box, its last fit and the backing buffer.
pub struct RenderTarget {
    id: SurfaceId,
    host: HostBox,
    fitted: Option<FittedSurface>,
    pub(crate) pixmap: Option<vello_cpu::Pixmap>,
    frames_drawn: u64,
}

impl std::fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderTarget")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("fitted", &self.fitted)
            .field("frames_drawn", &self.frames_drawn)
            .finish_non_exhaustive()
    }
}

impl RenderTarget {
    /// Unfitted target for `host`.
    pub fn new(id: SurfaceId, host: HostBox) -> Self {
        Self {
            id,
            host,
            fitted: None,
            pixmap: None,
            frames_drawn: 0,
        }
    }

    /// Surface id.
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// Current host box.
    pub fn host(&self) -> HostBox {
        self.host
    }

    /// Last fit, if any.
    pub fn fitted(&self) -> Option<&FittedSurface> {
        self.fitted.as_ref()
    }

    /// Frames rendered into this target so far.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub(crate) fn note_frame_drawn(&mut self) {
        self.frames_drawn += 1;
    }
}

/// Keeps a target's backing buffer aligned to logical size times the capped pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceManager {
    max_device_pixel_ratio: f64,
    default_logical_size: LogicalSize,
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new(2.0, DEFAULT_LOGICAL_SIZE)
    }
}

impl SurfaceManager {
    /// Manager capping the pixel ratio at `max_device_pixel_ratio` (never below 1).
    pub fn new(max_device_pixel_ratio: f64, default_logical_size: LogicalSize) -> Self {
        let cap = if max_device_pixel_ratio.is_finite() {
            max_device_pixel_ratio.max(1.0)
        } else {
            1.0
        };
        let default_logical_size = if default_logical_size.is_drawable() {
            default_logical_size
        } else {
            DEFAULT_LOGICAL_SIZE
        };
        Self {
            max_device_pixel_ratio: cap,
            default_logical_size,
        }
    }

    /// Effective ratio cap.
    pub fn max_device_pixel_ratio(&self) -> f64 {
        self.max_device_pixel_ratio
    }

    /// Pure fit computation for `host`.
    pub fn compute(&self, host: HostBox) -> FittedSurface {
        let requested = LogicalSize::new(host.logical_width, host.logical_height);
        let logical = if requested.is_drawable() {
            requested
        } else {
            self.default_logical_size
        };

        let dpr = if host.device_pixel_ratio.is_finite() && host.device_pixel_ratio >= 1.0 {
            host.device_pixel_ratio
        } else {
            1.0
        };
        // Shrink the ratio when the buffer would exceed the pixmap limit, so the transform
        // still maps the whole logical box onto the canvas.
        let limit = f64::from(MAX_PIXEL_SIDE);
        let pixel_ratio = dpr
            .min(self.max_device_pixel_ratio)
            .min(limit / logical.width)
            .min(limit / logical.height);

        let side = |v: f64| ((v * pixel_ratio).floor() as u32).clamp(1, MAX_PIXEL_SIDE);
        FittedSurface {
            logical,
            pixel_ratio,
            canvas: Canvas {
                width: side(logical.width),
                height: side(logical.height),
            },
            transform: Affine::scale(pixel_ratio),
        }
    }

    /// Refit `target` to its current host box.
    ///
    /// The backing buffer is reallocated only when the pixel size changed. Calling this every
    /// frame is cheap.
    pub fn fit<'a>(&self, target: &'a mut RenderTarget) -> &'a FittedSurface {
        let fitted = self.compute(target.host);
        let stale = target.fitted.is_none_or(|f| f.canvas != fitted.canvas);
        if stale {
            tracing::debug!(
                surface = %target.id,
                width = fitted.canvas.width,
                height = fitted.canvas.height,
                pixel_ratio = fitted.pixel_ratio,
                "surface refit"
            );
            target.pixmap = None;
        }
        target.fitted.insert(fitted)
    }
}

/// The set of surfaces the host currently shows, keyed by id.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    targets: BTreeMap<SurfaceId, RenderTarget>,
}

impl SurfaceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a surface, or update the host box of an existing one.
    pub fn attach(&mut self, id: impl Into<SurfaceId>, host: HostBox) {
        let id = id.into();
        match self.targets.get_mut(&id) {
            Some(t) => t.host = host,
            None => {
                self.targets
                    .insert(id.clone(), RenderTarget::new(id, host));
            }
        }
    }

    /// Change a surface's logical box. Returns `false` when the surface is unknown.
    pub fn resize(&mut self, id: &SurfaceId, logical_width: f64, logical_height: f64) -> bool {
        let Some(t) = self.targets.get_mut(id) else {
            return false;
        };
        t.host.logical_width = logical_width;
        t.host.logical_height = logical_height;
        true
    }

    /// Change a surface's pixel ratio. Returns `false` when the surface is unknown.
    pub fn set_device_pixel_ratio(&mut self, id: &SurfaceId, device_pixel_ratio: f64) -> bool {
        let Some(t) = self.targets.get_mut(id) else {
            return false;
        };
        t.host.device_pixel_ratio = device_pixel_ratio;
        true
    }

    /// Remove a surface.
    pub fn detach(&mut self, id: &SurfaceId) -> Option<RenderTarget> {
        self.targets.remove(id)
    }

    /// Whether `id` is attached.
    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.targets.contains_key(id)
    }

    /// Borrow a target.
    pub fn get(&self, id: &SurfaceId) -> Option<&RenderTarget> {
        self.targets.get(id)
    }

    /// Mutably borrow a target.
    pub fn get_mut(&mut self, id: &SurfaceId) -> Option<&mut RenderTarget> {
        self.targets.get_mut(id)
    }

    /// Number of attached surfaces.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether no surface is attached.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
