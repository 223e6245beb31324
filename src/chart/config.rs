use std::path::PathBuf;

use crate::assets::color::{hsl_to_rgb, rgb_to_hsl};
use crate::foundation::core::{LogicalSize, Rgba8};
use crate::foundation::math::lerp;
use crate::render::surface::{DEFAULT_LOGICAL_SIZE, SurfaceManager};

/// Environment knob capping every chart's device pixel ratio.
pub const MAX_DPR_ENV: &str = "VHDS_MAX_DPR";

/// Color space a [`ColorRamp`] interpolates in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RampSpace {
    /// Channel-wise interpolation.
    #[default]
    LinearRgb,
    /// Hue along the shorter arc, saturation and lightness linearly.
    Hsl,
}

/// Score-to-color mapping between a cool (low) and a hot (high) endpoint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorRamp {
    /// Color at score 0.
    pub cool: Rgba8,
    /// Color at score 100.
    pub hot: Rgba8,
    /// Interpolation space.
    #[serde(default)]
    pub space: RampSpace,
}

impl ColorRamp {
    /// Color at `t` in `[0, 1]` (clamped). Continuous and endpoint-exact.
    pub fn sample(&self, t: f64) -> Rgba8 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let ch = |a: u8, b: u8| lerp(f64::from(a), f64::from(b), t).round() as u8;
        let alpha = ch(self.cool.a, self.hot.a);
        match self.space {
            RampSpace::LinearRgb => Rgba8::new(
                ch(self.cool.r, self.hot.r),
                ch(self.cool.g, self.hot.g),
                ch(self.cool.b, self.hot.b),
                alpha,
            ),
            RampSpace::Hsl => {
                let unit = |c: u8| f64::from(c) / 255.0;
                let (h0, s0, l0) = rgb_to_hsl(unit(self.cool.r), unit(self.cool.g), unit(self.cool.b));
                let (h1, s1, l1) = rgb_to_hsl(unit(self.hot.r), unit(self.hot.g), unit(self.hot.b));
                let mut dh = h1 - h0;
                if dh > 180.0 {
                    dh -= 360.0;
                } else if dh < -180.0 {
                    dh += 360.0;
                }
                let (r, g, b) = hsl_to_rgb(h0 + dh * t, lerp(s0, s1, t), lerp(l0, l1, t));
                let byte = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
                Rgba8::new(byte(r), byte(g), byte(b), alpha)
            }
        }
    }

    /// Color for a `0..=100` score.
    pub fn for_score(&self, score: u8) -> Rgba8 {
        self.sample(f64::from(score.min(100)) / 100.0)
    }
}

/// Decorative body outline behind the heatmap hotspots.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Silhouette {
    /// Hotspots over the backdrop only.
    None,
    /// Built-in vector outline.
    #[default]
    Outline,
    /// Raster or SVG image loaded once before the first frame.
    Image(PathBuf),
}

/// Knobs shared by both chart types.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ChartConfig {
    /// Redraw cap in frames per second; `None` draws on every tick.
    pub frame_rate_cap: Option<f64>,
    /// Multiplier on glow radii.
    pub glow_scale: f64,
    /// Score-to-color mapping.
    pub ramp: ColorRamp,
    /// Line and node color.
    pub accent: Rgba8,
    /// Label font size in logical pixels.
    pub label_size_px: f64,
    /// Score given to padded axes or zones.
    pub pad_score: u8,
    /// Upper bound on the device pixel ratio.
    pub max_device_pixel_ratio: f64,
    /// Logical size used when the host box is empty.
    pub default_logical_size: LogicalSize,
    /// Heatmap body outline; ignored by the radar.
    pub silhouette: Silhouette,
}

impl ChartConfig {
    /// Radar defaults: unthrottled, ratio capped at 2, padded axes score 80.
    pub fn radar() -> Self {
        let accent = Rgba8::opaque(120, 220, 255);
        Self {
            frame_rate_cap: None,
            glow_scale: 1.0,
            ramp: ColorRamp {
                cool: accent,
                hot: accent,
                space: RampSpace::LinearRgb,
            },
            accent,
            label_size_px: 12.0,
            pad_score: 80,
            max_device_pixel_ratio: 2.0,
            default_logical_size: DEFAULT_LOGICAL_SIZE,
            silhouette: Silhouette::None,
        }
    }

    /// Heatmap defaults: 12 fps, ratio capped at 3, padded zones score 0.
    pub fn heatmap() -> Self {
        Self {
            frame_rate_cap: Some(12.0),
            glow_scale: 1.0,
            ramp: ColorRamp {
                cool: Rgba8::opaque(0, 255, 220),
                hot: Rgba8::opaque(255, 80, 120),
                space: RampSpace::LinearRgb,
            },
            accent: Rgba8::opaque(120, 200, 255),
            label_size_px: 12.0,
            pad_score: 0,
            max_device_pixel_ratio: 3.0,
            default_logical_size: DEFAULT_LOGICAL_SIZE,
            silhouette: Silhouette::Outline,
        }
    }

    /// Minimum milliseconds between frames, when throttled.
    pub fn frame_interval_ms(&self) -> Option<f64> {
        self.frame_rate_cap
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| 1000.0 / fps)
    }

    /// Ratio cap after applying `VHDS_MAX_DPR`.
    pub fn effective_max_dpr(&self) -> f64 {
        let env = std::env::var(MAX_DPR_ENV)
            .ok()
            .and_then(|v| parse_max_dpr(&v));
        match env {
            Some(cap) => self.max_device_pixel_ratio.min(cap),
            None => self.max_device_pixel_ratio,
        }
    }

    /// Surface manager honoring this chart's ratio cap and default size.
    pub fn surface_manager(&self) -> SurfaceManager {
        SurfaceManager::new(self.effective_max_dpr(), self.default_logical_size)
    }

    /// Apply a partial override on top of `self`.
    pub fn merged(mut self, o: ChartOverrides) -> Self {
        if let Some(v) = o.frame_rate_cap {
            self.frame_rate_cap = v;
        }
        if let Some(v) = o.glow_scale {
            self.glow_scale = v;
        }
        if let Some(v) = o.ramp {
            self.ramp = v;
        }
        if let Some(v) = o.accent {
            self.accent = v;
        }
        if let Some(v) = o.label_size_px {
            self.label_size_px = v;
        }
        if let Some(v) = o.pad_score {
            self.pad_score = v.min(100);
        }
        if let Some(v) = o.max_device_pixel_ratio {
            self.max_device_pixel_ratio = v;
        }
        if let Some(v) = o.default_logical_size {
            self.default_logical_size = v;
        }
        if let Some(v) = o.silhouette {
            self.silhouette = v;
        }
        self
    }
}

/// Partial [`ChartConfig`] as written in a config file; absent keys keep the chart's defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartOverrides {
    /// Redraw cap in frames per second; `null` disables throttling.
    #[serde(deserialize_with = "some_nullable")]
    pub frame_rate_cap: Option<Option<f64>>,
    /// Multiplier on glow radii.
    pub glow_scale: Option<f64>,
    /// Score-to-color mapping.
    pub ramp: Option<ColorRamp>,
    /// Line and node color.
    pub accent: Option<Rgba8>,
    /// Label font size in logical pixels.
    pub label_size_px: Option<f64>,
    /// Score given to padded axes or zones.
    pub pad_score: Option<u8>,
    /// Upper bound on the device pixel ratio.
    pub max_device_pixel_ratio: Option<f64>,
    /// Logical size used when the host box is empty.
    pub default_logical_size: Option<LogicalSize>,
    /// Heatmap body outline.
    pub silhouette: Option<Silhouette>,
}

fn some_nullable<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Option::<f64>::deserialize(deserializer).map(Some)
}

fn parse_max_dpr(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/chart/config.rs"]
mod tests;
