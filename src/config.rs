use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::chart::config::{ChartConfig, ChartOverrides};
use crate::foundation::error::{VhdsError, VhdsResult};
use crate::render::cpu::CpuBackendOpts;

/// Crate-wide settings: one [`ChartConfig`] per chart type plus backend options.
#[derive(Clone, Debug, PartialEq)]
pub struct VhdsConfig {
    /// Radar settings.
    pub radar: ChartConfig,
    /// Heatmap settings.
    pub heatmap: ChartConfig,
    /// TTF/OTF font for labels. Without one, labels are laid out but not rasterized.
    pub font: Option<PathBuf>,
    /// Clear color applied before every frame.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for VhdsConfig {
    fn default() -> Self {
        Self {
            radar: ChartConfig::radar(),
            heatmap: ChartConfig::heatmap(),
            font: None,
            clear_rgba: None,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct VhdsConfigFile {
    radar: ChartOverrides,
    heatmap: ChartOverrides,
    font: Option<PathBuf>,
    clear_rgba: Option<[u8; 4]>,
}

impl VhdsConfig {
    /// Parse a JSON document. Absent keys keep their defaults.
    pub fn from_json_str(s: &str) -> VhdsResult<Self> {
        let file: VhdsConfigFile =
            serde_json::from_str(s).map_err(|e| VhdsError::serde(e.to_string()))?;
        let cfg = Self {
            radar: ChartConfig::radar().merged(file.radar),
            heatmap: ChartConfig::heatmap().merged(file.heatmap),
            font: file.font,
            clear_rgba: file.clear_rgba,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON file. Relative `font` and silhouette paths resolve against the
    /// file's directory.
    pub fn from_json_path(path: &Path) -> VhdsResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json_str(&text)?;
        if let Some(base) = path.parent() {
            cfg.resolve_relative_to(base);
        }
        Ok(cfg)
    }

    /// Backend options carried by this config.
    pub fn backend_opts(&self) -> CpuBackendOpts {
        CpuBackendOpts::default()
            .with_clear_rgba(self.clear_rgba)
            .with_font(self.font.clone())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if let Some(font) = &mut self.font
            && font.is_relative()
        {
            *font = base.join(&*font);
        }
        for chart in [&mut self.radar, &mut self.heatmap] {
            if let crate::chart::config::Silhouette::Image(p) = &mut chart.silhouette
                && p.is_relative()
            {
                *p = base.join(&*p);
            }
        }
    }

    fn validate(&self) -> VhdsResult<()> {
        for (name, c) in [("radar", &self.radar), ("heatmap", &self.heatmap)] {
            if !c.glow_scale.is_finite() || c.glow_scale < 0.0 {
                return Err(VhdsError::validation(format!(
                    "{name}.glow_scale must be finite and >= 0"
                )));
            }
            if !c.label_size_px.is_finite() || c.label_size_px <= 0.0 {
                return Err(VhdsError::validation(format!(
                    "{name}.label_size_px must be finite and > 0"
                )));
            }
            if !c.max_device_pixel_ratio.is_finite() || c.max_device_pixel_ratio < 1.0 {
                return Err(VhdsError::validation(format!(
                    "{name}.max_device_pixel_ratio must be finite and >= 1"
                )));
            }
            if let Some(fps) = c.frame_rate_cap
                && (!fps.is_finite() || fps <= 0.0)
            {
                return Err(VhdsError::validation(format!(
                    "{name}.frame_rate_cap must be positive, or null for no cap"
                )));
            }
        }
        Ok(())
    }
}
