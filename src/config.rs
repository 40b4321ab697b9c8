//! Chart configuration: channel names, figure size, marker size range, colormap and layout.
//!
//! Every field has a default, so a JSON file only needs the keys it wants to change:
//!
//! ```
//! use bubblechart::config::ChartConfig;
//!
//! let cfg = ChartConfig::from_json_str(r#"{ "max_size": 800, "colormap": "copper" }"#)?;
//! assert_eq!(cfg.min_size, 50.0);
//! assert_eq!(cfg.max_size, 800.0);
//! # Ok::<(), bubblechart::ChartError>(())
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::colormap::Colormap;
use crate::error::{ChartError, Result};
use crate::layout::Mosaic;
use crate::legend::SizeScaleMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub x_name: String,
    pub y_name: String,
    pub size_name: String,
    pub color_name: String,
    /// Pixels; used only when the chart allocates its own surface.
    pub figure_size: (u32, u32),
    /// Marker area (square pixels) of the smallest size value.
    pub min_size: f64,
    /// Marker area (square pixels) of the largest size value.
    pub max_size: f64,
    pub colormap: Colormap,
    pub mosaic: Mosaic,
    pub size_legend: SizeLegendConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            x_name: "x".into(),
            y_name: "y".into(),
            size_name: "size".into(),
            color_name: "color".into(),
            figure_size: (1000, 800),
            min_size: 50.0,
            max_size: 500.0,
            colormap: Colormap::Viridis,
            mosaic: Mosaic::default(),
            size_legend: SizeLegendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLegendConfig {
    /// Number of representative entries.
    pub stops: usize,
    pub scale: SizeScaleMode,
    /// Vertical spacing between entries, in marker diameters.
    pub spacing: f64,
}

impl Default for SizeLegendConfig {
    fn default() -> Self {
        Self {
            stops: 3,
            scale: SizeScaleMode::Linear,
            spacing: 1.5,
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ChartConfig =
            serde_json::from_str(s).map_err(|e| ChartError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Ok(Self::from_json_str(&text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_size.is_finite() && self.max_size.is_finite()) {
            return Err(ChartError::InvalidConfig(
                "min_size and max_size must be finite".into(),
            ));
        }
        if self.min_size < 0.0 || self.max_size < self.min_size {
            return Err(ChartError::InvalidConfig(format!(
                "size range must satisfy 0 <= min_size <= max_size, got [{}, {}]",
                self.min_size, self.max_size
            )));
        }
        if self.figure_size.0 == 0 || self.figure_size.1 == 0 {
            return Err(ChartError::InvalidConfig("figure_size must be non-zero".into()));
        }
        if self.size_legend.stops == 0 {
            return Err(ChartError::InvalidConfig(
                "size_legend.stops must be at least 1".into(),
            ));
        }
        if !(self.size_legend.spacing.is_finite() && self.size_legend.spacing > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "size_legend.spacing must be positive, got {}",
                self.size_legend.spacing
            )));
        }
        self.mosaic.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_layout() {
        let cfg = ChartConfig::default();
        assert_eq!((cfg.min_size, cfg.max_size), (50.0, 500.0));
        assert_eq!(cfg.size_legend.stops, 3);
        assert_eq!(cfg.size_legend.scale, SizeScaleMode::Linear);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_size_range() {
        let err = ChartConfig::from_json_str(r#"{ "min_size": 10, "max_size": 5 }"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_positive_legend_spacing() {
        let err = ChartConfig::from_json_str(r#"{ "size_legend": { "spacing": 0 } }"#).unwrap_err();
        assert!(matches!(err, ChartError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unknown_colormap() {
        assert!(ChartConfig::from_json_str(r#"{ "colormap": "rainbow" }"#).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("chart.json");
        std::fs::write(&p, r#"{ "color_name": "price", "figure_size": [640, 480] }"#).unwrap();
        let cfg = ChartConfig::load(&p).unwrap();
        assert_eq!(cfg.color_name, "price");
        assert_eq!(cfg.figure_size, (640, 480));
    }
}
