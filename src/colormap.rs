//! Named colormaps backed by the plotters colormap tables.

use plotters::style::RGBColor;
use plotters::style::colors::colormaps::{BlackWhite, Bone, ColorMap, Copper, ViridisRGB};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;
use crate::scale::ColorRange;

/// Number of discrete levels a colormap is resampled to.
pub const COLORMAP_LEVELS: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Viridis,
    Bone,
    Copper,
    Gray,
}

impl Colormap {
    /// Color at position `t` in `[0, 1]`, quantized to [`COLORMAP_LEVELS`] steps.
    pub fn sample(self, t: f64) -> RGBColor {
        let steps = f64::from(COLORMAP_LEVELS - 1);
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let t = (t * steps).round() / steps;
        match self {
            Colormap::Viridis => ViridisRGB.get_color_normalized(t, 0.0, 1.0),
            Colormap::Bone => Bone.get_color_normalized(t, 0.0, 1.0),
            Colormap::Copper => Copper.get_color_normalized(t, 0.0, 1.0),
            Colormap::Gray => BlackWhite.get_color_normalized(t, 0.0, 1.0),
        }
    }

    /// Color of value `v` within `range`.
    pub fn map(self, v: f64, range: ColorRange) -> RGBColor {
        self.sample(range.normalize(v))
    }

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Bone => "bone",
            Colormap::Copper => "copper",
            Colormap::Gray => "gray",
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viridis" => Ok(Colormap::Viridis),
            "bone" => Ok(Colormap::Bone),
            "copper" => Ok(Colormap::Copper),
            "gray" | "grey" | "binary" => Ok(Colormap::Gray),
            _ => Err(ChartError::UnknownColormap(s.to_string())),
        }
    }
}
