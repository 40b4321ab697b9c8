//! Legend collaborator: turns a color binding into a colorbar and raw/scaled size pairs
//! into a discrete size legend. Stop placement is decided here, not by the chart.

use log::warn;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::colormap::Colormap;
use crate::error::Result;
use crate::scale::{ColorRange, value_range};
use crate::surface::{
    Anchor, Artifact, ArtifactId, ColorBar, DrawingSurface, RegionId, SizeLegend, SizeStop,
};

/// Number of tick values placed along a colorbar.
const COLORBAR_TICKS: usize = 5;

/// Spacing of size legend entries over the raw value range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeScaleMode {
    #[default]
    Linear,
    Logarithmic,
}

/// The colormap and value range a point layer was drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBinding {
    pub colormap: Colormap,
    pub range: ColorRange,
}

#[derive(Debug, Clone)]
pub struct SizeLegendRequest<'a> {
    /// Raw size channel values.
    pub raw: &'a [f64],
    /// Marker areas the raw values were scaled to, index-aligned with `raw`.
    pub scaled: &'a [f64],
    pub stops: usize,
    pub label: &'a str,
    pub mode: SizeScaleMode,
    pub region: RegionId,
    pub anchor: Anchor,
    /// `region` is a plot, not a dedicated legend pane.
    pub inset: bool,
    pub facecolor: RGBColor,
    pub spacing: f64,
}

/// Produces legend artifacts on a surface.
pub trait LegendCollaborator {
    fn draw_color_legend<S: DrawingSurface>(
        &self,
        surface: &mut S,
        binding: &ColorBinding,
        region: RegionId,
        label: &str,
    ) -> Result<ArtifactId>;

    fn draw_size_legend<S: DrawingSurface>(
        &self,
        surface: &mut S,
        request: &SizeLegendRequest<'_>,
    ) -> Result<ArtifactId>;
}

/// Evenly spaced colorbar ticks and linear/logarithmic size stops.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLegends;

impl LegendCollaborator for StandardLegends {
    fn draw_color_legend<S: DrawingSurface>(
        &self,
        surface: &mut S,
        binding: &ColorBinding,
        region: RegionId,
        label: &str,
    ) -> Result<ArtifactId> {
        let bar = ColorBar {
            colormap: binding.colormap,
            range: binding.range,
            label: label.to_string(),
            ticks: colorbar_ticks(binding.range, COLORBAR_TICKS),
        };
        surface.add_artifact(region, Artifact::ColorBar(bar))
    }

    fn draw_size_legend<S: DrawingSurface>(
        &self,
        surface: &mut S,
        request: &SizeLegendRequest<'_>,
    ) -> Result<ArtifactId> {
        let legend = SizeLegend {
            title: request.label.to_string(),
            stops: size_stops(request.raw, request.scaled, request.stops, request.mode),
            facecolor: request.facecolor,
            anchor: request.anchor,
            inset: request.inset,
            spacing: request.spacing,
        };
        surface.add_artifact(request.region, Artifact::SizeLegend(legend))
    }
}

/// `count` evenly spaced values from `range.lo` to `range.hi`; one value for a zero span.
pub fn colorbar_ticks(range: ColorRange, count: usize) -> Vec<f64> {
    if range.hi == range.lo || count < 2 {
        return vec![range.lo];
    }
    let step = (range.hi - range.lo) / (count - 1) as f64;
    (0..count).map(|i| range.lo + step * i as f64).collect()
}

/// Representative size legend entries.
///
/// Values are spread over the raw range; each entry's marker area is read off the
/// straight line through (min raw, its scaled size) and (max raw, its scaled size),
/// which is exact for sizes produced by a linear rescale.
pub fn size_stops(raw: &[f64], scaled: &[f64], count: usize, mode: SizeScaleMode) -> Vec<SizeStop> {
    let pairs: Vec<(f64, f64)> = raw
        .iter()
        .copied()
        .zip(scaled.iter().copied())
        .filter(|(r, s)| r.is_finite() && s.is_finite())
        .collect();
    let Some((lo, hi)) = value_range(&pairs.iter().map(|p| p.0).collect::<Vec<_>>()) else {
        return Vec::new();
    };
    let size_at = |target: f64| {
        pairs
            .iter()
            .find(|(r, _)| *r == target)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    };
    let (s_lo, s_hi) = (size_at(lo), size_at(hi));

    if lo == hi || count == 1 {
        return vec![SizeStop {
            value: hi,
            size: s_hi,
        }];
    }

    let mode = if mode == SizeScaleMode::Logarithmic && lo <= 0.0 {
        warn!("logarithmic size legend needs positive values (min = {lo}), using linear stops");
        SizeScaleMode::Linear
    } else {
        mode
    };

    let n = count.max(2);
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            let value = match mode {
                SizeScaleMode::Linear => lo + (hi - lo) * t,
                SizeScaleMode::Logarithmic => lo * (hi / lo).powf(t),
            };
            let size = s_lo + (value - lo) / (hi - lo) * (s_hi - s_lo);
            SizeStop { value, size }
        })
        .collect()
}
