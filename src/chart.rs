//! The bubble chart engine.
//!
//! A [`BubbleChart`] holds four index-aligned channels (x, y, size, color), the derived
//! marker sizes and the current selection, and renders them into the main region of its
//! surface together with a colorbar and a size legend.
//!
//! With an empty selection all points are drawn in one layer with full color and size
//! encoding. With a non-empty selection the unselected points are drawn first in neutral
//! gray, then the selected points on top with their colors computed against the range of
//! the *whole* color channel, so highlighting never shifts a point's color.
//!
//! The chart removes only the artifacts it created itself (tracked in an ownership
//! ledger); anything else living in the main region, such as a brush rectangle, stays.

use log::{debug, warn};
use plotters::style::RGBColor;
use std::collections::BTreeSet;

use crate::colormap::Colormap;
use crate::config::{ChartConfig, SizeLegendConfig};
use crate::error::{ChartError, Result};
use crate::layout::{self, Layout, RegionHints};
use crate::legend::{ColorBinding, LegendCollaborator, SizeLegendRequest, StandardLegends};
use crate::models::{Channel, PointSet};
use crate::scale::{ColorRange, linscale};
use crate::surface::{
    Anchor, ArtifactId, Axis, DrawingSurface, FreshSurface, PointFill, PointLayer, Scene,
};

/// Fill and outline of unselected points while a selection is active.
pub const NEUTRAL_GRAY: RGBColor = RGBColor(230, 230, 230);
/// Outline of color-encoded points.
pub const OUTLINE: RGBColor = RGBColor(0, 0, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartState {
    /// At least one channel has no data yet.
    Uninitialized,
    /// All channels set; the surface does not reflect the current state.
    Ready,
    /// The last draw succeeded and nothing changed since.
    Rendered,
}

/// What an owned artifact is, for logging and inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedRole {
    /// Unselected points in neutral gray.
    Background,
    /// Color-encoded points.
    Foreground,
    ColorLegend,
    SizeLegend,
}

#[derive(Debug)]
pub struct BubbleChart<S: DrawingSurface = Scene, L: LegendCollaborator = StandardLegends> {
    surface: S,
    legends: L,
    layout: Layout,
    names: [String; 4],
    data: [Option<Vec<f64>>; 4],
    scaled_sizes: Option<Vec<f64>>,
    min_size: f64,
    max_size: f64,
    scale: f64,
    colormap: Colormap,
    size_legend: SizeLegendConfig,
    selection: BTreeSet<usize>,
    owned: Vec<(ArtifactId, OwnedRole)>,
    state: ChartState,
}

impl BubbleChart<Scene, StandardLegends> {
    /// Chart on a freshly allocated in-memory scene with the default mosaic layout.
    pub fn new(config: ChartConfig) -> Result<Self> {
        Self::fresh(config, StandardLegends)
    }
}

impl<S: FreshSurface, L: LegendCollaborator> BubbleChart<S, L> {
    /// Chart on a newly allocated surface of `config.figure_size`.
    pub fn fresh(config: ChartConfig, legends: L) -> Result<Self> {
        config.validate()?;
        let (surface, layout) = layout::compose_fresh::<S>(config.figure_size, &config.mosaic)?;
        Ok(Self::assemble(config, surface, layout, legends))
    }
}

impl<S: DrawingSurface> BubbleChart<S, StandardLegends> {
    /// Chart on an existing surface, see [`layout::compose`] for how regions are picked.
    pub fn on_surface(config: ChartConfig, surface: S, hints: RegionHints) -> Result<Self> {
        Self::with_parts(config, surface, hints, StandardLegends)
    }
}

impl<S: DrawingSurface, L: LegendCollaborator> BubbleChart<S, L> {
    pub fn with_parts(config: ChartConfig, mut surface: S, hints: RegionHints, legends: L) -> Result<Self> {
        config.validate()?;
        let layout = layout::compose(&mut surface, hints, &config.mosaic)?;
        Ok(Self::assemble(config, surface, layout, legends))
    }

    fn assemble(config: ChartConfig, surface: S, layout: Layout, legends: L) -> Self {
        Self {
            surface,
            legends,
            layout,
            names: [
                config.x_name,
                config.y_name,
                config.size_name,
                config.color_name,
            ],
            data: [None, None, None, None],
            scaled_sizes: None,
            min_size: config.min_size,
            max_size: config.max_size,
            scale: 1.0,
            colormap: config.colormap,
            size_legend: config.size_legend,
            selection: BTreeSet::new(),
            owned: Vec::new(),
            state: ChartState::Uninitialized,
        }
    }

    /// Builder form of [`set_points`](Self::set_points).
    pub fn with_points(mut self, points: PointSet) -> Result<Self> {
        self.set_points(points)?;
        Ok(self)
    }

    // ----------------------------
    // Accessors
    // ----------------------------

    pub fn state(&self) -> ChartState {
        self.state
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for collaborators that add their own artifacts (e.g. a brush).
    /// Removing artifacts the chart owns through this handle is not supported.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Number of points, taken from whichever channel is set.
    pub fn len(&self) -> usize {
        self.data.iter().flatten().map(Vec::len).next().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, which: Channel) -> Option<&[f64]> {
        self.data[which.slot()].as_deref()
    }

    pub fn channel_name(&self, which: Channel) -> &str {
        &self.names[which.slot()]
    }

    /// Marker areas after rescaling and the global scale factor.
    pub fn scaled_sizes(&self) -> Option<&[f64]> {
        self.scaled_sizes.as_deref()
    }

    pub fn selection(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// Range the colormap is stretched over: always the full, unfiltered color channel.
    pub fn color_range(&self) -> Option<ColorRange> {
        self.channel(Channel::Color).and_then(ColorRange::of)
    }

    /// Artifacts this chart created and will remove on the next draw.
    pub fn owned_artifacts(&self) -> Vec<(ArtifactId, OwnedRole)> {
        self.owned.clone()
    }

    // ----------------------------
    // Mutation
    // ----------------------------

    /// Replace one channel. `name` replaces the display name when given.
    ///
    /// Fails with `ShapeMismatch` when the length differs from another channel that is
    /// already set, and with `InvalidSelection` when the new length would strand the
    /// current selection. The chart is unchanged on failure. Does not redraw.
    pub fn set_channel(&mut self, which: Channel, data: Vec<f64>, name: Option<&str>) -> Result<()> {
        let found = data.len();
        for other in Channel::ALL {
            if other == which {
                continue;
            }
            if let Some(values) = &self.data[other.slot()]
                && values.len() != found
            {
                return Err(ChartError::ShapeMismatch {
                    channel: which,
                    expected: values.len(),
                    found,
                });
            }
        }
        if let Some(&index) = self.selection.last()
            && index >= found
        {
            return Err(ChartError::InvalidSelection { index, len: found });
        }

        if which == Channel::Size {
            self.scaled_sizes = Some(self.rescale(&data));
        }
        self.data[which.slot()] = Some(data);
        if let Some(name) = name {
            self.names[which.slot()] = name.to_string();
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_channel_name(&mut self, which: Channel, name: &str) {
        self.names[which.slot()] = name.to_string();
        if self.state == ChartState::Rendered {
            self.state = ChartState::Ready;
        }
    }

    /// Replace the whole point set at once and clear the selection.
    pub fn set_points(&mut self, points: PointSet) -> Result<()> {
        points.len()?;
        let PointSet { x, y, size, color } = points;
        self.selection.clear();
        self.scaled_sizes = Some(self.rescale(&size));
        self.data = [Some(x), Some(y), Some(size), Some(color)];
        self.invalidate();
        Ok(())
    }

    /// Replace the selection. Every index must be below [`len`](Self::len); on failure the
    /// previous selection is kept. Does not redraw.
    pub fn set_selection(&mut self, indices: &[usize]) -> Result<()> {
        let len = self.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(ChartError::InvalidSelection { index, len });
        }
        self.selection = indices.iter().copied().collect();
        self.invalidate();
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.invalidate();
    }

    /// Marker area range the size channel is mapped to.
    pub fn set_size_range(&mut self, min_size: f64, max_size: f64) -> Result<()> {
        if !(min_size.is_finite() && max_size.is_finite()) || min_size < 0.0 || max_size < min_size {
            return Err(ChartError::InvalidConfig(format!(
                "size range must satisfy 0 <= min <= max, got [{min_size}, {max_size}]"
            )));
        }
        self.min_size = min_size;
        self.max_size = max_size;
        self.refresh_sizes();
        Ok(())
    }

    /// Global multiplier on every marker area, for zooming or emphasis.
    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ChartError::InvalidConfig(format!(
                "scale must be positive, got {scale}"
            )));
        }
        self.scale = scale;
        self.refresh_sizes();
        Ok(())
    }

    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
        self.invalidate();
    }

    fn refresh_sizes(&mut self) {
        if let Some(raw) = self.data[Channel::Size.slot()].take() {
            self.scaled_sizes = Some(self.rescale(&raw));
            self.data[Channel::Size.slot()] = Some(raw);
        }
        self.invalidate();
    }

    /// Size channel to marker areas; a single-valued channel gets `min_size` everywhere.
    fn rescale(&self, raw: &[f64]) -> Vec<f64> {
        let scaled = linscale(raw, self.min_size, self.max_size).unwrap_or_else(|e| {
            warn!("{e}; drawing every marker at the minimum size");
            vec![self.min_size; raw.len()]
        });
        scaled.into_iter().map(|s| s * self.scale).collect()
    }

    fn missing(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|c| match c {
                Channel::Size => self.scaled_sizes.is_none(),
                _ => self.data[c.slot()].is_none(),
            })
            .collect()
    }

    fn invalidate(&mut self) {
        self.state = if self.missing().is_empty() {
            ChartState::Ready
        } else {
            ChartState::Uninitialized
        };
    }

    // ----------------------------
    // Rendering
    // ----------------------------

    /// Render the current state: point layers into the main region, axis labels, colorbar
    /// and size legend, then repaint the surface.
    ///
    /// Zero points is legal: an empty layer is drawn and both legends are left out.
    pub fn draw(&mut self) -> Result<()> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(ChartError::IncompleteState { missing });
        }

        // Only artifacts in the ledger go; foreign ones in the main region stay put.
        for (id, _role) in std::mem::take(&mut self.owned) {
            self.surface.remove_artifact(id);
        }
        // The color region is ours: clear its contents but keep the region itself.
        if let Some(color) = self.layout.color {
            self.surface.clear_region(color)?;
        }

        let (Some(x), Some(y), Some(c), Some(sizes)) = (
            self.data[Channel::X.slot()].as_deref(),
            self.data[Channel::Y.slot()].as_deref(),
            self.data[Channel::Color.slot()].as_deref(),
            self.scaled_sizes.as_deref(),
        ) else {
            return Err(ChartError::IncompleteState {
                missing: self.missing(),
            });
        };
        let n = x.len();
        let range = ColorRange::of(c).unwrap_or(ColorRange::new(0.0, 1.0));
        debug!(
            "drawing {n} point(s), {} selected, color range [{}, {}]",
            self.selection.len(),
            range.lo,
            range.hi
        );

        let gather = |indices: &[usize], values: &[f64]| -> Vec<f64> {
            indices.iter().map(|&i| values[i]).collect()
        };
        let mut layers: Vec<(PointLayer, OwnedRole)> = Vec::with_capacity(2);
        if self.selection.is_empty() {
            let all: Vec<usize> = (0..n).collect();
            layers.push((
                PointLayer {
                    x: x.to_vec(),
                    y: y.to_vec(),
                    sizes: sizes.to_vec(),
                    fill: PointFill::Mapped {
                        values: c.to_vec(),
                        range,
                        colormap: self.colormap,
                    },
                    outline: OUTLINE,
                    indices: all,
                },
                OwnedRole::Foreground,
            ));
        } else {
            let shown: Vec<usize> = self.selection.iter().copied().collect();
            let masked: Vec<usize> = (0..n).filter(|i| !self.selection.contains(i)).collect();
            layers.push((
                PointLayer {
                    x: gather(&masked, x),
                    y: gather(&masked, y),
                    sizes: gather(&masked, sizes),
                    fill: PointFill::Uniform(NEUTRAL_GRAY),
                    outline: NEUTRAL_GRAY,
                    indices: masked,
                },
                OwnedRole::Background,
            ));
            layers.push((
                PointLayer {
                    x: gather(&shown, x),
                    y: gather(&shown, y),
                    sizes: gather(&shown, sizes),
                    // Pinned to the global range so selected colors match the unselected view.
                    fill: PointFill::Mapped {
                        values: gather(&shown, c),
                        range,
                        colormap: self.colormap,
                    },
                    outline: OUTLINE,
                    indices: shown,
                },
                OwnedRole::Foreground,
            ));
        }

        let main = self.layout.main;
        for (layer, role) in layers {
            let id = self.surface.draw_points(main, layer)?;
            self.owned.push((id, role));
        }

        self.surface
            .set_axis_label(main, Axis::X, &self.names[Channel::X.slot()])?;
        self.surface
            .set_axis_label(main, Axis::Y, &self.names[Channel::Y.slot()])?;

        if n > 0 {
            self.draw_legends(range)?;
        }

        self.surface.repaint()?;
        self.state = ChartState::Rendered;
        Ok(())
    }

    fn draw_legends(&mut self, range: ColorRange) -> Result<()> {
        let color_region = match self.layout.color {
            Some(region) => region,
            None => {
                let region = layout::carve_color_region(&mut self.surface, self.layout.main)?;
                debug!("no color legend region, carved {region} from the main region");
                self.layout.color = Some(region);
                region
            }
        };
        let binding = ColorBinding {
            colormap: self.colormap,
            range,
        };
        let id = self.legends.draw_color_legend(
            &mut self.surface,
            &binding,
            color_region,
            &self.names[Channel::Color.slot()],
        )?;
        self.owned.push((id, OwnedRole::ColorLegend));

        let (region, anchor, inset) = match self.layout.size {
            Some(region) => (region, Anchor::UpperLeft, false),
            None => (self.layout.main, Anchor::UpperRight, true),
        };
        let raw = self.data[Channel::Size.slot()].as_deref().unwrap_or(&[]);
        let scaled = self.scaled_sizes.as_deref().unwrap_or(&[]);
        let request = SizeLegendRequest {
            raw,
            scaled,
            stops: self.size_legend.stops,
            label: &self.names[Channel::Size.slot()],
            mode: self.size_legend.scale,
            region,
            anchor,
            inset,
            facecolor: self.colormap.sample(0.5),
            spacing: self.size_legend.spacing,
        };
        let id = self.legends.draw_size_legend(&mut self.surface, &request)?;
        self.owned.push((id, OwnedRole::SizeLegend));
        Ok(())
    }
}
