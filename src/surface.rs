//! The drawing surface the chart renders into.
//!
//! [`DrawingSurface`] is the boundary to whatever actually paints pixels. [`Scene`] is a
//! retained, in-memory implementation: it keeps regions, the artifacts drawn in them and
//! their axis labels, and counts repaints. `viz::PlottersSurface` wraps a `Scene` and
//! renders it to SVG/PNG on every repaint.

use plotters::style::RGBColor;
use std::collections::BTreeMap;
use std::fmt;

use crate::colormap::Colormap;
use crate::error::{ChartError, Result};
use crate::scale::ColorRange;

/// Handle of a rectangular sub-area of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub(crate) usize);

impl RegionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of anything drawn into a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactId(pub(crate) u64);

/// Pixel rectangle, origin at the top-left corner of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Corner a legend is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

/// How the points of a layer are filled.
#[derive(Debug, Clone, PartialEq)]
pub enum PointFill {
    /// Every point gets the same color; no color encoding.
    Uniform(RGBColor),
    /// Each point's value is looked up in `colormap` over `range`.
    Mapped {
        values: Vec<f64>,
        range: ColorRange,
        colormap: Colormap,
    },
}

/// One scatter layer: index-aligned positions, sizes and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLayer {
    /// Indices into the chart's point set, in drawing order.
    pub indices: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Marker areas in square pixels.
    pub sizes: Vec<f64>,
    pub fill: PointFill,
    pub outline: RGBColor,
}

impl PointLayer {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Resolved fill color of every point.
    pub fn colors(&self) -> Vec<RGBColor> {
        match &self.fill {
            PointFill::Uniform(c) => vec![*c; self.len()],
            PointFill::Mapped {
                values,
                range,
                colormap,
            } => values.iter().map(|v| colormap.map(*v, *range)).collect(),
        }
    }
}

/// Continuous color scale explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBar {
    pub colormap: Colormap,
    pub range: ColorRange,
    pub label: String,
    /// Tick values shown along the bar.
    pub ticks: Vec<f64>,
}

/// One discrete entry of a size legend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeStop {
    /// Raw channel value the entry stands for.
    pub value: f64,
    /// Marker area in square pixels.
    pub size: f64,
}

/// Discrete size scale explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegend {
    pub title: String,
    pub stops: Vec<SizeStop>,
    pub facecolor: RGBColor,
    pub anchor: Anchor,
    /// Drawn on top of a plot instead of in a dedicated region.
    pub inset: bool,
    /// Vertical spacing between entries, in marker diameters.
    pub spacing: f64,
}

/// Shapes that input devices draw on top of a plot, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Rect {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        color: RGBColor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Points(PointLayer),
    ColorBar(ColorBar),
    SizeLegend(SizeLegend),
    Overlay(Overlay),
}

/// Primitives the chart engine needs from a drawing backend.
///
/// One surface, and all regions on it, belong to a single chart. Sharing a region
/// between two charts is unsupported: each would remove the other's artifacts.
pub trait DrawingSurface {
    /// Figure dimensions in pixels.
    fn figure_size(&self) -> (u32, u32);

    fn add_region(&mut self, rect: PixelRect) -> RegionId;

    /// All regions in creation order.
    fn regions(&self) -> Vec<RegionId>;

    fn region_rect(&self, region: RegionId) -> Option<PixelRect>;

    fn set_region_rect(&mut self, region: RegionId, rect: PixelRect) -> Result<()>;

    fn add_artifact(&mut self, region: RegionId, artifact: Artifact) -> Result<ArtifactId>;

    /// Remove one artifact; `None` when it was already gone.
    fn remove_artifact(&mut self, id: ArtifactId) -> Option<Artifact>;

    /// Artifacts of a region in drawing order.
    fn artifacts(&self, region: RegionId) -> Vec<ArtifactId>;

    fn artifact(&self, id: ArtifactId) -> Option<&Artifact>;

    /// Remove every artifact and label of a region, keeping the region itself.
    fn clear_region(&mut self, region: RegionId) -> Result<()>;

    fn set_axis_label(&mut self, region: RegionId, axis: Axis, text: &str) -> Result<()>;

    fn repaint(&mut self) -> Result<()>;

    fn draw_points(&mut self, region: RegionId, layer: PointLayer) -> Result<ArtifactId> {
        self.add_artifact(region, Artifact::Points(layer))
    }
}

/// Surfaces the layout composer can allocate on its own.
pub trait FreshSurface: DrawingSurface + Sized {
    fn with_figure_size(width: u32, height: u32) -> Self;
}

#[derive(Debug, Clone)]
struct RegionState {
    rect: PixelRect,
    artifacts: Vec<ArtifactId>,
    x_label: Option<String>,
    y_label: Option<String>,
}

/// Retained drawing surface.
#[derive(Debug, Clone)]
pub struct Scene {
    size: (u32, u32),
    regions: Vec<RegionState>,
    artifacts: BTreeMap<ArtifactId, (RegionId, Artifact)>,
    next_artifact: u64,
    repaints: usize,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            regions: Vec::new(),
            artifacts: BTreeMap::new(),
            next_artifact: 0,
            repaints: 0,
        }
    }

    /// How many times the surface was asked to repaint.
    pub fn repaint_count(&self) -> usize {
        self.repaints
    }

    pub fn axis_label(&self, region: RegionId, axis: Axis) -> Option<&str> {
        let r = self.regions.get(region.0)?;
        match axis {
            Axis::X => r.x_label.as_deref(),
            Axis::Y => r.y_label.as_deref(),
        }
    }

    /// Artifacts of a region with their ids, in drawing order.
    pub fn contents(&self, region: RegionId) -> Vec<(ArtifactId, &Artifact)> {
        self.artifacts(region)
            .into_iter()
            .filter_map(|id| self.artifacts.get(&id).map(|(_, a)| (id, a)))
            .collect()
    }

    pub fn point_layers(&self, region: RegionId) -> Vec<&PointLayer> {
        self.contents(region)
            .into_iter()
            .filter_map(|(_, a)| match a {
                Artifact::Points(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn color_bars(&self, region: RegionId) -> Vec<&ColorBar> {
        self.contents(region)
            .into_iter()
            .filter_map(|(_, a)| match a {
                Artifact::ColorBar(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn size_legends(&self, region: RegionId) -> Vec<&SizeLegend> {
        self.contents(region)
            .into_iter()
            .filter_map(|(_, a)| match a {
                Artifact::SizeLegend(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn overlays(&self, region: RegionId) -> Vec<&Overlay> {
        self.contents(region)
            .into_iter()
            .filter_map(|(_, a)| match a {
                Artifact::Overlay(o) => Some(o),
                _ => None,
            })
            .collect()
    }

    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    fn region_mut(&mut self, region: RegionId) -> Result<&mut RegionState> {
        self.regions
            .get_mut(region.0)
            .ok_or(ChartError::UnknownRegion(region.0))
    }
}

impl Default for Scene {
    /// A 10 x 8 inch figure at 100 dpi.
    fn default() -> Self {
        Scene::new(1000, 800)
    }
}

impl FreshSurface for Scene {
    fn with_figure_size(width: u32, height: u32) -> Self {
        Scene::new(width, height)
    }
}

impl DrawingSurface for Scene {
    fn figure_size(&self) -> (u32, u32) {
        self.size
    }

    fn add_region(&mut self, rect: PixelRect) -> RegionId {
        self.regions.push(RegionState {
            rect,
            artifacts: Vec::new(),
            x_label: None,
            y_label: None,
        });
        RegionId(self.regions.len() - 1)
    }

    fn regions(&self) -> Vec<RegionId> {
        (0..self.regions.len()).map(RegionId).collect()
    }

    fn region_rect(&self, region: RegionId) -> Option<PixelRect> {
        self.regions.get(region.0).map(|r| r.rect)
    }

    fn set_region_rect(&mut self, region: RegionId, rect: PixelRect) -> Result<()> {
        self.region_mut(region)?.rect = rect;
        Ok(())
    }

    fn add_artifact(&mut self, region: RegionId, artifact: Artifact) -> Result<ArtifactId> {
        let id = ArtifactId(self.next_artifact);
        self.region_mut(region)?.artifacts.push(id);
        self.next_artifact += 1;
        self.artifacts.insert(id, (region, artifact));
        Ok(id)
    }

    fn remove_artifact(&mut self, id: ArtifactId) -> Option<Artifact> {
        let (region, artifact) = self.artifacts.remove(&id)?;
        if let Some(r) = self.regions.get_mut(region.0) {
            r.artifacts.retain(|a| *a != id);
        }
        Some(artifact)
    }

    fn artifacts(&self, region: RegionId) -> Vec<ArtifactId> {
        self.regions
            .get(region.0)
            .map(|r| r.artifacts.clone())
            .unwrap_or_default()
    }

    fn artifact(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(&id).map(|(_, a)| a)
    }

    fn clear_region(&mut self, region: RegionId) -> Result<()> {
        let r = self.region_mut(region)?;
        let ids = std::mem::take(&mut r.artifacts);
        r.x_label = None;
        r.y_label = None;
        for id in ids {
            self.artifacts.remove(&id);
        }
        Ok(())
    }

    fn set_axis_label(&mut self, region: RegionId, axis: Axis, text: &str) -> Result<()> {
        let r = self.region_mut(region)?;
        match axis {
            Axis::X => r.x_label = Some(text.to_string()),
            Axis::Y => r.y_label = Some(text.to_string()),
        }
        Ok(())
    }

    fn repaint(&mut self) -> Result<()> {
        self.repaints += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay() -> Artifact {
        Artifact::Overlay(Overlay::Rect {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
            color: RGBColor(0, 0, 255),
        })
    }

    #[test]
    fn artifacts_are_tracked_per_region() {
        let mut scene = Scene::default();
        let a = scene.add_region(PixelRect::new(0, 0, 100, 100));
        let b = scene.add_region(PixelRect::new(100, 0, 50, 100));
        let id1 = scene.add_artifact(a, overlay()).unwrap();
        let id2 = scene.add_artifact(b, overlay()).unwrap();
        assert_eq!(scene.artifacts(a), vec![id1]);
        assert_eq!(scene.artifacts(b), vec![id2]);

        assert!(scene.remove_artifact(id1).is_some());
        assert!(scene.remove_artifact(id1).is_none());
        assert!(scene.artifacts(a).is_empty());
        assert_eq!(scene.artifact_count(), 1);
    }

    #[test]
    fn clear_keeps_region() {
        let mut scene = Scene::default();
        let a = scene.add_region(PixelRect::new(0, 0, 100, 100));
        scene.add_artifact(a, overlay()).unwrap();
        scene.set_axis_label(a, Axis::X, "weight").unwrap();
        scene.clear_region(a).unwrap();
        assert_eq!(scene.regions(), vec![a]);
        assert!(scene.artifacts(a).is_empty());
        assert_eq!(scene.axis_label(a, Axis::X), None);
    }

    #[test]
    fn unknown_region_is_an_error() {
        let mut scene = Scene::default();
        assert_eq!(
            scene.add_artifact(RegionId(3), overlay()),
            Err(ChartError::UnknownRegion(3))
        );
    }
}
