//! Rendering a [`Scene`] to **SVG** or **PNG** with plotters.
//!
//! - [`PlottersSurface`] is a drawing surface that renders itself to a file on every repaint
//! - [`render_to_file`] picks the backend from the file extension (`.svg`, anything else is bitmap)
//! - Point layers become circles sized by area, filled and outlined as the layer says
//! - Overlays (brush rectangles) are drawn in data coordinates on top of the points

pub mod legend;
pub mod text;
pub mod util;

use anyhow::Result;
use log::debug;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontStyle, FontTransform};
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::error::ChartError;
use crate::surface::{
    Artifact, ArtifactId, Axis, DrawingSurface, Overlay, PixelRect, PointLayer, RegionId, Scene,
};

use legend::{draw_color_bar, draw_size_legend};
use util::{format_tick, marker_radius_px, padded_range, ticks};

/// Fraction of the data span left free around the points.
const AXIS_PAD: f64 = 0.05;
const TICK_COUNT: usize = 5;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts. SVG output does not need it.
static INIT_FONTS: Once = Once::new();

/// Checked in order; `BUBBLECHART_FONT` overrides them.
const FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let env_path = std::env::var("BUBBLECHART_FONT").ok();
        let candidates = env_path.iter().map(String::as_str).chain(FONT_CANDIDATES);
        for path in candidates {
            if let Ok(bytes) = std::fs::read(path) {
                // Leaked at most once per candidate, inside the Once.
                let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
                if plotters::style::register_font(
                    "sans-serif",
                    plotters::style::FontStyle::Normal,
                    bytes,
                )
                .is_ok()
                {
                    debug!("registered sans-serif font from {path}");
                    return;
                }
            }
        }
        debug!("no sans-serif font found, bitmap text will not render");
    });
}

/// A [`Scene`] that renders itself to `out_path` whenever it is repainted.
#[derive(Debug, Clone)]
pub struct PlottersSurface {
    scene: Scene,
    out_path: PathBuf,
}

impl PlottersSurface {
    pub fn new<P: Into<PathBuf>>(out_path: P, width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(width, height),
            out_path: out_path.into(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }
}

impl DrawingSurface for PlottersSurface {
    fn figure_size(&self) -> (u32, u32) {
        self.scene.figure_size()
    }

    fn add_region(&mut self, rect: PixelRect) -> RegionId {
        self.scene.add_region(rect)
    }

    fn regions(&self) -> Vec<RegionId> {
        self.scene.regions()
    }

    fn region_rect(&self, region: RegionId) -> Option<PixelRect> {
        self.scene.region_rect(region)
    }

    fn set_region_rect(&mut self, region: RegionId, rect: PixelRect) -> crate::error::Result<()> {
        self.scene.set_region_rect(region, rect)
    }

    fn add_artifact(&mut self, region: RegionId, artifact: Artifact) -> crate::error::Result<ArtifactId> {
        self.scene.add_artifact(region, artifact)
    }

    fn remove_artifact(&mut self, id: ArtifactId) -> Option<Artifact> {
        self.scene.remove_artifact(id)
    }

    fn artifacts(&self, region: RegionId) -> Vec<ArtifactId> {
        self.scene.artifacts(region)
    }

    fn artifact(&self, id: ArtifactId) -> Option<&Artifact> {
        self.scene.artifact(id)
    }

    fn clear_region(&mut self, region: RegionId) -> crate::error::Result<()> {
        self.scene.clear_region(region)
    }

    fn set_axis_label(&mut self, region: RegionId, axis: Axis, text: &str) -> crate::error::Result<()> {
        self.scene.set_axis_label(region, axis, text)
    }

    fn repaint(&mut self) -> crate::error::Result<()> {
        self.scene.repaint()?;
        render_to_file(&self.scene, &self.out_path).map_err(|e| ChartError::Surface(format!("{e:#}")))
    }
}

/// Render `scene` to an SVG (by extension) or bitmap file.
pub fn render_to_file<P: AsRef<Path>>(scene: &Scene, out_path: P) -> Result<()> {
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let (width, height) = scene.figure_size();
    debug!("rendering {}x{} scene to {}", width, height, out_path.display());

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, (width, height)).into_drawing_area();
        render_scene(&root, scene)
    } else {
        let root = BitMapBackend::new(out_path, (width, height)).into_drawing_area();
        render_scene(&root, scene)
    }
}

/// Draw every region of `scene` onto `root`.
pub fn render_scene<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, scene: &Scene) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow::anyhow!("{:?}", e))?;
    for region in scene.regions() {
        let Some(rect) = scene.region_rect(region) else {
            continue;
        };
        if rect.w == 0 || rect.h == 0 {
            continue;
        }
        let area = root.clone().shrink((rect.x, rect.y), (rect.w as i32, rect.h as i32));
        draw_region(&area, scene, region)?;
    }
    root.present().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_region<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    region: RegionId,
) -> Result<()> {
    let contents = scene.contents(region);
    let is_plot = contents
        .iter()
        .any(|(_, a)| matches!(a, Artifact::Points(_) | Artifact::Overlay(_)))
        || scene.axis_label(region, Axis::X).is_some();

    if is_plot {
        draw_plot(area, scene, region)?;
    }
    for (_, artifact) in &contents {
        match artifact {
            Artifact::ColorBar(bar) => draw_color_bar(area, bar)?,
            Artifact::SizeLegend(l) => draw_size_legend(area, l)?,
            Artifact::Points(_) | Artifact::Overlay(_) => {}
        }
    }
    Ok(())
}

/// Axes, point layers and overlays of a plot region, in drawing order.
fn draw_plot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scene: &Scene,
    region: RegionId,
) -> Result<()> {
    const MARGIN: i32 = 12;
    const LEFT_LABEL_AREA: i32 = 56;
    const BOTTOM_LABEL_AREA: i32 = 44;

    let layers: Vec<&PointLayer> = scene.point_layers(region);
    let xs: Vec<f64> = layers.iter().flat_map(|l| l.x.iter().copied()).collect();
    let ys: Vec<f64> = layers.iter().flat_map(|l| l.y.iter().copied()).collect();
    let (x_min, x_max) = padded_range(&xs, AXIS_PAD);
    let (y_min, y_max) = padded_range(&ys, AXIS_PAD);

    let mut chart = ChartBuilder::on(area)
        .margin(MARGIN)
        .set_label_area_size(LabelAreaPosition::Left, LEFT_LABEL_AREA)
        .set_label_area_size(LabelAreaPosition::Bottom, BOTTOM_LABEL_AREA)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(x_min, y_min), (x_max, y_max)],
            BLACK.stroke_width(1),
        )))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    // Tick marks and labels, positioned in area pixels.
    let base = area.get_base_pixel();
    let to_area = |c: (i32, i32)| (c.0 - base.0, c.1 - base.1);
    let x_tick_style =
        TextStyle::from((FontFamily::SansSerif, 12)).pos(Pos::new(HPos::Center, VPos::Top));
    let y_tick_style =
        TextStyle::from((FontFamily::SansSerif, 12)).pos(Pos::new(HPos::Right, VPos::Center));
    for v in ticks(x_min, x_max, TICK_COUNT) {
        let (px, py) = to_area(chart.backend_coord(&(v, y_min)));
        area.draw(&PathElement::new(vec![(px, py), (px, py + 4)], BLACK.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Text::new(format_tick(v), (px, py + 6), x_tick_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    for v in ticks(y_min, y_max, TICK_COUNT) {
        let (px, py) = to_area(chart.backend_coord(&(x_min, v)));
        area.draw(&PathElement::new(vec![(px - 4, py), (px, py)], BLACK.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Text::new(format_tick(v), (px - 6, py), y_tick_style.clone()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    // Axis titles, bold like the classic bubble chart.
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    if let Some(label) = scene.axis_label(region, Axis::X) {
        let style = TextStyle::from(
            (FontFamily::SansSerif, 16)
                .into_font()
                .style(FontStyle::Bold),
        )
        .pos(Pos::new(HPos::Center, VPos::Bottom));
        let cx = (LEFT_LABEL_AREA + MARGIN + w) / 2;
        area.draw(&Text::new(label, (cx, h - 2), style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    if let Some(label) = scene.axis_label(region, Axis::Y) {
        let style = TextStyle::from(
            (FontFamily::SansSerif, 16)
                .into_font()
                .style(FontStyle::Bold)
                .transform(FontTransform::Rotate270),
        )
        .pos(Pos::new(HPos::Center, VPos::Top));
        let cy = (h - BOTTOM_LABEL_AREA - MARGIN).max(0) / 2;
        area.draw(&Text::new(label, (2, cy), style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    for (_, artifact) in scene.contents(region) {
        match artifact {
            Artifact::Points(layer) => {
                let colors = layer.colors();
                let outline = layer.outline;
                chart
                    .draw_series(layer.x.iter().zip(&layer.y).zip(&layer.sizes).zip(colors).map(
                        |(((x, y), s), fill)| {
                            let r = marker_radius_px(*s);
                            EmptyElement::at((*x, *y))
                                + Circle::new((0, 0), r, fill.filled())
                                + Circle::new((0, 0), r, outline.stroke_width(1))
                        },
                    ))
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
            Artifact::Overlay(Overlay::Rect {
                x0,
                y0,
                x1,
                y1,
                color,
            }) => {
                chart
                    .draw_series([
                        Rectangle::new([(*x0, *y0), (*x1, *y1)], color.mix(0.15).filled()),
                        Rectangle::new([(*x0, *y0), (*x1, *y1)], color.stroke_width(1)),
                    ])
                    .map_err(|e| anyhow::anyhow!("{:?}", e))?;
            }
            Artifact::ColorBar(_) | Artifact::SizeLegend(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{PointFill, SizeLegend, SizeStop, Anchor};
    use tempfile::tempdir;

    #[test]
    fn plotters_surface_writes_svg_on_repaint() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scene.svg");
        let mut surface = PlottersSurface::new(&path, 400, 300);
        let main = surface.add_region(PixelRect::new(0, 0, 300, 300));
        surface
            .draw_points(
                main,
                PointLayer {
                    indices: vec![0, 1],
                    x: vec![0.0, 1.0],
                    y: vec![1.0, 0.0],
                    sizes: vec![50.0, 400.0],
                    fill: PointFill::Uniform(RGBColor(200, 0, 0)),
                    outline: BLACK,
                },
            )
            .unwrap();
        surface
            .add_artifact(
                main,
                Artifact::SizeLegend(SizeLegend {
                    title: "size".into(),
                    stops: vec![SizeStop { value: 1.0, size: 50.0 }],
                    facecolor: RGBColor(0, 128, 0),
                    anchor: Anchor::UpperRight,
                    inset: true,
                    spacing: 1.5,
                }),
            )
            .unwrap();
        surface.set_axis_label(main, Axis::X, "weight").unwrap();
        surface.repaint().unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("weight"));
        assert!(svg.contains("<circle"));
    }
}
