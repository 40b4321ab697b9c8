//! Selection plumbing between input devices and the chart.
//!
//! Input devices (a brush, a lasso, a programmatic filter) only talk to a
//! [`SelectionListener`]. [`SelectionController`] is the listener that updates a chart's
//! selection and redraws it.

use log::debug;
use plotters::style::RGBColor;

use crate::chart::BubbleChart;
use crate::error::{ChartError, Result};
use crate::legend::LegendCollaborator;
use crate::surface::{Artifact, ArtifactId, DrawingSurface, Overlay};

/// Receives selection updates from an input device.
pub trait SelectionListener {
    fn on_selection_changed(&mut self, indices: &[usize]) -> Result<()>;
}

/// Forwards selection events into a chart and redraws it.
#[derive(Debug)]
pub struct SelectionController<'c, S: DrawingSurface, L: LegendCollaborator> {
    chart: &'c mut BubbleChart<S, L>,
}

impl<'c, S: DrawingSurface, L: LegendCollaborator> SelectionController<'c, S, L> {
    pub fn new(chart: &'c mut BubbleChart<S, L>) -> Self {
        Self { chart }
    }

    pub fn chart(&self) -> &BubbleChart<S, L> {
        &*self.chart
    }
}

impl<S: DrawingSurface, L: LegendCollaborator> SelectionListener for SelectionController<'_, S, L> {
    fn on_selection_changed(&mut self, indices: &[usize]) -> Result<()> {
        self.chart.set_selection(indices)?;
        self.chart.draw()
    }
}

/// Axis-aligned rectangle in data coordinates; corners may be given in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl DataRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (xl, xh) = (self.x0.min(self.x1), self.x0.max(self.x1));
        let (yl, yh) = (self.y0.min(self.y1), self.y0.max(self.y1));
        (xl..=xh).contains(&x) && (yl..=yh).contains(&y)
    }
}

/// Rectangular brush over a chart's main region.
///
/// The brush keeps its own copy of the point positions and draws its rectangle as an
/// overlay the chart does not own, so the rectangle survives the redraw it triggers.
#[derive(Debug, Clone)]
pub struct Brush {
    x: Vec<f64>,
    y: Vec<f64>,
    color: RGBColor,
    overlay: Option<ArtifactId>,
}

impl Brush {
    pub fn new(x: Vec<f64>, y: Vec<f64>, color: RGBColor) -> Self {
        Self {
            x,
            y,
            color,
            overlay: None,
        }
    }

    /// Indices of the points inside `rect`, ascending.
    pub fn hits(&self, rect: DataRect) -> Vec<usize> {
        self.x
            .iter()
            .zip(&self.y)
            .enumerate()
            .filter(|(_, (x, y))| rect.contains(**x, **y))
            .map(|(i, _)| i)
            .collect()
    }

    /// Show `rect` on the chart and select the points inside it.
    ///
    /// Fails with `InvalidSelection` when the brush holds more points than the chart,
    /// before anything is drawn. A failed redraw removes the new rectangle again.
    pub fn drag<S: DrawingSurface, L: LegendCollaborator>(
        &mut self,
        chart: &mut BubbleChart<S, L>,
        rect: DataRect,
    ) -> Result<Vec<usize>> {
        let hits = self.hits(rect);
        let len = chart.len();
        if let Some(&index) = hits.iter().find(|&&i| i >= len) {
            return Err(ChartError::InvalidSelection { index, len });
        }

        let main = chart.layout().main;
        let overlay = Overlay::Rect {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
            color: self.color,
        };
        let added = chart
            .surface_mut()
            .add_artifact(main, Artifact::Overlay(overlay))?;
        let previous = self.overlay.replace(added);
        if let Some(old) = previous {
            chart.surface_mut().remove_artifact(old);
        }

        debug!("brush selected {} of {} point(s)", hits.len(), self.x.len());
        if let Err(e) = SelectionController::new(chart).on_selection_changed(&hits) {
            chart.surface_mut().remove_artifact(added);
            self.overlay = None;
            return Err(e);
        }
        Ok(hits)
    }

    /// Remove the rectangle and return the chart to uniform rendering.
    pub fn release<S: DrawingSurface, L: LegendCollaborator>(
        &mut self,
        chart: &mut BubbleChart<S, L>,
    ) -> Result<()> {
        if let Some(old) = self.overlay.take() {
            chart.surface_mut().remove_artifact(old);
        }
        SelectionController::new(chart).on_selection_changed(&[])
    }

    pub fn overlay(&self) -> Option<ArtifactId> {
        self.overlay
    }
}
