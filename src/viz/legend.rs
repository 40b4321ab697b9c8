//! Drawing colorbars and size legends with plotters.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontTransform};
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::{estimate_text_width_px, truncate_to_width};
use super::util::{format_tick, marker_radius_px};
use crate::surface::{Anchor, ColorBar, SizeLegend};

/// Number of color slices the gradient of a colorbar is drawn with.
const GRADIENT_STEPS: i32 = 64;

/// Vertical colorbar filling `area`: gradient on the left, tick labels to its right,
/// rotated label along the right edge.
pub fn draw_color_bar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, bar: &ColorBar) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let font_px: u32 = 12;
    let pad: i32 = 10;

    let bar_w = (w / 3).clamp(8, 24);
    let top = pad;
    let bottom = (h - pad).max(top + 1);
    let span = bottom - top;

    for step in 0..GRADIENT_STEPS {
        let y0 = bottom - span * step / GRADIENT_STEPS;
        let y1 = bottom - span * (step + 1) / GRADIENT_STEPS;
        let t = (f64::from(step) + 0.5) / f64::from(GRADIENT_STEPS);
        area.draw(&Rectangle::new(
            [(pad, y1), (pad + bar_w, y0)],
            bar.colormap.sample(t).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    area.draw(&Rectangle::new(
        [(pad, top), (pad + bar_w, bottom)],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let tick_style =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));
    for v in &bar.ticks {
        let y = bottom - (f64::from(span) * bar.range.normalize(*v)).round() as i32;
        area.draw(&PathElement::new(
            vec![(pad + bar_w, y), (pad + bar_w + 4, y)],
            BLACK.stroke_width(1),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            format_tick(*v),
            (pad + bar_w + 6, y),
            tick_style.clone(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    if !bar.label.is_empty() {
        let label_style = TextStyle::from(
            (FontFamily::SansSerif, 14)
                .into_font()
                .transform(FontTransform::Rotate270),
        )
        .pos(Pos::new(HPos::Center, VPos::Bottom));
        let label = truncate_to_width(&bar.label, 14, span.max(0) as u32);
        area.draw(&Text::new(label, (w - 2, top + span / 2), label_style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }
    Ok(())
}

/// Discrete size legend: title, then one marker per stop with its value.
/// Anchored to a corner of `area`; an inset legend gets a translucent backdrop.
pub fn draw_size_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    legend: &SizeLegend,
) -> Result<()> {
    if legend.stops.is_empty() {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let font_px: u32 = 12;
    let title_font_px: u32 = 14;
    let pad: i32 = 8;
    let gap: i32 = 8;

    let radii: Vec<i32> = legend.stops.iter().map(|s| marker_radius_px(s.size)).collect();
    let max_r = radii.iter().copied().max().unwrap_or(1);
    let labels: Vec<String> = legend.stops.iter().map(|s| format_tick(s.value)).collect();
    let label_w = labels
        .iter()
        .map(|l| estimate_text_width_px(l, font_px) as i32)
        .max()
        .unwrap_or(0);

    let row_h: Vec<i32> = radii
        .iter()
        .map(|r| ((f64::from(*r) * 2.0 * legend.spacing).round() as i32).max(font_px as i32 + 4))
        .collect();
    let title_h = if legend.title.is_empty() {
        0
    } else {
        title_font_px as i32 + gap
    };
    let title_w = estimate_text_width_px(&legend.title, title_font_px) as i32;
    let block_w = max_r
        .saturating_mul(2)
        .saturating_add(gap + label_w)
        .max(title_w)
        .saturating_add(2 * pad);
    let block_h = row_h
        .iter()
        .fold(title_h + 2 * pad, |acc, h| acc.saturating_add(*h));

    let x0 = match legend.anchor {
        Anchor::UpperLeft | Anchor::LowerLeft => pad,
        Anchor::UpperRight | Anchor::LowerRight => w.saturating_sub(block_w).saturating_sub(pad).max(0),
    };
    let y0 = match legend.anchor {
        Anchor::UpperLeft | Anchor::UpperRight => pad,
        Anchor::LowerLeft | Anchor::LowerRight => h.saturating_sub(block_h).saturating_sub(pad).max(0),
    };

    if legend.inset {
        area.draw(&Rectangle::new(
            [(x0, y0), (x0.saturating_add(block_w), y0.saturating_add(block_h))],
            WHITE.mix(0.85).filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Rectangle::new(
            [(x0, y0), (x0.saturating_add(block_w), y0.saturating_add(block_h))],
            BLACK.mix(0.4).stroke_width(1),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    }

    let mut y = y0 + pad;
    if !legend.title.is_empty() {
        let title_style = TextStyle::from((FontFamily::SansSerif, title_font_px).into_font())
            .pos(Pos::new(HPos::Left, VPos::Top));
        area.draw(&Text::new(legend.title.clone(), (x0 + pad, y), title_style))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y += title_h;
    }

    let label_style =
        TextStyle::from((FontFamily::SansSerif, font_px)).pos(Pos::new(HPos::Left, VPos::Center));
    let marker_cx = x0 + pad + max_r;
    for ((label, r), rh) in labels.iter().zip(&radii).zip(&row_h) {
        let cy = y.saturating_add(rh / 2);
        area.draw(&Circle::new((marker_cx, cy), *r, legend.facecolor.filled()))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Circle::new((marker_cx, cy), *r, BLACK.stroke_width(1)))
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            label.clone(),
            (marker_cx + max_r + gap, cy),
            label_style.clone(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        y = y.saturating_add(*rh);
    }
    Ok(())
}
