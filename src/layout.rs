//! Resolving the three chart regions: main plot, color legend and size legend.
//!
//! Resolution order in [`compose`]:
//! 1. a main region was supplied: use it (and any supplied legend regions) verbatim;
//! 2. the surface already has regions: the first one becomes the main region;
//! 3. otherwise a fresh two-column mosaic is laid out on the surface.
//!
//! Rule 2 is a convenience for "draw into whatever is already there" and guesses when
//! the surface holds several unrelated regions. Pass the main region explicitly instead.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::surface::{DrawingSurface, FreshSurface, PixelRect, RegionId};

/// Fraction of the main region's width a carved colorbar takes.
const COLORBAR_FRACTION: f64 = 0.15;
/// Gap between the main region and a carved colorbar, as a fraction of the main width.
const COLORBAR_PAD: f64 = 0.05;

/// Two-column, two-row grid: main plot on the left spanning both rows, size legend
/// top-right and color legend bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mosaic {
    /// Relative widths of the (main, legend) columns.
    pub width_ratios: [f64; 2],
    /// Relative heights of the (size, color) rows of the legend column.
    pub height_ratios: [f64; 2],
    /// Gap between the columns, as a fraction of the figure width.
    pub wspace: f64,
    /// Gap between the legend rows, as a fraction of the figure height.
    pub hspace: f64,
}

impl Default for Mosaic {
    fn default() -> Self {
        Self {
            width_ratios: [0.85, 0.12],
            height_ratios: [0.4, 0.6],
            wspace: 0.03,
            hspace: 0.02,
        }
    }
}

impl Mosaic {
    pub fn validate(&self) -> Result<()> {
        let ratios = self.width_ratios.iter().chain(self.height_ratios.iter());
        if ratios.into_iter().any(|r| !(r.is_finite() && *r > 0.0)) {
            return Err(ChartError::InvalidConfig(
                "mosaic ratios must be positive and finite".into(),
            ));
        }
        for (name, gap) in [("wspace", self.wspace), ("hspace", self.hspace)] {
            if !(0.0..0.5).contains(&gap) {
                return Err(ChartError::InvalidConfig(format!(
                    "mosaic {name} must be in [0, 0.5), got {gap}"
                )));
            }
        }
        Ok(())
    }

    /// Pixel rectangles of (main, size, color) inside `area`.
    pub fn split(&self, area: PixelRect) -> (PixelRect, PixelRect, PixelRect) {
        let w = f64::from(area.w);
        let h = f64::from(area.h);
        let col_gap = (w * self.wspace).round();
        let row_gap = (h * self.hspace).round();

        let [wl, wr] = self.width_ratios;
        let main_w = ((w - col_gap) * wl / (wl + wr)).round();
        let side_w = (w - col_gap - main_w).max(0.0);
        let side_x = area.x + (main_w + col_gap) as i32;

        let [ht, hb] = self.height_ratios;
        let size_h = ((h - row_gap) * ht / (ht + hb)).round();
        let color_h = (h - row_gap - size_h).max(0.0);

        let main = PixelRect::new(area.x, area.y, main_w as u32, area.h);
        let size = PixelRect::new(side_x, area.y, side_w as u32, size_h as u32);
        let color = PixelRect::new(
            side_x,
            area.y + (size_h + row_gap) as i32,
            side_w as u32,
            color_h as u32,
        );
        (main, size, color)
    }
}

/// Regions a chart draws into. The surface owns them; the chart only holds handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub main: RegionId,
    pub color: Option<RegionId>,
    pub size: Option<RegionId>,
}

/// Regions the caller already has on an existing surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionHints {
    pub main: Option<RegionId>,
    pub color: Option<RegionId>,
    pub size: Option<RegionId>,
}

/// Resolve a layout on an existing surface.
pub fn compose<S: DrawingSurface>(
    surface: &mut S,
    hints: RegionHints,
    mosaic: &Mosaic,
) -> Result<Layout> {
    for region in [hints.main, hints.color, hints.size].into_iter().flatten() {
        if surface.region_rect(region).is_none() {
            return Err(ChartError::UnknownRegion(region.index()));
        }
    }

    if let Some(main) = hints.main {
        return Ok(Layout {
            main,
            color: hints.color,
            size: hints.size,
        });
    }

    if let Some(&first) = surface.regions().first() {
        warn!("no main region given, drawing into the surface's first region {first}");
        return Ok(Layout {
            main: first,
            color: hints.color,
            size: hints.size,
        });
    }

    mosaic.validate()?;
    let (w, h) = surface.figure_size();
    Ok(lay_out_mosaic(surface, mosaic, PixelRect::new(0, 0, w, h)))
}

/// Allocate a new surface and lay the mosaic out on it.
pub fn compose_fresh<S: FreshSurface>(figure_size: (u32, u32), mosaic: &Mosaic) -> Result<(S, Layout)> {
    mosaic.validate()?;
    let mut surface = S::with_figure_size(figure_size.0, figure_size.1);
    let layout = lay_out_mosaic(
        &mut surface,
        mosaic,
        PixelRect::new(0, 0, figure_size.0, figure_size.1),
    );
    Ok((surface, layout))
}

fn lay_out_mosaic<S: DrawingSurface>(surface: &mut S, mosaic: &Mosaic, area: PixelRect) -> Layout {
    let (main, size, color) = mosaic.split(area);
    let main = surface.add_region(main);
    let size = surface.add_region(size);
    let color = surface.add_region(color);
    Layout {
        main,
        color: Some(color),
        size: Some(size),
    }
}

/// Shrink `main` and add a colorbar region along its right edge.
pub fn carve_color_region<S: DrawingSurface>(surface: &mut S, main: RegionId) -> Result<RegionId> {
    let rect = surface
        .region_rect(main)
        .ok_or(ChartError::UnknownRegion(main.index()))?;
    let w = f64::from(rect.w);
    let bar_w = (w * COLORBAR_FRACTION).round();
    let pad = (w * COLORBAR_PAD).round();
    let main_w = (w - bar_w - pad).max(0.0);

    surface.set_region_rect(main, PixelRect::new(rect.x, rect.y, main_w as u32, rect.h))?;
    let bar = PixelRect::new(
        rect.x + (main_w + pad) as i32,
        rect.y,
        bar_w as u32,
        rect.h,
    );
    Ok(surface.add_region(bar))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Scene;

    #[test]
    fn default_split_proportions() {
        let (main, size, color) = Mosaic::default().split(PixelRect::new(0, 0, 1000, 800));
        // 970 usable px split 0.85 : 0.12
        assert_eq!(main, PixelRect::new(0, 0, 850, 800));
        assert_eq!(size.x, 880);
        assert_eq!(size.w, 120);
        assert_eq!(size.y, 0);
        assert_eq!(color.y, size.h as i32 + 16);
        assert_eq!(size.h + color.h + 16, 800);
        assert!(color.h > size.h);
    }

    #[test]
    fn bad_ratios_rejected() {
        let m = Mosaic {
            width_ratios: [0.0, 1.0],
            ..Mosaic::default()
        };
        assert!(m.validate().is_err());
        let m = Mosaic {
            wspace: 0.7,
            ..Mosaic::default()
        };
        assert!(m.validate().is_err());
    }

    #[test]
    fn carving_shrinks_main() {
        let mut scene = Scene::new(400, 300);
        let main = scene.add_region(PixelRect::new(0, 0, 400, 300));
        let bar = carve_color_region(&mut scene, main).unwrap();
        let m = scene.region_rect(main).unwrap();
        let b = scene.region_rect(bar).unwrap();
        assert_eq!(m.w, 320);
        assert_eq!(b, PixelRect::new(340, 0, 60, 300));
    }
}
