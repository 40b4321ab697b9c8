//! bubblechart
//!
//! A bubble chart with four data channels: horizontal position, vertical position,
//! marker area and color. Pairs with the `bubblechart` CLI.
//!
//! ### Features
//! - Size channel rescaled into a pixel-area range, color channel mapped through a named colormap
//! - Colorbar and discrete size legend, laid out in a two-column mosaic or carved from the plot
//! - Selection highlighting: unselected points fade to gray, selected points keep their colors
//! - A rectangular brush that drives the selection
//! - Rendering to SVG or PNG with plotters
//!
//! ### Example
//! ```
//! use bubblechart::{BubbleChart, ChartConfig, PointSet};
//!
//! let points = PointSet {
//!     x: vec![1.0, 2.0, 3.0, 4.0],
//!     y: vec![4.0, 1.0, 3.0, 2.0],
//!     size: vec![1.0, 2.0, 3.0, 4.0],
//!     color: vec![10.0, 20.0, 30.0, 40.0],
//! };
//! let mut chart = BubbleChart::new(ChartConfig::default())?.with_points(points)?;
//! assert_eq!(chart.scaled_sizes(), Some(&[50.0, 200.0, 350.0, 500.0][..]));
//!
//! chart.set_selection(&[1, 3])?;
//! chart.draw()?;
//! assert_eq!(chart.owned_artifacts().len(), 4);
//! # Ok::<(), bubblechart::ChartError>(())
//! ```

pub mod chart;
pub mod colormap;
pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod legend;
pub mod models;
pub mod scale;
pub mod storage;
pub mod surface;
pub mod viz;

pub use chart::{BubbleChart, ChartState, OwnedRole};
pub use colormap::Colormap;
pub use config::ChartConfig;
pub use error::{ChartError, Result};
pub use interaction::{Brush, DataRect, SelectionController, SelectionListener};
pub use layout::{Layout, Mosaic, RegionHints};
pub use legend::{LegendCollaborator, SizeScaleMode, StandardLegends};
pub use models::{Channel, PointSet};
pub use surface::{DrawingSurface, Scene};
pub use viz::PlottersSurface;
