use anyhow::{Result, bail};
use bubblechart::interaction::{Brush, DataRect};
use bubblechart::storage::{self, ColumnMap};
use bubblechart::{BubbleChart, ChartConfig, Colormap, PlottersSurface, PointSet, RegionHints};
use clap::Parser;
use plotters::style::RGBColor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Brush outline color.
const BRUSH_COLOR: RGBColor = RGBColor(220, 40, 40);

#[derive(Parser, Debug)]
#[command(
    name = "bubblechart",
    version,
    about = "Draw a bubble chart (x, y, size, color) to SVG or PNG, optionally brushing a selection"
)]
struct Cli {
    /// Number of random points when no --input is given.
    #[arg(short, long, default_value_t = 100)]
    number: usize,
    /// Seed for the random points.
    #[arg(long)]
    seed: Option<u64>,
    /// Read points from a CSV (by column name) or JSON file instead.
    #[arg(long)]
    input: Option<PathBuf>,
    /// CSV column for the horizontal position.
    #[arg(short = 'x', long, default_value = "x")]
    x_col: String,
    /// CSV column for the vertical position.
    #[arg(short = 'y', long, default_value = "y")]
    y_col: String,
    /// CSV column for the marker size.
    #[arg(short = 's', long, default_value = "size")]
    size_col: String,
    /// CSV column for the color.
    #[arg(short = 'c', long, default_value = "color")]
    color_col: String,
    /// Chart configuration (JSON). Flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Colormap: viridis, bone, copper or gray.
    #[arg(long)]
    colormap: Option<Colormap>,
    /// Figure width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Figure height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Select the points inside a data rectangle: x0,y0,x1,y1
    #[arg(long)]
    brush: Option<String>,
    /// Output image (.svg or .png).
    #[arg(long, default_value = "bubble_chart.svg")]
    out: PathBuf,
}

fn parse_rect(s: &str) -> Result<DataRect> {
    let v: Vec<f64> = s
        .split([',', ';'])
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| anyhow::anyhow!("invalid --brush `{s}`: {e}"))?;
    let [x0, y0, x1, y1] = v[..] else {
        bail!("invalid --brush `{s}`, expected x0,y0,x1,y1");
    };
    Ok(DataRect::new(x0, y0, x1, y1))
}

fn random_points(n: usize, seed: Option<u64>) -> PointSet {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut draw = |n: usize| -> Vec<f64> { (0..n).map(|_| rng.r#gen::<f64>()).collect() };
    PointSet {
        x: draw(n),
        y: draw(n),
        size: draw(n),
        color: draw(n),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(colormap) = cli.colormap {
        config.colormap = colormap;
    }
    if let Some(w) = cli.width {
        config.figure_size.0 = w;
    }
    if let Some(h) = cli.height {
        config.figure_size.1 = h;
    }

    let points = match &cli.input {
        Some(path) => {
            let columns = ColumnMap {
                x: cli.x_col.clone(),
                y: cli.y_col.clone(),
                size: cli.size_col.clone(),
                color: cli.color_col.clone(),
            };
            if cli.config.is_none() {
                config.x_name = columns.x.clone();
                config.y_name = columns.y.clone();
                config.size_name = columns.size.clone();
                config.color_name = columns.color.clone();
            }
            storage::load(path, &columns)?
        }
        None => random_points(cli.number, cli.seed),
    };
    let n = points.len()?;

    let (w, h) = config.figure_size;
    let surface = PlottersSurface::new(&cli.out, w, h);
    let mut chart = BubbleChart::on_surface(config, surface, RegionHints::default())?;
    let (bx, by) = (points.x.clone(), points.y.clone());
    chart.set_points(points)?;
    chart.draw()?;

    if let Some(raw) = &cli.brush {
        let rect = parse_rect(raw)?;
        let mut brush = Brush::new(bx, by, BRUSH_COLOR);
        let hits = brush.drag(&mut chart, rect)?;
        eprintln!("Brushed {} of {} point(s)", hits.len(), n);
    }

    eprintln!("Wrote chart of {} point(s) to {}", n, cli.out.display());
    Ok(())
}
