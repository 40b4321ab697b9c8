use bubblechart::interaction::{Brush, DataRect};
use bubblechart::surface::PixelRect;
use bubblechart::viz::render_to_file;
use bubblechart::{BubbleChart, ChartConfig, DrawingSurface, PlottersSurface, PointSet, RegionHints};
use plotters::style::RGBColor;
use tempfile::tempdir;

fn cars() -> PointSet {
    PointSet {
        x: vec![4.1, 6.0, 5.2, 7.9, 3.3],
        y: vec![400.0, 310.0, 450.0, 280.0, 520.0],
        size: vec![5.0, 4.0, 5.0, 7.0, 2.0],
        color: vec![50000.0, 32000.0, 41000.0, 38000.0, 99000.0],
    }
}

#[test]
fn chart_renders_svg_on_draw() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("cars.svg");
    let config = ChartConfig {
        x_name: "Acceleration".into(),
        y_name: "Range".into(),
        size_name: "Seats".into(),
        color_name: "Price".into(),
        ..ChartConfig::default()
    };
    let (w, h) = config.figure_size;
    let surface = PlottersSurface::new(&out, w, h);
    let mut chart = BubbleChart::on_surface(config, surface, RegionHints::default())
        .unwrap()
        .with_points(cars())
        .unwrap();
    chart.draw().unwrap();

    let svg = std::fs::read_to_string(&out).unwrap();
    assert!(!svg.is_empty());
    for label in ["Acceleration", "Range", "Seats", "Price"] {
        assert!(svg.contains(label), "missing {label}");
    }
    assert!(svg.matches("<circle").count() >= 5 * 2);
}

#[test]
fn brushed_chart_renders_overlay() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("brushed.svg");
    let surface = PlottersSurface::new(&out, 640, 480);
    let points = cars();
    let mut brush = Brush::new(points.x.clone(), points.y.clone(), RGBColor(255, 0, 0));
    let mut chart = BubbleChart::on_surface(ChartConfig::default(), surface, RegionHints::default())
        .unwrap()
        .with_points(points)
        .unwrap();
    chart.draw().unwrap();
    let before = std::fs::read_to_string(&out).unwrap();

    let hits = brush
        .drag(&mut chart, DataRect::new(3.0, 300.0, 5.5, 600.0))
        .unwrap();
    assert_eq!(hits, vec![0, 2, 4]);
    let after = std::fs::read_to_string(&out).unwrap();
    assert_ne!(before, after);
    assert!(after.contains("<rect"));
}

#[test]
fn render_scene_directly() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("scene.svg");
    let mut chart = BubbleChart::new(ChartConfig::default())
        .unwrap()
        .with_points(cars())
        .unwrap();
    chart.draw().unwrap();
    render_to_file(chart.surface(), &out).unwrap();
    let meta = std::fs::metadata(&out).unwrap();
    assert!(meta.len() > 0);
}

#[test]
fn huge_marker_sizes_render_without_overflow() {
    let dir = tempdir().unwrap();
    let config = ChartConfig::from_json_str(r#"{ "max_size": 1e20 }"#).unwrap();

    let mosaic_out = dir.path().join("huge_mosaic.svg");
    let surface = PlottersSurface::new(&mosaic_out, 640, 480);
    let mut chart = BubbleChart::on_surface(config.clone(), surface, RegionHints::default())
        .unwrap()
        .with_points(cars())
        .unwrap();
    chart.draw().unwrap();
    assert!(std::fs::read_to_string(&mosaic_out).unwrap().contains("<circle"));

    // Single region: the size legend is drawn inset in the plot.
    let inset_out = dir.path().join("huge_inset.svg");
    let mut surface = PlottersSurface::new(&inset_out, 640, 480);
    let main = surface.add_region(PixelRect::new(0, 0, 640, 480));
    let hints = RegionHints {
        main: Some(main),
        ..RegionHints::default()
    };
    let mut chart = BubbleChart::on_surface(config, surface, hints)
        .unwrap()
        .with_points(cars())
        .unwrap();
    chart.draw().unwrap();
    assert!(std::fs::read_to_string(&inset_out).unwrap().contains("<circle"));
}
