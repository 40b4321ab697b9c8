use bubblechart::interaction::{Brush, DataRect, SelectionController, SelectionListener};
use bubblechart::surface::Overlay;
use bubblechart::{BubbleChart, ChartConfig, ChartError, ChartState, PointSet};
use plotters::style::RGBColor;

const RED: RGBColor = RGBColor(255, 0, 0);

fn grid() -> PointSet {
    PointSet {
        x: vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
        y: vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        size: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        color: vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
    }
}

fn chart() -> BubbleChart {
    BubbleChart::new(ChartConfig::default())
        .unwrap()
        .with_points(grid())
        .unwrap()
}

#[test]
fn drag_selects_and_redraws() {
    let mut chart = chart();
    let points = grid();
    let mut brush = Brush::new(points.x, points.y, RED);

    let hits = brush
        .drag(&mut chart, DataRect::new(0.5, -0.5, 2.5, 0.5))
        .unwrap();
    assert_eq!(hits, vec![1, 2]);
    assert_eq!(chart.selection(), vec![1, 2]);
    assert_eq!(chart.state(), ChartState::Rendered);

    let main = chart.layout().main;
    let layers = chart.surface().point_layers(main);
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1].indices, vec![1, 2]);

    let overlays = chart.surface().overlays(main);
    assert_eq!(overlays.len(), 1);
    assert!(matches!(overlays[0], Overlay::Rect { color, .. } if *color == RED));
}

#[test]
fn dragging_again_replaces_the_rectangle() {
    let mut chart = chart();
    let points = grid();
    let mut brush = Brush::new(points.x, points.y, RED);
    brush.drag(&mut chart, DataRect::new(0.0, 0.0, 0.1, 0.1)).unwrap();
    let first = brush.overlay();
    brush.drag(&mut chart, DataRect::new(-1.0, -1.0, 3.0, 3.0)).unwrap();

    assert_ne!(brush.overlay(), first);
    assert_eq!(chart.surface().overlays(chart.layout().main).len(), 1);
    assert_eq!(chart.selection(), vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn empty_drag_returns_to_uniform_rendering() {
    let mut chart = chart();
    let points = grid();
    let mut brush = Brush::new(points.x, points.y, RED);
    brush.drag(&mut chart, DataRect::new(0.0, 0.0, 0.1, 0.1)).unwrap();
    let hits = brush.drag(&mut chart, DataRect::new(10.0, 10.0, 11.0, 11.0)).unwrap();
    assert!(hits.is_empty());
    assert_eq!(chart.surface().point_layers(chart.layout().main).len(), 1);
}

#[test]
fn release_clears_selection_and_rectangle() {
    let mut chart = chart();
    let points = grid();
    let mut brush = Brush::new(points.x, points.y, RED);
    brush.drag(&mut chart, DataRect::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    brush.release(&mut chart).unwrap();

    let main = chart.layout().main;
    assert!(brush.overlay().is_none());
    assert!(chart.surface().overlays(main).is_empty());
    assert!(chart.selection().is_empty());
    assert_eq!(chart.surface().point_layers(main).len(), 1);
}

#[test]
fn controller_rejects_out_of_range_indices() {
    let mut chart = chart();
    chart.draw().unwrap();
    let repaints = chart.surface().repaint_count();

    let mut controller = SelectionController::new(&mut chart);
    let err = controller.on_selection_changed(&[0, 6]).unwrap_err();
    assert_eq!(err, ChartError::InvalidSelection { index: 6, len: 6 });
    assert!(controller.chart().selection().is_empty());
    assert_eq!(chart.surface().repaint_count(), repaints);
}

#[test]
fn stale_brush_leaves_no_rectangle_behind() {
    let mut chart = chart();
    let mut brush = Brush::new(
        vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 1.5, 1.6],
        vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.5, 0.6],
        RED,
    );
    brush.drag(&mut chart, DataRect::new(-0.5, -0.5, 0.5, 0.5)).unwrap();
    let kept = brush.overlay();

    let err = brush
        .drag(&mut chart, DataRect::new(-1.0, -1.0, 3.0, 3.0))
        .unwrap_err();
    assert_eq!(err, ChartError::InvalidSelection { index: 6, len: 6 });

    let main = chart.layout().main;
    assert_eq!(chart.surface().overlays(main).len(), 1);
    assert_eq!(brush.overlay(), kept);
    assert_eq!(chart.selection(), vec![0]);
}
