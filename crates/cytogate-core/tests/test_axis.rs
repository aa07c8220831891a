use approx::assert_abs_diff_eq;
use cytogate_core::geom::{Point, ScreenPoint};
use cytogate_core::view::{AxisMapper, AxisRange, AxisScale, DataBounds, PlotRect, ViewState};

fn mapper_for(points: &[Point], view: ViewState) -> Option<AxisMapper> {
    let bounds = DataBounds::compute(points, view.x_scale, view.y_scale);
    AxisMapper::new(&bounds, &view, PlotRect::from_canvas(800.0, 600.0))
}

fn spread() -> Vec<Point> {
    vec![
        Point::new(1.0, 10.0),
        Point::new(1000.0, 100_000.0),
        Point::new(50.0, 300.0),
    ]
}

// ---------------------------------------------------------------------------
// Plot rectangle
// ---------------------------------------------------------------------------

#[test]
fn test_plot_rect_inset_by_margin() {
    let plot = PlotRect::from_canvas(800.0, 600.0);
    assert_eq!(plot.left, 60.0);
    assert_eq!(plot.top, 60.0);
    assert_eq!(plot.width, 680.0);
    assert_eq!(plot.height, 480.0);
    assert_eq!(plot.right(), 740.0);
    assert_eq!(plot.bottom(), 540.0);
}

#[test]
fn test_tiny_canvas_gives_empty_plot() {
    let plot = PlotRect::from_canvas(100.0, 100.0);
    assert!(plot.is_empty());
    assert!(mapper_for(&spread(), ViewState::default()).is_some());
    let bounds = DataBounds::compute(&spread(), AxisScale::Linear, AxisScale::Linear);
    assert!(AxisMapper::new(&bounds, &ViewState::default(), plot).is_none());
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

#[test]
fn test_unzoomed_window_matches_data_bounds() {
    let mapper = mapper_for(&spread(), ViewState::default()).unwrap();
    let w = mapper.window();
    assert_abs_diff_eq!(w.x.min, 1.0);
    assert_abs_diff_eq!(w.x.max, 1000.0);
    assert_abs_diff_eq!(w.y.min, 10.0);
    assert_abs_diff_eq!(w.y.max, 100_000.0);
}

#[test]
fn test_zoom_and_pan_shape_window() {
    let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 10.0)];
    let view = ViewState {
        zoom: 2.0,
        pan_x: 0.25,
        pan_y: -0.5,
        ..ViewState::default()
    };
    let w = mapper_for(&points, view).unwrap().window();
    // center 50 + 0.25*100 = 75, half-width 100/2/2 = 25
    assert_abs_diff_eq!(w.x.min, 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(w.x.max, 100.0, epsilon = 1e-9);
    // center 5 - 0.5*10 = 0, half-height 2.5
    assert_abs_diff_eq!(w.y.min, -2.5, epsilon = 1e-9);
    assert_abs_diff_eq!(w.y.max, 2.5, epsilon = 1e-9);
}

#[test]
fn test_log_window_is_in_decades() {
    let view = ViewState::with_scales(AxisScale::Log10, AxisScale::Log10);
    let w = mapper_for(&spread(), view).unwrap().window();
    assert_abs_diff_eq!(w.x.min, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w.x.max, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w.y.min, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(w.y.max, 5.0, epsilon = 1e-12);
}

#[test]
fn test_log_bounds_ignore_non_positive_values() {
    let points = vec![
        Point::new(-5.0, 1.0),
        Point::new(0.0, 10.0),
        Point::new(10.0, 100.0),
        Point::new(1000.0, 1000.0),
    ];
    let bounds = DataBounds::compute(&points, AxisScale::Log10, AxisScale::Linear);
    let x = bounds.x.unwrap();
    assert_abs_diff_eq!(x.min, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(x.max, 3.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bounds.y.unwrap().min, 1.0);
}

#[test]
fn test_log_axis_without_positive_values_has_no_range() {
    let points = vec![Point::new(-1.0, 5.0), Point::new(0.0, 6.0)];
    let view = ViewState::with_scales(AxisScale::Log10, AxisScale::Linear);
    let bounds = DataBounds::compute(&points, view.x_scale, view.y_scale);
    assert!(bounds.x.is_none());
    assert!(!bounds.is_valid());
    assert!(mapper_for(&points, view).is_none());
}

#[test]
fn test_degenerate_axis_gets_unit_window_and_ignores_pan() {
    let points = vec![Point::new(5.0, 0.0), Point::new(5.0, 10.0)];
    let view = ViewState {
        pan_x: 3.0,
        zoom: 4.0,
        ..ViewState::default()
    };
    let w = mapper_for(&points, view).unwrap().window();
    assert_abs_diff_eq!(w.x.min, 4.5);
    assert_abs_diff_eq!(w.x.max, 5.5);
    assert!(w.x.span().is_finite());
}

#[test]
fn test_bounds_parallel_path_matches_serial() {
    let n = 70_000;
    let points: Vec<Point> = (0..n)
        .map(|i| Point::new(i as f64 - 100.0, ((i * 7) % 5000) as f64))
        .collect();
    let bounds = DataBounds::compute(&points, AxisScale::Log10, AxisScale::Linear);
    let x = bounds.x.unwrap();
    assert_abs_diff_eq!(x.min, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(x.max, ((n - 101) as f64).log10(), epsilon = 1e-12);
    assert_eq!(bounds.y, Some(AxisRange::new(0.0, 4999.0)));
}

// ---------------------------------------------------------------------------
// Coordinate conversion
// ---------------------------------------------------------------------------

#[test]
fn test_y_axis_is_flipped() {
    let mapper = mapper_for(&spread(), ViewState::default()).unwrap();
    let top = mapper.screen_to_axis(ScreenPoint::new(60.0, 60.0));
    let bottom = mapper.screen_to_axis(ScreenPoint::new(60.0, 540.0));
    assert_abs_diff_eq!(top.y, 100_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bottom.y, 10.0, epsilon = 1e-6);
    assert_abs_diff_eq!(top.x, 1.0, epsilon = 1e-9);
}

#[test]
fn test_round_trip_linear() {
    let mapper = mapper_for(&spread(), ViewState::default()).unwrap();
    for &(x, y) in &[(60.0, 60.0), (123.5, 456.25), (740.0, 540.0), (10.0, 590.0)] {
        let p = ScreenPoint::new(x, y);
        let back = mapper.data_to_screen(mapper.screen_to_data(p)).unwrap();
        assert_abs_diff_eq!(back.x, x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, y, epsilon = 1e-9);
    }
}

#[test]
fn test_round_trip_log() {
    let view = ViewState {
        zoom: 1.7,
        pan_x: 0.1,
        pan_y: -0.2,
        x_scale: AxisScale::Log10,
        y_scale: AxisScale::Log10,
    };
    let mapper = mapper_for(&spread(), view).unwrap();
    for &(x, y) in &[(60.0, 60.0), (300.0, 200.0), (739.0, 539.0)] {
        let p = ScreenPoint::new(x, y);
        let data = mapper.screen_to_data(p);
        assert!(data.x > 0.0 && data.y > 0.0);
        let back = mapper.data_to_screen(data).unwrap();
        assert_abs_diff_eq!(back.x, x, epsilon = 1e-6);
        assert_abs_diff_eq!(back.y, y, epsilon = 1e-6);
    }
}

#[test]
fn test_log_axis_cannot_place_non_positive_value() {
    let view = ViewState::with_scales(AxisScale::Log10, AxisScale::Linear);
    let mapper = mapper_for(&spread(), view).unwrap();
    assert!(mapper.data_to_screen(Point::new(0.0, 50.0)).is_none());
    assert!(mapper.data_to_screen(Point::new(-3.0, 50.0)).is_none());
    assert!(mapper.data_to_screen(Point::new(3.0, -50.0)).is_some());
}

#[test]
fn test_scale_toggle_and_display() {
    assert_eq!(AxisScale::default(), AxisScale::Linear);
    assert_eq!(AxisScale::Linear.toggled(), AxisScale::Log10);
    assert_eq!(AxisScale::Log10.toggled(), AxisScale::Linear);
    assert_eq!(format!("{}", AxisScale::Log10), "Log10");
    assert_abs_diff_eq!(AxisScale::Log10.to_data(2.0), 100.0, epsilon = 1e-9);
}
