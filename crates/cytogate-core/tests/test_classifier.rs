use cytogate_core::geom::{Point, ScreenPoint};
use cytogate_core::selection::{
    build_request, GestureEvent, LassoCapture, LassoPath, PointerButton, RayCastClassifier,
};
use cytogate_core::view::{AxisMapper, AxisScale, DataBounds, PlotRect, ViewState};

fn lasso(points: &[(f64, f64)]) -> LassoPath {
    let mut capture = LassoCapture::new();
    capture.press(PointerButton::Primary, ScreenPoint::new(points[0].0, points[0].1));
    for &(x, y) in &points[1..] {
        capture.move_to(ScreenPoint::new(x, y));
    }
    match capture.release(PointerButton::Primary) {
        GestureEvent::Completed(path) => path,
        other => panic!("expected completed lasso, got {other:?}"),
    }
}

fn mapper(points: &[Point], view: ViewState) -> AxisMapper {
    let bounds = DataBounds::compute(points, view.x_scale, view.y_scale);
    AxisMapper::new(&bounds, &view, PlotRect::from_canvas(800.0, 600.0)).unwrap()
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

#[test]
fn test_request_keeps_one_point_per_event() {
    let points: Vec<Point> = (0..50).map(|i| Point::new(i as f64, (i * 2) as f64)).collect();
    let m = mapper(&points, ViewState::default());
    let path = lasso(&[(100.0, 100.0), (700.0, 100.0), (700.0, 500.0)]);
    let request = build_request(&path, &m, &points).unwrap();
    assert_eq!(request.points.len(), points.len());
    assert_eq!(request.polygon.len(), 3);
    assert_eq!(request.points[7], points[7]);
}

#[test]
fn test_log_axis_unmappable_events_become_nan() {
    let points = vec![
        Point::new(10.0, 10.0),
        Point::new(-4.0, 100.0),
        Point::new(1000.0, 0.0),
        Point::new(100.0, 1000.0),
    ];
    let m = mapper(&points, ViewState::with_scales(AxisScale::Log10, AxisScale::Log10));
    let path = lasso(&[(60.0, 60.0), (740.0, 60.0), (740.0, 540.0), (60.0, 540.0)]);
    let request = build_request(&path, &m, &points).unwrap();
    assert!(request.points[1].x.is_nan());
    assert!(request.points[2].y.is_nan());
    assert!((request.points[3].x - 2.0).abs() < 1e-12);
    assert!((request.points[3].y - 3.0).abs() < 1e-12);

    let result = RayCastClassifier.classify(&request.polygon, &request.points);
    assert!(!result.indices.contains(&1));
    assert!(!result.indices.contains(&2));
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn test_lasso_selects_points_in_drawn_region() {
    // 10x10 grid over [0, 9] in both axes
    let points: Vec<Point> = (0..100)
        .map(|i| Point::new((i % 10) as f64, (i / 10) as f64))
        .collect();
    let m = mapper(&points, ViewState::default());
    // Left half of the plot, full height: x in [0, 4.5)
    let path = lasso(&[(50.0, 50.0), (400.0, 50.0), (400.0, 550.0), (50.0, 550.0)]);
    let request = build_request(&path, &m, &points).unwrap();
    let result = RayCastClassifier.classify(&request.polygon, &request.points);

    let expected: Vec<usize> = (0..100).filter(|i| i % 10 <= 4).collect();
    assert_eq!(result.indices, expected);
    assert_eq!(result.count, 50);
}

#[test]
fn test_classification_is_ascending_in_parallel_path() {
    let n = 100_000;
    let points: Vec<Point> = (0..n)
        .map(|i| Point::new((i % 1000) as f64, ((i * 7) % 1000) as f64))
        .collect();
    let polygon = vec![
        Point::new(100.0, 100.0),
        Point::new(600.0, 100.0),
        Point::new(600.0, 600.0),
        Point::new(100.0, 600.0),
    ];
    let result = RayCastClassifier.classify(&polygon, &points);
    assert!(result.indices.windows(2).all(|w| w[0] < w[1]));
    let serial: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.x > 100.0 && p.x < 600.0 && p.y > 100.0 && p.y < 600.0)
        .map(|(i, _)| i)
        .collect();
    // Boundary points are resolved by the ray cast; compare the strict interior.
    assert!(serial.iter().all(|i| result.indices.binary_search(i).is_ok()));
    assert_eq!(result.count, result.indices.len());
}

#[test]
fn test_degenerate_polygon_selects_nothing() {
    let points = vec![Point::new(1.0, 1.0)];
    let result = RayCastClassifier.classify(&[Point::new(0.0, 0.0), Point::new(2.0, 2.0)], &points);
    assert!(result.indices.is_empty());
    assert_eq!(result.count, 0);
}
