/// Inset (in pixels) between the canvas edge and the plot rectangle, on every side.
pub const PLOT_MARGIN: f64 = 60.0;

/// Lower bound on the zoom level.
pub const MIN_ZOOM: f64 = 0.1;

/// Upper bound on the zoom level.
pub const MAX_ZOOM: f64 = 10.0;

/// Zoom factor applied per mouse-wheel notch (divided for zooming out).
pub const WHEEL_ZOOM_FACTOR: f64 = 1.1;

/// Zoom factor applied by the discrete zoom buttons.
pub const BUTTON_ZOOM_FACTOR: f64 = 1.5;

/// A lasso needs this many vertices to enclose anything.
pub const MIN_LASSO_VERTICES: usize = 3;

/// Grid lines per unit of zoom before clamping.
pub const GRID_LINES_PER_ZOOM: f64 = 8.0;

/// Minimum number of linear grid intervals across the visible window.
pub const MIN_GRID_LINES: usize = 3;

/// Maximum number of linear grid intervals across the visible window.
pub const MAX_GRID_LINES: usize = 20;

/// Decade spacing for log-axis gridlines.
pub const LOG_MAJOR_STEP: f64 = 1.0;

/// Sub-decade spacing used once the visible log window is narrow enough.
pub const LOG_MINOR_STEP: f64 = 0.2;

/// Visible log span (in decades) below which minor log gridlines are used.
pub const LOG_MINOR_MAX_SPAN: f64 = 2.0;

/// Zoom level above which minor log gridlines are allowed.
pub const LOG_MINOR_MIN_ZOOM: f64 = 0.3;

/// Minimum spacing (in pixels) between consecutive axis tick labels.
pub const LABEL_MIN_SPACING: f64 = 40.0;

/// Hard cap on ticks generated for one axis, guards against pathological windows.
pub const MAX_TICKS_PER_AXIS: usize = 1_000;

/// Spans at or below this are treated as zero-sized.
pub const EPSILON: f64 = 1e-12;

/// Minimum event count to use Rayon parallelism for per-event work.
pub const PARALLEL_EVENT_THRESHOLD: usize = 65_536;

/// Channel-pair key separator.
pub const PAIR_KEY_SEPARATOR: char = '|';
