use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{EPSILON, PARALLEL_EVENT_THRESHOLD, PLOT_MARGIN};
use crate::geom::{Point, ScreenPoint};

use super::viewport::ViewState;

/// How a channel's raw values are laid out along an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    #[default]
    Linear,
    #[serde(alias = "log")]
    Log10,
}

impl AxisScale {
    pub fn is_log(self) -> bool {
        matches!(self, Self::Log10)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Linear => Self::Log10,
            Self::Log10 => Self::Linear,
        }
    }

    /// Data value to axis space. `None` for values a log axis cannot show.
    pub fn to_axis(self, value: f64) -> Option<f64> {
        match self {
            Self::Linear if value.is_finite() => Some(value),
            Self::Log10 if value > 0.0 && value.is_finite() => Some(value.log10()),
            _ => None,
        }
    }

    /// Axis-space coordinate back to a data value.
    pub fn to_data(self, axis: f64) -> f64 {
        match self {
            Self::Linear => axis,
            Self::Log10 => 10f64.powf(axis),
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Log10 => write!(f, "Log10"),
        }
    }
}

/// Closed interval in axis space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() <= EPSILON
    }

    /// Span used for window math; a zero-sized range counts as one unit wide.
    pub fn effective_span(&self) -> f64 {
        if self.is_degenerate() {
            1.0
        } else {
            self.span()
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn include(self, value: f64) -> Self {
        Self::new(self.min.min(value), self.max.max(value))
    }

    fn merge(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// Canvas area that points are drawn into, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Canvas inset by the standard plot margin.
    pub fn from_canvas(width: f64, height: f64) -> Self {
        Self::with_margin(width, height, PLOT_MARGIN)
    }

    pub fn with_margin(width: f64, height: f64, margin: f64) -> Self {
        Self::new(
            margin,
            margin,
            (width - 2.0 * margin).max(0.0),
            (height - 2.0 * margin).max(0.0),
        )
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }
}

/// Axis-space extent of the active point set, per axis.
///
/// An axis is `None` when no value can be shown on it (for a log axis, no
/// strictly positive value).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataBounds {
    pub x: Option<AxisRange>,
    pub y: Option<AxisRange>,
}

impl DataBounds {
    pub fn compute(points: &[Point], x_scale: AxisScale, y_scale: AxisScale) -> Self {
        Self {
            x: axis_extent(points, |p| p.x, x_scale),
            y: axis_extent(points, |p| p.y, y_scale),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

fn axis_extent(points: &[Point], pick: fn(&Point) -> f64, scale: AxisScale) -> Option<AxisRange> {
    if points.len() >= PARALLEL_EVENT_THRESHOLD {
        points
            .par_iter()
            .filter_map(|p| scale.to_axis(pick(p)))
            .map(|v| AxisRange::new(v, v))
            .reduce_with(AxisRange::merge)
    } else {
        points
            .iter()
            .filter_map(|p| scale.to_axis(pick(p)))
            .fold(None, |acc: Option<AxisRange>, v| {
                Some(acc.map_or(AxisRange::new(v, v), |r| r.include(v)))
            })
    }
}

/// Visible axis-space window for both axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewWindow {
    pub x: AxisRange,
    pub y: AxisRange,
}

/// Window for one axis given its base range, zoom and pan fraction.
///
/// A degenerate base range gives a fixed unit-wide window around the value.
pub(crate) fn axis_window(base: AxisRange, zoom: f64, pan: f64) -> AxisRange {
    if base.is_degenerate() {
        let c = base.center();
        return AxisRange::new(c - 0.5, c + 0.5);
    }
    let span = base.span();
    let center = base.center() + pan * span;
    let half = 0.5 * span / zoom;
    AxisRange::new(center - half, center + half)
}

/// Converts between canvas pixels, axis space and data space for one frame.
#[derive(Clone, Copy, Debug)]
pub struct AxisMapper {
    window: ViewWindow,
    plot: PlotRect,
    x_scale: AxisScale,
    y_scale: AxisScale,
}

impl AxisMapper {
    /// `None` when either axis has no valid range or the plot area is empty;
    /// drawing and classification skip the frame in that case.
    pub fn new(bounds: &DataBounds, view: &ViewState, plot: PlotRect) -> Option<Self> {
        let (bx, by) = (bounds.x?, bounds.y?);
        if plot.is_empty() {
            return None;
        }
        Some(Self {
            window: ViewWindow {
                x: axis_window(bx, view.zoom, view.pan_x),
                y: axis_window(by, view.zoom, view.pan_y),
            },
            plot,
            x_scale: view.x_scale,
            y_scale: view.y_scale,
        })
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    pub fn plot(&self) -> PlotRect {
        self.plot
    }

    pub fn x_scale(&self) -> AxisScale {
        self.x_scale
    }

    pub fn y_scale(&self) -> AxisScale {
        self.y_scale
    }

    pub fn screen_to_axis(&self, p: ScreenPoint) -> Point {
        let fx = (p.x - self.plot.left) / self.plot.width;
        let fy = (p.y - self.plot.top) / self.plot.height;
        Point::new(
            self.window.x.min + fx * self.window.x.span(),
            self.window.y.max - fy * self.window.y.span(),
        )
    }

    pub fn axis_to_screen(&self, p: Point) -> ScreenPoint {
        let fx = (p.x - self.window.x.min) / self.window.x.span();
        let fy = (self.window.y.max - p.y) / self.window.y.span();
        ScreenPoint::new(
            self.plot.left + fx * self.plot.width,
            self.plot.top + fy * self.plot.height,
        )
    }

    pub fn data_to_axis(&self, p: Point) -> Option<Point> {
        Some(Point::new(
            self.x_scale.to_axis(p.x)?,
            self.y_scale.to_axis(p.y)?,
        ))
    }

    pub fn axis_to_data(&self, p: Point) -> Point {
        Point::new(self.x_scale.to_data(p.x), self.y_scale.to_data(p.y))
    }

    pub fn screen_to_data(&self, p: ScreenPoint) -> Point {
        self.axis_to_data(self.screen_to_axis(p))
    }

    /// `None` for values a log axis cannot place.
    pub fn data_to_screen(&self, p: Point) -> Option<ScreenPoint> {
        self.data_to_axis(p).map(|a| self.axis_to_screen(a))
    }
}
