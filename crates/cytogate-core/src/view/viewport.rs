use serde::{Deserialize, Serialize};

use crate::consts::{BUTTON_ZOOM_FACTOR, EPSILON, MAX_ZOOM, MIN_ZOOM, WHEEL_ZOOM_FACTOR};
use crate::geom::ScreenPoint;

use super::axis::{AxisMapper, AxisScale, DataBounds, PlotRect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    fn apply(self, zoom: f64, factor: f64) -> f64 {
        let z = match self {
            Self::In => zoom * factor,
            Self::Out => zoom / factor,
        };
        z.clamp(MIN_ZOOM, MAX_ZOOM)
    }
}

/// Zoom, pan and per-axis scale of the plot.
///
/// Pan values are fractions of the un-zoomed axis range, so they stay
/// meaningful when the canvas is resized.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub x_scale: AxisScale,
    pub y_scale: AxisScale,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
        }
    }
}

impl ViewState {
    pub fn with_scales(x_scale: AxisScale, y_scale: AxisScale) -> Self {
        Self {
            x_scale,
            y_scale,
            ..Self::default()
        }
    }

    /// Back to zoom 1 with no pan; scales are kept.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Mouse-wheel zoom that keeps the coordinate under `anchor` fixed on screen.
    ///
    /// Returns `false` when nothing changed (zoom already at its bound, or no
    /// valid axis range to anchor against).
    pub fn zoom_at(
        &mut self,
        bounds: &DataBounds,
        plot: PlotRect,
        anchor: ScreenPoint,
        direction: ZoomDirection,
    ) -> bool {
        let Some(mapper) = AxisMapper::new(bounds, self, plot) else {
            return false;
        };
        let new_zoom = direction.apply(self.zoom, WHEEL_ZOOM_FACTOR);
        if (new_zoom - self.zoom).abs() <= EPSILON {
            return false;
        }

        let target = mapper.screen_to_axis(anchor);
        let fx = (anchor.x - plot.left) / plot.width;
        let fy = (anchor.y - plot.top) / plot.height;

        // Solve center' so that min' + fx * span / zoom' == target (x), and
        // max' - fy * span / zoom' == target (y, flipped).
        if let Some(base) = bounds.x.filter(|r| !r.is_degenerate()) {
            let visible = base.span() / new_zoom;
            let center = target.x - fx * visible + 0.5 * visible;
            self.pan_x = (center - base.center()) / base.span();
        }
        if let Some(base) = bounds.y.filter(|r| !r.is_degenerate()) {
            let visible = base.span() / new_zoom;
            let center = target.y + fy * visible - 0.5 * visible;
            self.pan_y = (center - base.center()) / base.span();
        }
        self.zoom = new_zoom;
        true
    }

    /// Discrete zoom about the window center.
    pub fn zoom_step(&mut self, direction: ZoomDirection) -> bool {
        let new_zoom = direction.apply(self.zoom, BUTTON_ZOOM_FACTOR);
        if (new_zoom - self.zoom).abs() <= EPSILON {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    /// Drag-pan by a pixel delta. Dragging right or down moves the content
    /// with the pointer.
    pub fn pan_by(&mut self, bounds: &DataBounds, plot: PlotRect, delta: ScreenPoint) -> bool {
        if plot.is_empty() || !bounds.is_valid() {
            return false;
        }
        let mut changed = false;
        if let Some(base) = bounds.x.filter(|r| !r.is_degenerate()) {
            let axis_delta = delta.x / plot.width * base.span() / self.zoom;
            self.pan_x -= axis_delta / base.span();
            changed |= delta.x != 0.0;
        }
        if let Some(base) = bounds.y.filter(|r| !r.is_degenerate()) {
            let axis_delta = delta.y / plot.height * base.span() / self.zoom;
            self.pan_y += axis_delta / base.span();
            changed |= delta.y != 0.0;
        }
        changed
    }
}
