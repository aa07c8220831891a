pub mod axis;
pub mod ticks;
pub mod viewport;

pub use axis::{AxisMapper, AxisRange, AxisScale, DataBounds, PlotRect, ViewWindow};
pub use ticks::{axis_ticks, Tick};
pub use viewport::{ViewState, ZoomDirection};
