//! Toolkit-independent frame description: the GUI paints the commands in
//! order, tests inspect them directly.

use crate::consts::LABEL_MIN_SPACING;
use crate::geom::{Point, ScreenPoint};
use crate::view::{axis_ticks, AxisMapper, PlotRect, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointStyle {
    /// Outside the combined filter, shown dimmed.
    Excluded,
    Default,
    /// Inside the current lasso selection.
    Selected,
}

/// Where a label sits relative to its anchor position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelAnchor {
    /// Centered below the point (x axis).
    Below,
    /// Right-aligned to the left of the point (y axis).
    Left,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    GridLine {
        from: ScreenPoint,
        to: ScreenPoint,
    },
    Axis {
        from: ScreenPoint,
        to: ScreenPoint,
    },
    Points {
        style: PointStyle,
        positions: Vec<ScreenPoint>,
    },
    Lasso {
        points: Vec<ScreenPoint>,
        closed: bool,
    },
    Label {
        pos: ScreenPoint,
        text: String,
        anchor: LabelAnchor,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn points(&self, style: PointStyle) -> impl Iterator<Item = &ScreenPoint> {
        self.commands.iter().flat_map(move |c| match c {
            DrawCommand::Points { style: s, positions } if *s == style => positions.as_slice(),
            _ => &[][..],
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Everything one frame needs. `excluded` is `Some` only while the overlay is
/// switched on; `excluded[i]` marks event `i` as outside the combined filter.
pub struct FrameInput<'a> {
    pub mapper: Option<&'a AxisMapper>,
    pub plot: PlotRect,
    pub zoom: f64,
    pub points: &'a [Point],
    pub excluded: Option<&'a [bool]>,
    pub selected: &'a [usize],
    pub lasso: Option<(&'a [ScreenPoint], bool)>,
}

pub fn build_scene(frame: &FrameInput<'_>) -> Scene {
    let mut commands = Vec::new();
    let plot = frame.plot;

    let Some(mapper) = frame.mapper else {
        push_axes(&mut commands, plot);
        return Scene { commands };
    };

    let window = mapper.window();
    let x_ticks = axis_ticks(window.x, mapper.x_scale(), frame.zoom);
    let y_ticks = axis_ticks(window.y, mapper.y_scale(), frame.zoom);
    let x_screen: Vec<f64> = x_ticks
        .iter()
        .map(|t| mapper.axis_to_screen(Point::new(t.value, window.y.min)).x)
        .collect();
    let y_screen: Vec<f64> = y_ticks
        .iter()
        .map(|t| mapper.axis_to_screen(Point::new(window.x.min, t.value)).y)
        .collect();

    for &x in &x_screen {
        commands.push(DrawCommand::GridLine {
            from: ScreenPoint::new(x, plot.top),
            to: ScreenPoint::new(x, plot.bottom()),
        });
    }
    for &y in &y_screen {
        commands.push(DrawCommand::GridLine {
            from: ScreenPoint::new(plot.left, y),
            to: ScreenPoint::new(plot.right(), y),
        });
    }

    push_axes(&mut commands, plot);

    let project = |i: usize| {
        mapper
            .data_to_screen(frame.points[i])
            .filter(|s| plot.contains(*s))
    };
    let mut excluded = Vec::new();
    let mut default = Vec::new();
    for i in 0..frame.points.len() {
        let Some(pos) = project(i) else { continue };
        match frame.excluded {
            Some(mask) if mask.get(i).copied().unwrap_or(false) => excluded.push(pos),
            _ => default.push(pos),
        }
    }
    if frame.excluded.is_some() {
        commands.push(DrawCommand::Points {
            style: PointStyle::Excluded,
            positions: excluded,
        });
    }
    commands.push(DrawCommand::Points {
        style: PointStyle::Default,
        positions: default,
    });
    let selected: Vec<ScreenPoint> = frame
        .selected
        .iter()
        .filter(|&&i| i < frame.points.len())
        .filter_map(|&i| project(i))
        .collect();
    commands.push(DrawCommand::Points {
        style: PointStyle::Selected,
        positions: selected,
    });

    if let Some((points, closed)) = frame.lasso {
        if !points.is_empty() {
            commands.push(DrawCommand::Lasso {
                points: points.to_vec(),
                closed,
            });
        }
    }

    push_labels(&mut commands, &x_ticks, &x_screen, |x| {
        (ScreenPoint::new(x, plot.bottom() + 5.0), LabelAnchor::Below)
    });
    push_labels(&mut commands, &y_ticks, &y_screen, |y| {
        (ScreenPoint::new(plot.left - 5.0, y), LabelAnchor::Left)
    });

    Scene { commands }
}

fn push_axes(commands: &mut Vec<DrawCommand>, plot: PlotRect) {
    commands.push(DrawCommand::Axis {
        from: ScreenPoint::new(plot.left, plot.bottom()),
        to: ScreenPoint::new(plot.right(), plot.bottom()),
    });
    commands.push(DrawCommand::Axis {
        from: ScreenPoint::new(plot.left, plot.top),
        to: ScreenPoint::new(plot.left, plot.bottom()),
    });
}

/// Emit labels in tick order, skipping any closer than the minimum spacing
/// to the last one drawn.
fn push_labels(
    commands: &mut Vec<DrawCommand>,
    ticks: &[Tick],
    screen: &[f64],
    place: impl Fn(f64) -> (ScreenPoint, LabelAnchor),
) {
    let mut last: Option<f64> = None;
    for (tick, &s) in ticks.iter().zip(screen) {
        if last.is_some_and(|l| (s - l).abs() < LABEL_MIN_SPACING) {
            continue;
        }
        last = Some(s);
        let (pos, anchor) = place(s);
        commands.push(DrawCommand::Label {
            pos,
            text: tick.label.clone(),
            anchor,
        });
    }
}
