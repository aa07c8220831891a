use crate::consts::{
    EPSILON, GRID_LINES_PER_ZOOM, LOG_MAJOR_STEP, LOG_MINOR_MAX_SPAN, LOG_MINOR_MIN_ZOOM,
    LOG_MINOR_STEP, MAX_GRID_LINES, MAX_TICKS_PER_AXIS, MIN_GRID_LINES,
};

use super::axis::{AxisRange, AxisScale};

/// One gridline position in axis space with its label text.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Linear gridline spacing: the window split into a zoom-dependent number of
/// intervals, rounded up to 1, 2 or 5 times a power of ten.
pub fn linear_step(span: f64, zoom: f64) -> Option<f64> {
    if !(span.is_finite() && span > EPSILON) {
        return None;
    }
    let count = ((GRID_LINES_PER_ZOOM * zoom).floor() as usize).clamp(MIN_GRID_LINES, MAX_GRID_LINES);
    Some(nice_step(span / count as f64))
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 + 1e-9 {
        1.0
    } else if residual <= 2.0 + 1e-9 {
        2.0
    } else if residual <= 5.0 + 1e-9 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Log gridline spacing in decades.
pub fn log_step(span: f64, zoom: f64) -> f64 {
    if span < LOG_MINOR_MAX_SPAN && zoom > LOG_MINOR_MIN_ZOOM {
        LOG_MINOR_STEP
    } else {
        LOG_MAJOR_STEP
    }
}

/// Multiples of `step` inside `range`, ascending.
pub fn tick_values(range: AxisRange, step: f64) -> Vec<f64> {
    if !(step > 0.0 && range.min.is_finite() && range.max.is_finite()) {
        return Vec::new();
    }
    let slack = step * 1e-9;
    let first = ((range.min - slack) / step).ceil();
    (0..MAX_TICKS_PER_AXIS)
        .map(|i| (first + i as f64) * step)
        .take_while(|v| *v <= range.max + slack)
        .collect()
}

/// Gridlines and labels for one axis of the visible window.
pub fn axis_ticks(range: AxisRange, scale: AxisScale, zoom: f64) -> Vec<Tick> {
    let step = match scale {
        AxisScale::Linear => match linear_step(range.span(), zoom) {
            Some(s) => s,
            None => return Vec::new(),
        },
        AxisScale::Log10 => log_step(range.span(), zoom),
    };
    tick_values(range, step)
        .into_iter()
        .map(|value| Tick {
            value,
            label: format_label(value, scale, step),
        })
        .collect()
}

pub fn format_label(value: f64, scale: AxisScale, step: f64) -> String {
    match scale {
        AxisScale::Linear => format_linear(value, step),
        AxisScale::Log10 => format_power_of_ten(value),
    }
}

fn format_linear(value: f64, step: f64) -> String {
    let decimals = if step < 0.01 {
        3
    } else if step < 0.1 {
        2
    } else if step < 1.0 {
        1
    } else {
        0
    };
    // Avoid "-0" for values that are zero up to rounding.
    let value = if value.abs() < step * 1e-6 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

fn format_power_of_ten(exponent: f64) -> String {
    let rounded = exponent.round();
    if (exponent - rounded).abs() > 1e-6 {
        return format!("10^{exponent:.1}");
    }
    match rounded as i64 {
        0 => "1".to_string(),
        1 => "10".to_string(),
        n => format!("10{}", superscript(n)),
    }
}

fn superscript(n: i64) -> String {
    n.to_string()
        .chars()
        .map(|c| match c {
            '-' => '⁻',
            '0' => '⁰',
            '1' => '¹',
            '2' => '²',
            '3' => '³',
            '4' => '⁴',
            '5' => '⁵',
            '6' => '⁶',
            '7' => '⁷',
            '8' => '⁸',
            '9' => '⁹',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_steps_round_up() {
        assert_eq!(nice_step(0.3), 0.5);
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(1.5), 2.0);
        assert_eq!(nice_step(7.0), 10.0);
    }

    #[test]
    fn superscripts() {
        assert_eq!(superscript(2), "²");
        assert_eq!(superscript(-1), "⁻¹");
        assert_eq!(superscript(10), "¹⁰");
    }
}
