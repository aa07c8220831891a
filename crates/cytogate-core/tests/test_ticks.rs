use approx::assert_abs_diff_eq;
use cytogate_core::view::ticks::{format_label, linear_step, log_step, tick_values};
use cytogate_core::view::{axis_ticks, AxisRange, AxisScale};

// ---------------------------------------------------------------------------
// Step selection
// ---------------------------------------------------------------------------

#[test]
fn test_linear_step_rounds_to_nice_values() {
    // 8 intervals of 12.5 round up to 20
    assert_abs_diff_eq!(linear_step(100.0, 1.0).unwrap(), 20.0, epsilon = 1e-12);
    // zoom 0.1 clamps to 3 intervals: 3.33 -> 5
    assert_abs_diff_eq!(linear_step(10.0, 0.1).unwrap(), 5.0, epsilon = 1e-12);
    // zoom 10 clamps to 20 intervals: 0.05 -> 0.05
    assert_abs_diff_eq!(linear_step(1.0, 10.0).unwrap(), 0.05, epsilon = 1e-12);
    // 1000 / 16 = 62.5 -> 100
    assert_abs_diff_eq!(linear_step(1000.0, 2.0).unwrap(), 100.0, epsilon = 1e-9);
}

#[test]
fn test_linear_step_rejects_empty_span() {
    assert!(linear_step(0.0, 1.0).is_none());
    assert!(linear_step(f64::NAN, 1.0).is_none());
}

#[test]
fn test_log_step_switches_to_minor_when_narrow() {
    assert_eq!(log_step(1.5, 1.0), 0.2);
    assert_eq!(log_step(3.0, 1.0), 1.0);
    assert_eq!(log_step(1.5, 0.3), 1.0);
    assert_eq!(log_step(2.0, 5.0), 1.0);
}

#[test]
fn test_tick_values_are_step_multiples_inside_range() {
    let ticks = tick_values(AxisRange::new(-5.0, 101.0), 20.0);
    assert_eq!(ticks, vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);

    let edges = tick_values(AxisRange::new(0.0, 1.0), 0.2);
    assert_eq!(edges.len(), 6);
    assert_abs_diff_eq!(edges[5], 1.0, epsilon = 1e-12);
}

#[test]
fn test_tick_values_are_capped() {
    let ticks = tick_values(AxisRange::new(0.0, 1e9), 1.0);
    assert_eq!(ticks.len(), cytogate_core::consts::MAX_TICKS_PER_AXIS);
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn test_log_labels_are_powers_of_ten() {
    assert_eq!(format_label(0.0, AxisScale::Log10, 1.0), "1");
    assert_eq!(format_label(1.0, AxisScale::Log10, 1.0), "10");
    assert_eq!(format_label(2.0, AxisScale::Log10, 1.0), "10²");
    assert_eq!(format_label(5.0, AxisScale::Log10, 1.0), "10⁵");
    assert_eq!(format_label(-1.0, AxisScale::Log10, 1.0), "10⁻¹");
    assert_eq!(format_label(1.2, AxisScale::Log10, 0.2), "10^1.2");
}

#[test]
fn test_linear_label_decimals_follow_step() {
    assert_eq!(format_label(20.0, AxisScale::Linear, 20.0), "20");
    assert_eq!(format_label(0.5, AxisScale::Linear, 0.5), "0.5");
    assert_eq!(format_label(0.25, AxisScale::Linear, 0.05), "0.25");
    assert_eq!(format_label(0.002, AxisScale::Linear, 0.001), "0.002");
}

#[test]
fn test_linear_label_has_no_negative_zero() {
    let ticks = axis_ticks(AxisRange::new(-0.3, 0.3), AxisScale::Linear, 1.0);
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
    assert!(labels.contains(&"0.0"));
    assert!(!labels.contains(&"-0.0"));
}

#[test]
fn test_axis_ticks_log_major() {
    let ticks = axis_ticks(AxisRange::new(0.5, 4.5), AxisScale::Log10, 1.0);
    let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["10", "10²", "10³", "10⁴"]);
}

#[test]
fn test_axis_ticks_log_minor_when_zoomed() {
    let ticks = axis_ticks(AxisRange::new(2.0, 3.0), AxisScale::Log10, 2.0);
    assert_eq!(ticks.len(), 6);
    assert_eq!(ticks[0].label, "10²");
    assert_eq!(ticks[5].label, "10³");
}
