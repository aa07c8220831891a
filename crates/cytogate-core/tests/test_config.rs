mod common;

use std::fs;

use common::*;
use cytogate_core::config::{run_gates, GateConfig, GateStage};
use cytogate_core::error::GateError;
use cytogate_core::io::ExportFormat;
use cytogate_core::service::LocalBackend;
use cytogate_core::view::AxisScale;

const SAMPLE: &str = r#"
input = "events.fcs"
output = "gated"
format = "csv"
export_metadata = true

[[gate]]
x = "FSC"
y = "SSC"
polygon = [[0.0, 0.0], [50.0, 0.0], [50.0, 50.0], [0.0, 50.0]]

[[gate]]
x = "SSC"
y = "Time"
x_scale = "log10"
y_scale = "linear"
polygon = [[1.0, -1.0], [1000.0, -1.0], [1000.0, 2.5], [1.0, 2.5]]
"#;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn test_parse_gate_config() {
    let config = GateConfig::from_toml_str(SAMPLE).unwrap();
    assert_eq!(config.format, Some(ExportFormat::Csv));
    assert!(config.export_metadata);
    assert_eq!(config.gates.len(), 2);
    assert_eq!(config.gates[0].x_scale, AxisScale::Linear);
    assert_eq!(config.gates[1].x_scale, AxisScale::Log10);
    assert_eq!(config.gates[1].polygon[2], [1000.0, 2.5]);
}

#[test]
fn test_defaults_when_omitted() {
    let config = GateConfig::from_toml_str("input = \"a.fcs\"\noutput = \"b.xlsx\"\n").unwrap();
    assert!(config.format.is_none());
    assert!(!config.export_metadata);
    assert!(config.gates.is_empty());
}

#[test]
fn test_invalid_toml_is_config_error() {
    assert!(matches!(
        GateConfig::from_toml_str("input = "),
        Err(GateError::InvalidConfig(_))
    ));
    assert!(matches!(
        GateConfig::from_toml_str("input = \"a\"\noutput = \"b\"\nformat = \"pdf\"\n"),
        Err(GateError::InvalidConfig(_))
    ));
}

#[test]
fn test_sample_round_trips_through_toml() {
    let text = GateConfig::sample().to_toml().unwrap();
    let parsed = GateConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed.gates.len(), 2);
    assert_eq!(parsed.gates[1].y_scale, AxisScale::Log10);
    assert_eq!(parsed.output, GateConfig::sample().output);
}

#[test]
fn test_gate_stage_display() {
    assert_eq!(format!("{}", GateStage::Loading), "Loading file");
    assert_eq!(format!("{}", GateStage::Exporting), "Writing output");
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// Events: FSC = i, SSC = 10 * i, Time = i / 2 for i in 0..10.
fn write_events() -> tempfile::NamedTempFile {
    let rows: Vec<Vec<f32>> = (0..10)
        .map(|i| vec![i as f32, 10.0 * i as f32, i as f32 / 2.0])
        .collect();
    write_temp_fcs(&build_float_fcs(&["FSC", "SSC", "Time"], &rows))
}

#[test]
fn test_run_gates_exports_intersection() {
    let events = write_events();
    let dir = tempfile::tempdir().unwrap();
    let mut config = GateConfig::from_toml_str(SAMPLE).unwrap();
    config.input = events.path().to_path_buf();
    config.output = dir.path().join("gated");

    let mut stages = Vec::new();
    let report = run_gates(&config, &LocalBackend, |stage, _| stages.push(stage)).unwrap();

    // Gate 1: FSC < 50 and SSC < 50 -> i in 0..=4
    // Gate 2: log SSC, so i = 0 is unmappable; Time < 2.5 -> i in 1..=4
    assert_eq!(report.total, 10);
    assert_eq!(report.gates.len(), 2);
    assert_eq!(report.gates[1].inside, 4);
    assert_eq!(report.passing, 4);
    assert_eq!(report.format, ExportFormat::Csv);
    assert_eq!(report.output, dir.path().join("gated.csv"));

    let csv = fs::read_to_string(&report.output).unwrap();
    let rows: Vec<&str> = csv.lines().skip(1).collect();
    assert_eq!(rows.len(), report.passing);
    assert!(rows.iter().all(|r| r.split(',').next().unwrap().parse::<f64>().unwrap() < 5.0));
    assert!(!rows.iter().any(|r| r.starts_with("0,")));

    let metadata = report.metadata.unwrap();
    assert_eq!(metadata, dir.path().join("gated_metadata.json"));
    assert!(metadata.exists());

    assert_eq!(stages.first(), Some(&GateStage::Loading));
    assert_eq!(stages.last(), Some(&GateStage::Exporting));
}

#[test]
fn test_later_gate_on_same_pair_replaces_earlier() {
    let events = write_events();
    let dir = tempfile::tempdir().unwrap();
    let text = format!(
        r#"
input = "{}"
output = "{}"

[[gate]]
x = "FSC"
y = "SSC"
polygon = [[-1.0, -1.0], [2.5, -1.0], [2.5, 100.0], [-1.0, 100.0]]

[[gate]]
x = "FSC"
y = "SSC"
polygon = [[5.5, -1.0], [20.0, -1.0], [20.0, 1000.0], [5.5, 1000.0]]
"#,
        events.path().display(),
        dir.path().join("out.csv").display()
    );
    let config = GateConfig::from_toml_str(&text).unwrap();
    let report = run_gates(&config, &LocalBackend, |_, _| {}).unwrap();
    assert_eq!(report.passing, 4);
    assert!(report.metadata.is_none());
}

#[test]
fn test_gate_with_too_few_vertices_is_rejected() {
    let mut config = GateConfig::sample();
    config.gates[0].polygon.truncate(2);
    let err = run_gates(&config, &LocalBackend, |_, _| {}).unwrap_err();
    assert!(matches!(err, GateError::InvalidConfig(_)));
}

#[test]
fn test_missing_input_is_load_error() {
    let mut config = GateConfig::sample();
    config.input = "/nonexistent/input.fcs".into();
    let err = run_gates(&config, &LocalBackend, |_, _| {}).unwrap_err();
    assert!(matches!(err, GateError::Load { .. }));
}
