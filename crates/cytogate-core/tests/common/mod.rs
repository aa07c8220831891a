#![allow(dead_code)]

use std::io::Write;

use cytogate_core::dataset::{Dataset, DatasetMetadata};
use cytogate_core::geom::ScreenPoint;
use cytogate_core::selection::PointerButton;
use cytogate_core::service::{GateBackend, LocalBackend};
use cytogate_core::session::{ClassificationJob, IntersectionJob, PointsJob, Session};
use tempfile::NamedTempFile;

pub const FCS_HEADER_SIZE: usize = 58;

/// Escape the `/` delimiter by doubling it.
fn escape(text: &str) -> String {
    text.replace('/', "//")
}

/// Assemble header + TEXT + DATA. TEXT uses `/` as delimiter.
pub fn assemble_fcs(keywords: &[(String, String)], data: &[u8]) -> Vec<u8> {
    let mut text = String::from("/");
    for (k, v) in keywords {
        text.push_str(&escape(k));
        text.push('/');
        text.push_str(&escape(v));
        text.push('/');
    }

    let text_start = FCS_HEADER_SIZE;
    let text_end = text_start + text.len() - 1;
    let data_start = text_end + 1;
    let data_end = data_start + data.len().max(1) - 1;

    let mut buf = Vec::with_capacity(data_end + 1);
    buf.extend_from_slice(b"FCS3.1    ");
    for offset in [text_start, text_end, data_start, data_end, 0, 0] {
        buf.extend_from_slice(format!("{offset:>8}").as_bytes());
    }
    assert_eq!(buf.len(), FCS_HEADER_SIZE);
    buf.extend_from_slice(text.as_bytes());
    buf.extend_from_slice(data);
    buf
}

fn base_keywords(channels: &[&str], events: usize, datatype: &str, byteord: &str) -> Vec<(String, String)> {
    let mut kw = vec![
        ("$PAR".to_string(), channels.len().to_string()),
        ("$TOT".to_string(), events.to_string()),
        ("$DATATYPE".to_string(), datatype.to_string()),
        ("$BYTEORD".to_string(), byteord.to_string()),
        ("$MODE".to_string(), "L".to_string()),
    ];
    for (i, name) in channels.iter().enumerate() {
        kw.push((format!("$P{}N", i + 1), name.to_string()));
    }
    kw
}

/// Little-endian float32 list-mode file. `rows[e][c]` is event `e`, channel `c`.
pub fn build_float_fcs(channels: &[&str], rows: &[Vec<f32>]) -> Vec<u8> {
    let mut kw = base_keywords(channels, rows.len(), "F", "1,2,3,4");
    for i in 0..channels.len() {
        kw.push((format!("$P{}B", i + 1), "32".to_string()));
        kw.push((format!("$P{}R", i + 1), "262144".to_string()));
    }
    let mut data = Vec::new();
    for row in rows {
        for v in row {
            data.extend_from_slice(&v.to_le_bytes());
        }
    }
    assemble_fcs(&kw, &data)
}

/// Big-endian 16-bit integer file with per-channel `$PnR` and optional
/// `$PnE` / `$PnG` keywords appended by the caller.
pub fn build_int16_fcs(
    channels: &[&str],
    ranges: &[u32],
    rows: &[Vec<u16>],
    extra: &[(String, String)],
) -> Vec<u8> {
    let mut kw = base_keywords(channels, rows.len(), "I", "4,3,2,1");
    for (i, range) in ranges.iter().enumerate() {
        kw.push((format!("$P{}B", i + 1), "16".to_string()));
        kw.push((format!("$P{}R", i + 1), range.to_string()));
    }
    kw.extend_from_slice(extra);
    let mut data = Vec::new();
    for row in rows {
        for v in row {
            data.extend_from_slice(&v.to_be_bytes());
        }
    }
    assemble_fcs(&kw, &data)
}

pub fn write_temp_fcs(bytes: &[u8]) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".fcs").tempfile().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}

/// Deterministic scatter: FSC and SSC spread over 0..1000 by coprime strides,
/// Time counts up. Every channel has `n` events.
pub fn scatter_dataset(n: usize) -> Dataset {
    let fsc: Vec<f64> = (0..n).map(|i| ((i * 37) % 1000) as f64).collect();
    let ssc: Vec<f64> = (0..n).map(|i| ((i * 91 + 13) % 1000) as f64).collect();
    let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
    Dataset::new(
        "synthetic.fcs",
        vec!["FSC".into(), "SSC".into(), "Time".into()],
        vec![fsc, ssc, time],
        DatasetMetadata::default(),
    )
    .unwrap()
}

/// Dataset with explicit columns, channel names `A`, `B`, ...
pub fn columns_dataset(columns: Vec<Vec<f64>>) -> Dataset {
    let names = (0..columns.len())
        .map(|i| ((b'A' + i as u8) as char).to_string())
        .collect();
    Dataset::new("columns.fcs", names, columns, DatasetMetadata::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Session drivers: run jobs inline against the local backend
// ---------------------------------------------------------------------------

pub fn run_points(session: &mut Session, job: PointsJob) {
    let dataset = session.dataset().cloned().expect("dataset loaded");
    let result = LocalBackend.data_points(&dataset, &job.pair);
    session.apply_points(job.token, job.pair, result);
}

pub fn run_classification(session: &mut Session, job: ClassificationJob) {
    let result = LocalBackend.classify_polygon(&job.request.polygon, &job.request.points);
    session.apply_classification(job.token, result);
}

pub fn run_intersection(session: &mut Session, job: IntersectionJob) {
    let result = LocalBackend.intersect_filters(&job.slots);
    session.apply_intersection(job.revision, result);
}

/// Session with `dataset` loaded, the first pair fetched and an 800x600 canvas.
pub fn loaded_session(dataset: Dataset) -> Session {
    let mut session = Session::new();
    session.set_canvas_size(800.0, 600.0);
    if let Some(job) = session.load_dataset(dataset) {
        run_points(&mut session, job);
    }
    session
}

/// Drag a primary-button lasso through `vertices` and release.
pub fn draw_lasso(session: &mut Session, vertices: &[(f64, f64)]) -> Option<ClassificationJob> {
    let mut iter = vertices.iter();
    if let Some(&(x, y)) = iter.next() {
        session.pointer_pressed(PointerButton::Primary, ScreenPoint::new(x, y));
    }
    for &(x, y) in iter {
        session.pointer_moved(ScreenPoint::new(x, y));
    }
    session.pointer_released(PointerButton::Primary)
}
