use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::ChannelPair;
use crate::error::{GateError, Result};
use crate::geom::Point;
use crate::io::{export_metadata_json, resolve_output_path, ExportFormat};
use crate::selection::{FilterIntersection, FilterStore};
use crate::service::GateBackend;
use crate::view::AxisScale;

/// Batch gating job: load a file, apply polygon gates, export what passes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Taken from the output extension when omitted.
    #[serde(default)]
    pub format: Option<ExportFormat>,
    /// Also write `<output>_metadata.json`.
    #[serde(default)]
    pub export_metadata: bool,
    #[serde(default, rename = "gate")]
    pub gates: Vec<GateSpec>,
}

/// One polygon gate. Vertices are data values; with a log scale the polygon
/// is straight-sided in log space, as if drawn on a log plot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GateSpec {
    pub x: String,
    pub y: String,
    #[serde(default)]
    pub x_scale: AxisScale,
    #[serde(default)]
    pub y_scale: AxisScale,
    pub polygon: Vec<[f64; 2]>,
}

impl GateSpec {
    pub fn pair(&self) -> ChannelPair {
        ChannelPair::new(self.x.clone(), self.y.clone())
    }
}

impl GateConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GateError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GateError::InvalidConfig(e.to_string()))
    }

    /// Example config written by `cytogate config`.
    pub fn sample() -> Self {
        Self {
            input: PathBuf::from("sample.fcs"),
            output: PathBuf::from("gated.csv"),
            format: None,
            export_metadata: true,
            gates: vec![
                GateSpec {
                    x: "FSC-A".into(),
                    y: "SSC-A".into(),
                    x_scale: AxisScale::Linear,
                    y_scale: AxisScale::Linear,
                    polygon: vec![
                        [10_000.0, 5_000.0],
                        [200_000.0, 5_000.0],
                        [200_000.0, 150_000.0],
                        [10_000.0, 150_000.0],
                    ],
                },
                GateSpec {
                    x: "FITC-A".into(),
                    y: "PE-A".into(),
                    x_scale: AxisScale::Log10,
                    y_scale: AxisScale::Log10,
                    polygon: vec![[100.0, 10.0], [10_000.0, 10.0], [10_000.0, 1_000.0]],
                },
            ],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.gates.is_empty() {
            return Err(GateError::InvalidConfig("no [[gate]] entries".into()));
        }
        for (i, gate) in self.gates.iter().enumerate() {
            if gate.polygon.len() < 3 {
                return Err(GateError::InvalidConfig(format!(
                    "gate {} ({}) needs at least 3 vertices, got {}",
                    i + 1,
                    gate.pair(),
                    gate.polygon.len()
                )));
            }
        }
        Ok(())
    }
}

/// Stage of a batch gating run, for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateStage {
    Loading,
    Gating,
    Combining,
    Exporting,
}

impl fmt::Display for GateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading file"),
            Self::Gating => write!(f, "Applying gates"),
            Self::Combining => write!(f, "Combining gates"),
            Self::Exporting => write!(f, "Writing output"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GateOutcome {
    pub pair: ChannelPair,
    pub inside: usize,
}

#[derive(Clone, Debug)]
pub struct GateReport {
    pub total: usize,
    pub gates: Vec<GateOutcome>,
    pub passing: usize,
    pub output: PathBuf,
    pub format: ExportFormat,
    pub metadata: Option<PathBuf>,
}

/// Run a gate config end to end.
///
/// Each gate is classified in its own axis space and saved into a
/// [`FilterStore`] keyed by channel pair, so a later gate on the same pair
/// replaces an earlier one. The exported events are those passing every gate.
pub fn run_gates<F>(config: &GateConfig, backend: &dyn GateBackend, mut on_progress: F) -> Result<GateReport>
where
    F: FnMut(GateStage, f32),
{
    config.validate()?;

    on_progress(GateStage::Loading, 0.0);
    let dataset = backend.load_dataset(&config.input)?;
    let total = dataset.event_count();

    let mut store = FilterStore::new();
    let mut gates = Vec::with_capacity(config.gates.len());
    for (i, gate) in config.gates.iter().enumerate() {
        on_progress(GateStage::Gating, i as f32 / config.gates.len() as f32);
        let pair = gate.pair();
        let points = backend.data_points(&dataset, &pair)?;

        let to_axis = |p: Point| -> Option<Point> {
            Some(Point::new(gate.x_scale.to_axis(p.x)?, gate.y_scale.to_axis(p.y)?))
        };
        let polygon: Vec<Point> = gate
            .polygon
            .iter()
            .filter_map(|&[x, y]| to_axis(Point::new(x, y)))
            .collect();
        if polygon.len() < 3 {
            return Err(GateError::InvalidConfig(format!(
                "gate {pair} has fewer than 3 vertices representable on its axes"
            )));
        }
        let axis_points: Vec<Point> = points
            .iter()
            .map(|&p| to_axis(p).unwrap_or(Point::UNMAPPED))
            .collect();

        let classification = backend.classify_polygon(&polygon, &axis_points)?;
        info!(pair = %pair, inside = classification.count, total, "Gate applied");
        gates.push(GateOutcome {
            pair: pair.clone(),
            inside: classification.count,
        });
        store.save_selection(&pair, classification.indices);
    }

    on_progress(GateStage::Combining, 0.0);
    let passing = match store.intersection() {
        FilterIntersection::Inactive => (0..total).collect(),
        FilterIntersection::Active(_) => backend.intersect_filters(&store.slot_indices())?,
    };

    on_progress(GateStage::Exporting, 0.0);
    let (output, format) = resolve_output_path(&config.output, config.format);
    backend.export_selection(&dataset, &passing, &output, format)?;
    let metadata = if config.export_metadata {
        Some(export_metadata_json(dataset.metadata(), &output)?)
    } else {
        None
    };
    on_progress(GateStage::Exporting, 1.0);

    Ok(GateReport {
        total,
        gates,
        passing: passing.len(),
        output,
        format,
        metadata,
    })
}
