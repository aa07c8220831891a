use std::path::Path;

use tracing::debug;

use crate::dataset::{ChannelPair, Dataset};
use crate::error::{GateError, Result};
use crate::geom::Point;
use crate::io::{self, ExportFormat};
use crate::selection::{intersect_filters, Classification, RayCastClassifier};

use super::GateBackend;

/// In-process backend: memory-mapped FCS reader, Rayon ray casting.
pub struct LocalBackend;

impl GateBackend for LocalBackend {
    fn name(&self) -> &str {
        "Local/Rayon"
    }

    fn load_dataset(&self, path: &Path) -> Result<Dataset> {
        io::read_fcs(path).map_err(|e| GateError::Load {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    fn data_points(&self, dataset: &Dataset, pair: &ChannelPair) -> Result<Vec<Point>> {
        dataset.points(pair)
    }

    fn classify_polygon(&self, vertices: &[Point], points: &[Point]) -> Result<Classification> {
        let result = RayCastClassifier.classify(vertices, points);
        debug!(
            vertices = vertices.len(),
            events = points.len(),
            inside = result.count,
            "Classified polygon"
        );
        Ok(result)
    }

    fn intersect_filters(&self, slots: &[Vec<usize>]) -> Result<Vec<usize>> {
        Ok(intersect_filters(slots))
    }

    fn export_selection(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        output: &Path,
        format: ExportFormat,
    ) -> Result<()> {
        io::export_selection(dataset, indices, output, format).map_err(|e| GateError::Export {
            path: output.to_path_buf(),
            source: Box::new(e),
        })
    }
}
