use std::path::Path;
use std::sync::Arc;

use crate::dataset::{ChannelPair, Dataset};
use crate::error::Result;
use crate::geom::Point;
use crate::io::ExportFormat;
use crate::selection::Classification;

use super::local::LocalBackend;

/// The session's collaborators: file loading, point-in-polygon
/// classification, filter intersection and export.
///
/// Calls may run on a worker thread, so implementations must be shareable.
pub trait GateBackend: Send + Sync {
    fn name(&self) -> &str;

    fn load_dataset(&self, path: &Path) -> Result<Dataset>;

    /// One point per event, in event order.
    fn data_points(&self, dataset: &Dataset, pair: &ChannelPair) -> Result<Vec<Point>>;

    /// Indices of `points` inside `vertices`. Both are in the same axis space.
    fn classify_polygon(&self, vertices: &[Point], points: &[Point]) -> Result<Classification>;

    fn intersect_filters(&self, slots: &[Vec<usize>]) -> Result<Vec<usize>>;

    fn export_selection(
        &self,
        dataset: &Dataset,
        indices: &[usize],
        output: &Path,
        format: ExportFormat,
    ) -> Result<()>;
}

/// Backend used by the binaries.
pub fn create_backend() -> Arc<dyn GateBackend> {
    Arc::new(LocalBackend)
}
