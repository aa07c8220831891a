use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cytogate_core::dataset::{ChannelPair, Dataset};
use cytogate_core::error::Result;
use cytogate_core::geom::Point;
use cytogate_core::io::ExportFormat;
use cytogate_core::selection::Classification;
use cytogate_core::session::{ClassificationJob, IntersectionJob, PointsJob, RequestToken};

/// Commands sent from UI thread to worker thread.
pub enum WorkerCommand {
    /// Read an FCS file into memory.
    LoadDataset { path: PathBuf },

    /// Extract the point cloud for a channel pair.
    FetchPoints {
        dataset: Arc<Dataset>,
        job: PointsJob,
    },

    /// Point-in-polygon test for a finished lasso.
    Classify { job: ClassificationJob },

    /// Combine the saved filters.
    Intersect { job: IntersectionJob },

    /// Write the chosen events to disk.
    Export {
        dataset: Arc<Dataset>,
        indices: Vec<usize>,
        path: PathBuf,
        format: ExportFormat,
    },
}

/// Results sent from worker thread back to UI thread.
pub enum WorkerResult {
    /// A long-running command has been picked up.
    Started { label: &'static str },

    /// The save dialog returned a destination.
    ExportTargetChosen { path: PathBuf },

    DatasetLoaded {
        path: PathBuf,
        result: Result<Dataset>,
        elapsed: Duration,
    },

    PointsReady {
        token: RequestToken,
        pair: ChannelPair,
        result: Result<Vec<Point>>,
    },

    Classified {
        token: RequestToken,
        result: Result<Classification>,
    },

    Intersected {
        revision: u64,
        result: Result<Vec<usize>>,
    },

    Exported {
        path: PathBuf,
        format: ExportFormat,
        count: usize,
        result: Result<()>,
        elapsed: Duration,
    },
}
