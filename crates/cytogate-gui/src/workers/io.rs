use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use cytogate_core::dataset::Dataset;
use cytogate_core::io::ExportFormat;
use cytogate_core::service::GateBackend;
use cytogate_core::session::PointsJob;

use crate::messages::WorkerResult;

use super::send;

pub(super) fn handle_load(
    backend: &dyn GateBackend,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    path: PathBuf,
) {
    send(tx, ctx, WorkerResult::Started { label: "Loading file" });
    let start = Instant::now();
    let result = backend.load_dataset(&path);
    send(
        tx,
        ctx,
        WorkerResult::DatasetLoaded {
            path,
            result,
            elapsed: start.elapsed(),
        },
    );
}

pub(super) fn handle_fetch_points(
    backend: &dyn GateBackend,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    dataset: &Dataset,
    job: PointsJob,
) {
    let result = backend.data_points(dataset, &job.pair);
    send(
        tx,
        ctx,
        WorkerResult::PointsReady {
            token: job.token,
            pair: job.pair,
            result,
        },
    );
}

pub(super) fn handle_export(
    backend: &dyn GateBackend,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    dataset: &Dataset,
    indices: Vec<usize>,
    path: PathBuf,
    format: ExportFormat,
) {
    send(tx, ctx, WorkerResult::Started { label: "Writing output" });
    let start = Instant::now();
    let result = backend.export_selection(dataset, &indices, &path, format);
    send(
        tx,
        ctx,
        WorkerResult::Exported {
            path,
            format,
            count: indices.len(),
            result,
            elapsed: start.elapsed(),
        },
    );
}
