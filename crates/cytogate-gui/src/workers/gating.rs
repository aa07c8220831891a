use std::sync::mpsc;

use cytogate_core::service::GateBackend;
use cytogate_core::session::{ClassificationJob, IntersectionJob};

use crate::messages::WorkerResult;

use super::send;

pub(super) fn handle_classify(
    backend: &dyn GateBackend,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    job: ClassificationJob,
) {
    let result = backend.classify_polygon(&job.request.polygon, &job.request.points);
    send(
        tx,
        ctx,
        WorkerResult::Classified {
            token: job.token,
            result,
        },
    );
}

pub(super) fn handle_intersect(
    backend: &dyn GateBackend,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
    job: IntersectionJob,
) {
    let result = backend.intersect_filters(&job.slots);
    send(
        tx,
        ctx,
        WorkerResult::Intersected {
            revision: job.revision,
            result,
        },
    );
}
