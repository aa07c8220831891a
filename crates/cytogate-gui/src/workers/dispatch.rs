use std::sync::mpsc;

use cytogate_core::service::create_backend;
use tracing::{debug, info};

use crate::messages::{WorkerCommand, WorkerResult};

use super::{gating, io};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> std::io::Result<mpsc::Sender<WorkerCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cytogate-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })?;

    Ok(cmd_tx)
}

pub(crate) fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

/// Commands run strictly in arrival order. Responses that the session has
/// moved past are still computed; the session drops them on arrival.
fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    let backend = create_backend();
    info!(backend = backend.name(), "Worker started");

    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadDataset { path } => {
                io::handle_load(backend.as_ref(), &tx, &ctx, path);
            }
            WorkerCommand::FetchPoints { dataset, job } => {
                io::handle_fetch_points(backend.as_ref(), &tx, &ctx, &dataset, job);
            }
            WorkerCommand::Classify { job } => {
                gating::handle_classify(backend.as_ref(), &tx, &ctx, job);
            }
            WorkerCommand::Intersect { job } => {
                gating::handle_intersect(backend.as_ref(), &tx, &ctx, job);
            }
            WorkerCommand::Export {
                dataset,
                indices,
                path,
                format,
            } => {
                io::handle_export(backend.as_ref(), &tx, &ctx, &dataset, indices, path, format);
            }
        }
    }

    debug!("Command channel closed, worker exiting");
}
