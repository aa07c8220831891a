use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use cytogate_core::io::resolve_output_path;
use cytogate_core::session::{ClassificationJob, IntersectionJob, PointsJob, Session};

use crate::messages::{WorkerCommand, WorkerResult};
use crate::panels;
use crate::states::UIState;
use crate::workers;

pub struct CytogateApp {
    pub session: Session,
    pub cmd_tx: mpsc::Sender<WorkerCommand>,
    pub result_tx: mpsc::Sender<WorkerResult>,
    pub result_rx: mpsc::Receiver<WorkerResult>,
    pub ui_state: UIState,
}

impl CytogateApp {
    pub fn new(ctx: &egui::Context) -> Result<Self> {
        let (result_tx, result_rx) = mpsc::channel();
        let cmd_tx = workers::spawn_worker(result_tx.clone(), ctx.clone())
            .context("Failed to spawn worker thread")?;

        Ok(Self {
            session: Session::new(),
            cmd_tx,
            result_tx,
            result_rx,
            ui_state: UIState::default(),
        })
    }

    pub fn send_command(&mut self, cmd: WorkerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.ui_state.running = None;
            self.ui_state.add_log("Error: worker thread has stopped".into());
        }
    }

    pub fn fetch_points(&mut self, job: Option<PointsJob>) {
        let (Some(job), Some(dataset)) = (job, self.session.dataset().cloned()) else {
            return;
        };
        self.send_command(WorkerCommand::FetchPoints { dataset, job });
    }

    pub fn classify(&mut self, job: Option<ClassificationJob>) {
        if let Some(job) = job {
            self.send_command(WorkerCommand::Classify { job });
        }
    }

    pub fn intersect(&mut self, job: Option<IntersectionJob>) {
        if let Some(job) = job {
            self.send_command(WorkerCommand::Intersect { job });
        }
    }

    /// Export the combined filter (or the current selection) to `path`,
    /// appending the chosen format's extension when missing.
    fn export_to(&mut self, path: PathBuf) {
        let Some(dataset) = self.session.dataset().cloned() else {
            return;
        };
        let Some(indices) = self.session.export_indices() else {
            return;
        };
        let (path, format) = resolve_output_path(&path, Some(self.ui_state.export_format));
        self.send_command(WorkerCommand::Export {
            dataset,
            indices,
            path,
            format,
        });
    }

    /// Drain all pending results from the worker.
    fn poll_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                WorkerResult::Started { label } => {
                    self.ui_state.running = Some(label);
                }
                WorkerResult::ExportTargetChosen { path } => self.export_to(path),
                WorkerResult::DatasetLoaded {
                    path,
                    result,
                    elapsed,
                } => {
                    self.ui_state.running = None;
                    match result {
                        Ok(dataset) => {
                            self.ui_state.add_log(format!(
                                "Read {} in {}",
                                path.display(),
                                format_duration(elapsed)
                            ));
                            let job = self.session.load_dataset(dataset);
                            self.fetch_points(job);
                        }
                        Err(e) => self.ui_state.add_log(format!("Error: {e}")),
                    }
                }
                WorkerResult::PointsReady {
                    token,
                    pair,
                    result,
                } => {
                    self.session.apply_points(token, pair, result);
                }
                WorkerResult::Classified { token, result } => {
                    self.session.apply_classification(token, result);
                }
                WorkerResult::Intersected { revision, result } => {
                    self.session.apply_intersection(revision, result);
                }
                WorkerResult::Exported {
                    path,
                    format,
                    count,
                    result,
                    elapsed,
                } => {
                    self.ui_state.running = None;
                    match result {
                        Ok(()) => self.ui_state.add_log(format!(
                            "Exported {count} events as {format} to {} in {}",
                            path.display(),
                            format_duration(elapsed)
                        )),
                        Err(e) => self.ui_state.add_log(format!("Error: {e}")),
                    }
                }
            }
        }
    }

    fn drain_notices(&mut self) {
        for notice in self.session.drain_notices() {
            let line = if notice.is_warning() {
                format!("Warning: {}", notice.text())
            } else {
                notice.text().to_string()
            };
            self.ui_state.add_log(line);
        }
    }
}

impl eframe::App for CytogateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_results();

        panels::menu_bar::show(ctx, self);
        panels::status::show(ctx, self);
        panels::controls::show(ctx, self);
        panels::plot::show(ctx, self);

        self.drain_notices();

        if self.ui_state.show_about {
            egui::Window::new("About Cytogate")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Cytogate");
                        ui.label("Flow Cytometry Gating");
                        ui.add_space(8.0);
                        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                        ui.add_space(8.0);
                        if ui.button("Close").clicked() {
                            self.ui_state.show_about = false;
                        }
                    });
                });
        }
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs_f32();
    if secs < 1.0 {
        format!("{:.0}ms", d.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = secs / 60.0;
        format!("{mins:.1}min")
    }
}
