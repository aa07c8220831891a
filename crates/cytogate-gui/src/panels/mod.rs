pub mod controls;
pub mod menu_bar;
pub mod plot;
pub mod status;

use crate::app::CytogateApp;
use crate::messages::{WorkerCommand, WorkerResult};

/// Pick an FCS file on a helper thread and hand it straight to the worker.
pub(crate) fn open_file_dialog(app: &CytogateApp) {
    let cmd_tx = app.cmd_tx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("FCS files", &["fcs", "lmd"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            let _ = cmd_tx.send(WorkerCommand::LoadDataset { path });
        }
    });
}

/// Ask for an export destination. The chosen path comes back through the
/// result channel so the export indices are taken on the UI thread.
pub(crate) fn export_file_dialog(app: &mut CytogateApp, ctx: &egui::Context) {
    let Some(dataset) = app.session.dataset() else {
        app.ui_state.add_log("Warning: No dataset loaded".into());
        return;
    };
    let format = app.ui_state.export_format;
    let stem = dataset
        .path()
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "events".to_string());
    let file_name = format!("{stem}_gated.{}", format.extension());

    let result_tx = app.result_tx.clone();
    let ctx = ctx.clone();
    std::thread::spawn(move || {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(format.to_string(), &[format.extension()])
            .set_file_name(file_name)
            .save_file()
        {
            let _ = result_tx.send(WorkerResult::ExportTargetChosen { path });
            ctx.request_repaint();
        }
    });
}

pub(crate) fn section_header(ui: &mut egui::Ui, label: &str, status: Option<&str>) {
    ui.horizontal(|ui| {
        ui.strong(label);
        if let Some(s) = status {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.small(s);
            });
        }
    });
}
