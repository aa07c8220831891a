use crate::app::CytogateApp;
use crate::panels::open_file_dialog;

pub(super) fn dataset_section(ui: &mut egui::Ui, app: &mut CytogateApp) {
    super::section_header(ui, "Dataset", None);
    ui.add_space(4.0);

    if ui
        .add_enabled(!app.ui_state.is_busy(), egui::Button::new("Open..."))
        .clicked()
    {
        open_file_dialog(app);
    }

    let Some(dataset) = app.session.dataset() else {
        ui.small("No file loaded");
        return;
    };

    ui.label(
        dataset
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
    );
    ui.small(format!(
        "{} events, {} channels",
        dataset.event_count(),
        dataset.channel_count()
    ));

    let text = &dataset.metadata().text;
    for key in ["$CYT", "$DATE"] {
        if let Some(value) = text.get(key) {
            ui.small(format!("{}: {}", key.trim_start_matches('$'), value.trim()));
        }
    }
}
