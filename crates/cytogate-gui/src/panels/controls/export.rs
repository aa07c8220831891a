use cytogate_core::io::ExportFormat;

use crate::app::CytogateApp;
use crate::panels::export_file_dialog;

pub(super) fn export_section(ui: &mut egui::Ui, ctx: &egui::Context, app: &mut CytogateApp) {
    super::section_header(ui, "Export", None);
    ui.add_space(4.0);

    let current = &mut app.ui_state.export_format;
    egui::ComboBox::from_label("Format")
        .selected_text(current.to_string())
        .show_ui(ui, |ui| {
            for format in ExportFormat::ALL.into_iter().filter(|f| f.is_available()) {
                ui.selectable_value(current, format, format.to_string());
            }
        });

    let enabled = app.session.dataset().is_some() && !app.ui_state.is_busy();
    if ui
        .add_enabled(enabled, egui::Button::new("Export..."))
        .clicked()
    {
        export_file_dialog(app, ctx);
    }
    ui.small("Exports events passing all filters, or the current selection.");
}
