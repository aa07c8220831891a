mod channels;
mod dataset;
mod export;
mod filters;
mod view;

use super::section_header;

const LEFT_PANEL_WIDTH: f32 = 260.0;

pub fn show(ctx: &egui::Context, app: &mut crate::app::CytogateApp) {
    egui::SidePanel::left("controls")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                dataset::dataset_section(ui, app);
                ui.separator();
                channels::channel_section(ui, app);
                ui.separator();
                view::view_section(ui, app);
                ui.separator();
                filters::filter_section(ui, app);
                ui.separator();
                export::export_section(ui, ctx, app);
            });
        });
}
