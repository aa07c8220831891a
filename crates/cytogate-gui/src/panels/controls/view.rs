use cytogate_core::session::Axis;

use crate::app::CytogateApp;

pub(super) fn view_section(ui: &mut egui::Ui, app: &mut CytogateApp) {
    let zoom = format!("{:.0}%", app.session.view().zoom * 100.0);
    super::section_header(ui, "View", Some(&zoom));
    ui.add_space(4.0);

    let view = app.session.view();
    let mut log_x = view.x_scale.is_log();
    let mut log_y = view.y_scale.is_log();
    ui.horizontal(|ui| {
        if ui.checkbox(&mut log_x, "Log X").changed() {
            app.session.toggle_scale(Axis::X);
        }
        if ui.checkbox(&mut log_y, "Log Y").changed() {
            app.session.toggle_scale(Axis::Y);
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Zoom +").clicked() {
            app.session.zoom_in();
        }
        if ui.button("Zoom -").clicked() {
            app.session.zoom_out();
        }
        if ui.button("Reset").clicked() {
            app.session.reset_view();
        }
    });

    ui.small("Left drag: lasso. Right drag: pan. Wheel: zoom.");
}
