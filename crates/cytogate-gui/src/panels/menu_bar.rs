use crate::app::CytogateApp;

use super::{export_file_dialog, open_file_dialog};

pub fn show(ctx: &egui::Context, app: &mut CytogateApp) {
    let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
    let export_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
    let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .add(egui::Button::new("Open...").shortcut_text(ctx.format_shortcut(&open_shortcut)))
                    .clicked()
                {
                    ui.close();
                    open_file_dialog(app);
                }

                let can_export = app.session.dataset().is_some() && !app.ui_state.is_busy();
                if ui
                    .add_enabled(
                        can_export,
                        egui::Button::new("Export...").shortcut_text(ctx.format_shortcut(&export_shortcut)),
                    )
                    .clicked()
                {
                    ui.close();
                    export_file_dialog(app, ctx);
                }

                ui.separator();

                if ui
                    .add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut)))
                    .clicked()
                {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Zoom In").clicked() {
                    ui.close();
                    app.session.zoom_in();
                }
                if ui.button("Zoom Out").clicked() {
                    ui.close();
                    app.session.zoom_out();
                }
                if ui.button("Reset View").clicked() {
                    ui.close();
                    app.session.reset_view();
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.ui_state.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&open_shortcut)) {
            open_file_dialog(app);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&export_shortcut)) && !app.ui_state.is_busy() {
            export_file_dialog(app, ctx);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&quit_shortcut)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
