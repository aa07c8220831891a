use crate::app::CytogateApp;

pub fn show(ctx: &egui::Context, app: &mut CytogateApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        if let Some(label) = app.ui_state.running {
            ui.add(
                egui::ProgressBar::new(0.0)
                    .text(format!("{label}..."))
                    .animate(true),
            );
        } else {
            // Same height as the running bar so the layout does not jump.
            ui.add(egui::ProgressBar::new(0.0).text(""));
        }

        // Log area: fixed height for 4 lines, scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        ui.horizontal(|ui| {
            let session = &app.session;
            if let Some(dataset) = session.dataset() {
                ui.label(format!("{} events", dataset.event_count()));
                ui.separator();
            }
            if let Some(pair) = session.pair() {
                ui.label(pair.to_string());
                ui.separator();
            }
            ui.label(format!("Zoom: {:.0}%", session.view().zoom * 100.0));
            if session.is_waiting() {
                ui.separator();
                ui.spinner();
            }
        });

        ui.add_space(2.0);
    });
}
