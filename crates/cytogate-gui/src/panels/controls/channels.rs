use crate::app::CytogateApp;

/// Two-slot channel picker. The first pick is the X axis, the second Y.
pub(super) fn channel_section(ui: &mut egui::Ui, app: &mut CytogateApp) {
    let status = app.session.pair().map(|p| p.to_string());
    super::section_header(ui, "Channels", status.as_deref());
    ui.add_space(4.0);

    let Some(channels) = app.session.dataset().map(|d| d.channels().to_vec()) else {
        return;
    };

    let mut clicked = None;
    ui.horizontal_wrapped(|ui| {
        for channel in &channels {
            let slot = app
                .session
                .channel_selection()
                .iter()
                .position(|c| c == channel);
            let label = match slot {
                Some(0) => format!("{channel} (X)"),
                Some(_) => format!("{channel} (Y)"),
                None => channel.clone(),
            };
            if ui.selectable_label(slot.is_some(), label).clicked() {
                clicked = Some(channel.clone());
            }
        }
    });

    if let Some(channel) = clicked {
        let job = app.session.select_channel(&channel);
        app.fetch_points(job);
    }
}
