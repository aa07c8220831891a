use crate::app::CytogateApp;

pub(super) fn filter_section(ui: &mut egui::Ui, app: &mut CytogateApp) {
    let count = app.session.filters().len();
    let status = (count > 0).then(|| format!("{count} active"));
    super::section_header(ui, "Filters", status.as_deref());
    ui.add_space(4.0);

    let has_pair = app.session.pair().is_some();
    let summary = app.session.selection_summary();
    ui.label(format!(
        "Selected: {} / {} ({:.1}%)",
        summary.selected, summary.total, summary.percent
    ));

    ui.horizontal(|ui| {
        if ui
            .add_enabled(has_pair && summary.selected > 0, egui::Button::new("Confirm"))
            .clicked()
        {
            let job = app.session.confirm_selection();
            app.intersect(job);
        }
        if ui.button("Clear").clicked() {
            app.session.clear_selection();
        }
        let has_slot = app
            .session
            .pair()
            .is_some_and(|p| app.session.filters().slot_for(p).is_some());
        if ui
            .add_enabled(has_slot, egui::Button::new("Reset filter"))
            .clicked()
        {
            let job = app.session.reset_filter();
            app.intersect(job);
        }
    });

    let mut show_excluded = app.session.show_excluded();
    if ui
        .checkbox(&mut show_excluded, "Show excluded events")
        .changed()
    {
        app.session.set_show_excluded(show_excluded);
    }

    ui.add_space(4.0);
    for slot in app.session.filters().slots() {
        ui.small(format!("{}: {} events", slot.pair, slot.indices.len()));
    }

    match app.session.filter_summary() {
        Some(summary) if summary.filters > 0 => {
            ui.label(format!(
                "Passing: {} / {} ({:.1}%)",
                summary.passing, summary.total, summary.percent
            ));
            ui.small(format!("Excluded: {}", summary.excluded));
        }
        Some(_) => {}
        None if app.session.dataset().is_some() => {
            ui.small("Filter summary unavailable");
        }
        None => {}
    }
}
