use cytogate_core::geom::ScreenPoint;
use cytogate_core::render::{DrawCommand, LabelAnchor, PointStyle, Scene};
use cytogate_core::selection::PointerButton;
use cytogate_core::view::ZoomDirection;

use crate::app::CytogateApp;

const POINT_SIZE: f32 = 2.0;
const LABEL_FONT_SIZE: f32 = 11.0;
const LABEL_OFFSET: f32 = 4.0;

const BACKGROUND: egui::Color32 = egui::Color32::from_gray(30);
const GRID: egui::Color32 = egui::Color32::from_gray(55);
const AXIS: egui::Color32 = egui::Color32::from_gray(180);
const LABEL: egui::Color32 = egui::Color32::from_gray(200);
const EXCLUDED: egui::Color32 = egui::Color32::from_gray(85);
const DEFAULT_POINT: egui::Color32 = egui::Color32::from_rgb(90, 160, 230);
const SELECTED_POINT: egui::Color32 = egui::Color32::from_rgb(240, 120, 60);
const LASSO: egui::Color32 = egui::Color32::from_rgb(250, 220, 80);

pub fn show(ctx: &egui::Context, app: &mut CytogateApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        ui.painter().rect_filled(rect, 0.0, BACKGROUND);

        if app.session.dataset().is_none() {
            show_placeholder(ui);
            return;
        }

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        app.session
            .set_canvas_size(f64::from(rect.width()), f64::from(rect.height()));

        handle_input(ui, &response, app, rect);

        let scene = app.session.render();
        paint_scene(&ui.painter_at(rect), rect, &scene);
    });
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an FCS file to begin (File > Open)")
                .size(16.0)
                .color(egui::Color32::from_gray(120)),
        );
    });
}

fn to_screen(pos: egui::Pos2, rect: egui::Rect) -> ScreenPoint {
    ScreenPoint::new(f64::from(pos.x - rect.min.x), f64::from(pos.y - rect.min.y))
}

fn to_pos(p: &ScreenPoint, rect: egui::Rect) -> egui::Pos2 {
    egui::pos2(rect.min.x + p.x as f32, rect.min.y + p.y as f32)
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Feed raw pointer events to the session in arrival order, so fast strokes
/// keep every intermediate vertex.
fn handle_input(ui: &egui::Ui, response: &egui::Response, app: &mut CytogateApp, rect: egui::Rect) {
    let events = ui.input(|i| i.events.clone());
    for event in events {
        match event {
            egui::Event::PointerMoved(pos) => {
                app.session.pointer_moved(to_screen(pos, rect));
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let Some(button) = map_button(button) else {
                    continue;
                };
                if pressed {
                    if rect.contains(pos) && response.hovered() {
                        app.session.pointer_pressed(button, to_screen(pos, rect));
                    }
                } else {
                    let job = app.session.pointer_released(button);
                    app.classify(job);
                }
            }
            egui::Event::MouseWheel { delta, .. } if response.hovered() => {
                let Some(pos) = ui.input(|i| i.pointer.hover_pos()) else {
                    continue;
                };
                let direction = if delta.y > 0.0 {
                    ZoomDirection::In
                } else if delta.y < 0.0 {
                    ZoomDirection::Out
                } else {
                    continue;
                };
                app.session.zoom_at(to_screen(pos, rect), direction);
            }
            _ => {}
        }
    }

    if response.hovered() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.session.clear_selection();
    }
}

fn paint_scene(painter: &egui::Painter, rect: egui::Rect, scene: &Scene) {
    for command in &scene.commands {
        match command {
            DrawCommand::GridLine { from, to } => {
                painter.line_segment(
                    [to_pos(from, rect), to_pos(to, rect)],
                    egui::Stroke::new(1.0, GRID),
                );
            }
            DrawCommand::Axis { from, to } => {
                painter.line_segment(
                    [to_pos(from, rect), to_pos(to, rect)],
                    egui::Stroke::new(1.5, AXIS),
                );
            }
            DrawCommand::Points { style, positions } => {
                let color = match style {
                    PointStyle::Excluded => EXCLUDED,
                    PointStyle::Default => DEFAULT_POINT,
                    PointStyle::Selected => SELECTED_POINT,
                };
                paint_points(painter, rect, positions, color);
            }
            DrawCommand::Lasso { points, closed } => {
                let points: Vec<egui::Pos2> = points.iter().map(|p| to_pos(p, rect)).collect();
                let stroke = egui::Stroke::new(1.5, LASSO);
                if *closed {
                    painter.add(egui::Shape::closed_line(points, stroke));
                } else {
                    painter.add(egui::Shape::line(points, stroke));
                }
            }
            DrawCommand::Label { pos, text, anchor } => {
                let (offset, align) = match anchor {
                    LabelAnchor::Below => (egui::vec2(0.0, LABEL_OFFSET), egui::Align2::CENTER_TOP),
                    LabelAnchor::Left => (egui::vec2(-LABEL_OFFSET, 0.0), egui::Align2::RIGHT_CENTER),
                };
                painter.text(
                    to_pos(pos, rect) + offset,
                    align,
                    text,
                    egui::FontId::proportional(LABEL_FONT_SIZE),
                    LABEL,
                );
            }
        }
    }
}

/// One mesh per style; a shape per point is far too slow for large files.
fn paint_points(painter: &egui::Painter, rect: egui::Rect, positions: &[ScreenPoint], color: egui::Color32) {
    if positions.is_empty() {
        return;
    }
    let size = egui::vec2(POINT_SIZE, POINT_SIZE);
    let mut mesh = egui::Mesh::default();
    mesh.reserve_triangles(positions.len() * 2);
    mesh.reserve_vertices(positions.len() * 4);
    for p in positions {
        mesh.add_colored_rect(egui::Rect::from_center_size(to_pos(p, rect), size), color);
    }
    painter.add(egui::Shape::mesh(mesh));
}
