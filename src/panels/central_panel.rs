use egui::{pos2, vec2, Color32, Rect, Sense};

use crate::PaintApp;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::both().show(ui, |ui| {
            let size = vec2(app.surface.width() as f32, app.surface.height() as f32);
            let (canvas_rect, response) = ui.allocate_exact_size(size, Sense::drag());

            // Route pointer input through the session before drawing the
            // canvas so this frame's strokes are visible immediately
            for event in app.input.process_input(&response, canvas_rect) {
                app.session.handle_event(&mut app.surface, event);
            }

            let texture_id = app.texture.texture_id(ctx, &app.surface);
            ui.painter().image(
                texture_id,
                canvas_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        });
    });
}
