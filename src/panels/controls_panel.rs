use crate::settings::BRUSH_SIZES;
use crate::tools::ToolName;
use crate::PaintApp;

pub fn controls_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            let active_tool = app.session.tool_name();
            ui.label("tools:");
            egui::ComboBox::from_id_salt("tool_picker")
                .selected_text(active_tool.as_str())
                .show_ui(ui, |ui| {
                    for name in ToolName::ALL {
                        if ui.selectable_label(active_tool == name, name.as_str()).clicked() {
                            app.select_tool(name);
                        }
                    }
                });

            ui.separator();
            let brush_size = app.settings.brush_size;
            ui.label("size:");
            egui::ComboBox::from_id_salt("size_picker")
                .selected_text(format!("{brush_size}"))
                .show_ui(ui, |ui| {
                    for size in BRUSH_SIZES {
                        if ui.selectable_label(brush_size == size, format!("{size}")).clicked() {
                            app.set_brush_size(size);
                        }
                    }
                });

            ui.separator();
            ui.label("color:");
            let mut color = app.settings.color32();
            if ui.color_edit_button_srgba(&mut color).changed() {
                app.set_color(color);
            }

            ui.separator();
            #[cfg(not(target_arch = "wasm32"))]
            {
                if ui.button("Open file…").clicked() {
                    app.open_image_dialog();
                }
                ui.separator();
                ui.label("open url:");
                ui.text_edit_singleline(&mut app.open_url);
                if ui.button("load").clicked() && !app.open_url.is_empty() {
                    let url = app.open_url.clone();
                    app.open_url(&url);
                }
                ui.separator();
            }

            ui.label("save as:");
            ui.text_edit_singleline(&mut app.settings.export_path);
            if ui.button("Save").clicked() {
                app.export_image();
            }

            ui.separator();
            if ui.button("Clear").clicked() {
                app.clear_canvas();
            }
        });

        if let Some(status) = &app.status {
            ui.colored_label(ui.visuals().error_fg_color, status);
        }
    });
}
