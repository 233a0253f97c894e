use std::time::Duration;

use crate::file_handler::FileHandler;
use crate::input::{InputHandler, Position};
use crate::panels;
use crate::session::ToolSession;
use crate::settings::CanvasSettings;
use crate::surface::{ImageSurface, RasterSurface};
use crate::texture_manager::CanvasTexture;
use crate::tools::{TextRequestQueue, ToolName, SPRAY_INTERVAL};

/// A text stamp waiting for the user to type its text
pub(crate) struct TextPrompt {
    pub at: Position,
    pub text: String,
}

pub struct PaintApp {
    pub(crate) settings: CanvasSettings,
    pub(crate) surface: ImageSurface,
    pub(crate) session: ToolSession,
    pub(crate) input: InputHandler,
    pub(crate) texture: CanvasTexture,
    pub(crate) file_handler: FileHandler,
    pub(crate) text_requests: TextRequestQueue,
    pub(crate) text_prompt: Option<TextPrompt>,
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) open_url: String,
    /// Last load/export failure, shown in the controls panel
    pub(crate) status: Option<String>,
    last_frame_time: Option<f64>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::from_settings(CanvasSettings::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: CanvasSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::from_settings(settings)
    }

    pub fn from_settings(settings: CanvasSettings) -> Self {
        let mut surface = ImageSurface::new(settings.width, settings.height);
        surface.paint_mut().width = settings.brush_size;
        surface.paint_mut().color = settings.color32();

        let mut session = ToolSession::new(&mut surface);
        session.select_tool(&mut surface, settings.tool);

        let text_requests = TextRequestQueue::new();
        session.set_text_input(text_requests.clone());

        Self {
            settings,
            surface,
            session,
            input: InputHandler::new(),
            texture: CanvasTexture::new(),
            file_handler: FileHandler::new(),
            text_requests,
            text_prompt: None,
            #[cfg(not(target_arch = "wasm32"))]
            open_url: String::new(),
            status: None,
            last_frame_time: None,
        }
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn session(&self) -> &ToolSession {
        &self.session
    }

    pub fn select_tool(&mut self, name: ToolName) {
        log::info!("Tool selected from UI: {}", name);
        self.session.select_tool(&mut self.surface, name);
        self.settings.tool = name;
    }

    pub fn set_brush_size(&mut self, size: f32) {
        self.surface.paint_mut().width = size;
        self.settings.brush_size = size;
    }

    pub fn set_color(&mut self, color: egui::Color32) {
        self.surface.paint_mut().color = color;
        self.settings.set_color32(color);
    }

    /// Replace the painting with a blank white canvas, keeping paint state
    pub fn clear_canvas(&mut self) {
        let paint = *self.surface.paint();
        self.surface = ImageSurface::new(self.settings.width, self.settings.height);
        *self.surface.paint_mut() = paint;
        self.texture.invalidate();
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_image(&mut self, path: &str) {
        self.status = self
            .surface
            .load_from_path(path)
            .err()
            .map(|err| {
                log::error!("Failed to open {}: {}", path, err);
                format!("Failed to open {path}: {err}")
            });
    }

    /// Let the user pick an image with the native file dialog
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_image_dialog(&mut self) {
        if let Some(path) = crate::file_handler::pick_image_file() {
            self.open_image(&path.to_string_lossy());
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_url(&mut self, url: &str) {
        self.status = self.surface.load_from_url(url).err().map(|err| {
            log::error!("Failed to open {}: {}", url, err);
            format!("Failed to open {url}: {err}")
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_image(&mut self) {
        let path = self.settings.export_path.clone();
        self.status = self.surface.export(&path).err().map(|err| {
            log::error!("Failed to export {}: {}", path, err);
            format!("Failed to save {path}: {err}")
        });
    }

    /// Offer the painting as a PNG download named after the export path
    #[cfg(target_arch = "wasm32")]
    pub fn export_image(&mut self) {
        let file_name = self.settings.export_path.clone();
        self.status = match self.surface.encode_png() {
            Ok(bytes) => crate::file_handler::download_bytes(&bytes, &file_name, "image/png")
                .err()
                .map(|err| {
                    log::error!("Failed to download {}: {:?}", file_name, err);
                    format!("Failed to save {file_name}")
                }),
            Err(err) => {
                log::error!("Failed to encode {}: {}", file_name, err);
                Some(format!("Failed to save {file_name}: {err}"))
            }
        };
    }

    /// Feed elapsed frame time to timed tools
    fn advance_time(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        let elapsed = self
            .last_frame_time
            .map(|last| Duration::from_secs_f64((now - last).max(0.0)))
            .unwrap_or_default();
        self.last_frame_time = Some(now);
        self.session.advance(&mut self.surface, elapsed);
    }

    fn show_text_prompt(&mut self, ctx: &egui::Context) {
        if self.text_prompt.is_none() {
            self.text_prompt = self
                .text_requests
                .pop()
                .map(|at| TextPrompt { at, text: String::new() });
        }
        let Some(prompt) = &mut self.text_prompt else {
            return;
        };

        let mut answer = None;
        egui::Window::new("text:")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut prompt.text);
                response.request_focus();
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || submitted {
                        answer = Some(Some(prompt.text.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(None);
                    }
                });
            });

        if let Some(text) = answer {
            let at = prompt.at;
            self.text_prompt = None;
            self.session
                .complete_text_request(&mut self.surface, at, text.as_deref());
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_time(ctx);

        if self.file_handler.check_for_dropped_files(ctx) {
            if let Err(err) = self.file_handler.process_dropped_files(&mut self.surface) {
                log::error!("Failed to load dropped image: {}", err);
                self.status = Some(format!("Failed to load dropped image: {err}"));
            }
        }

        panels::controls_panel(self, ctx);
        panels::central_panel(self, ctx);
        self.show_text_prompt(ctx);
        self.file_handler.preview_files_being_dropped(ctx);

        if self.session.is_animating() {
            ctx.request_repaint_after(SPRAY_INTERVAL);
        }
    }
}
