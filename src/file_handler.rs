use eframe::egui;

use crate::error::PaintResult;
use crate::surface::ImageSurface;

/// Loads images dropped onto the window as the new base layer
#[derive(Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick up newly dropped files from the UI context.
    /// Returns true if any were dropped this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                false
            } else {
                self.dropped_files = i.raw.dropped_files.clone();
                true
            }
        })
    }

    /// Load the first dropped image into `surface`. Later images in the same
    /// drop would replace it immediately, so they are skipped.
    pub fn process_dropped_files(&mut self, surface: &mut ImageSurface) -> PaintResult<bool> {
        for file in std::mem::take(&mut self.dropped_files) {
            let file_name = file_display_name(&file);
            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", file_name);
                continue;
            }

            if let Some(bytes) = &file.bytes {
                log::info!("Processing image from memory: {} ({} bytes)", file_name, bytes.len());
                surface.load_from_bytes(bytes)?;
                return Ok(true);
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                if let Some(path) = &file.path {
                    log::info!("Processing image from path: {}", path.display());
                    surface.load_from_path(path)?;
                    return Ok(true);
                }
            }

            log::warn!("Dropped file has no accessible data: {}", file_name);
        }
        Ok(false)
    }

    /// Dim the window while files are hovering over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            "Drop an image to open it",
            TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

/// Extensions offered by the open dialog and accepted from drops
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Ask the user for an image to open
#[cfg(not(target_arch = "wasm32"))]
pub fn pick_image_file() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

/// Hand `bytes` to the browser as a file download named `file_name`
#[cfg(target_arch = "wasm32")]
pub fn download_bytes(bytes: &[u8], file_name: &str, mime: &str) -> Result<(), eframe::wasm_bindgen::JsValue> {
    use eframe::wasm_bindgen::JsCast as _;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or("no document to attach the download to")?;

    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(mime);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    web_sys::Url::revoke_object_url(&url)
}

fn file_display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = match &file.path {
        Some(path) => path.to_string_lossy().to_string(),
        None => file.name.clone(),
    };
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped(name: &str, mime: &str) -> egui::DroppedFile {
        egui::DroppedFile {
            name: name.to_owned(),
            mime: mime.to_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_detection_by_mime_and_extension() {
        assert!(is_image_file(&dropped("whatever", "image/png")));
        assert!(!is_image_file(&dropped("photo.png", "text/plain")));
        assert!(is_image_file(&dropped("photo.JPG", "")));
        assert!(!is_image_file(&dropped("notes.txt", "")));
        assert!(!is_image_file(&dropped("no_extension", "")));
    }
}
