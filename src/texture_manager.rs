use egui::{Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::ImageSurface;

/// Keeps the GPU copy of the painting surface in sync with its pixels
#[derive(Default)]
pub struct CanvasTexture {
    handle: Option<TextureHandle>,
    /// Surface version the texture was last uploaded from
    uploaded_version: Option<u64>,
}

impl CanvasTexture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the texture for `surface`, uploading pixels only if they changed
    pub fn texture_id(&mut self, ctx: &Context, surface: &ImageSurface) -> TextureId {
        let version = surface.version();
        match &mut self.handle {
            Some(handle) if self.uploaded_version == Some(version) => return handle.id(),
            Some(handle) => handle.set(surface.to_color_image(), TextureOptions::NEAREST),
            None => {
                self.handle = Some(ctx.load_texture(
                    "painting_surface",
                    surface.to_color_image(),
                    TextureOptions::NEAREST,
                ));
            }
        }
        self.uploaded_version = Some(version);
        log::trace!("Uploaded surface texture v{}", version);
        self.handle.as_ref().map(|h| h.id()).unwrap_or_default()
    }

    /// Force a re-upload on the next frame
    pub fn invalidate(&mut self) {
        self.uploaded_version = None;
    }
}
