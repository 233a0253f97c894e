use egui::Color32;
use image::RgbaImage;

use crate::input::Position;

mod image_surface;
mod recording;
mod text;

pub use image_surface::ImageSurface;
pub use recording::{Primitive, RecordingSurface};

/// How newly drawn pixels combine with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Source-over: paint on top of what is there
    #[default]
    Normal,
    /// Destination-out: remove coverage from what is there
    Erase,
}

/// Shape drawn at the open ends of a stroke segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

/// Mutable paint state shared by every tool drawing on a surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintState {
    /// Stroke width in pixels
    pub width: f32,
    /// Used as both the fill and the stroke color
    pub color: Color32,
    pub composite: CompositeMode,
    pub line_cap: LineCap,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color32::BLACK,
            composite: CompositeMode::Normal,
            line_cap: LineCap::Butt,
        }
    }
}

/// An opaque raster target that tools issue draw primitives against.
///
/// Primitives are fire-and-forget: coordinates outside the surface are clipped
/// by the implementation and nothing is reported back to the caller. Every
/// primitive reads the paint state current at the time it is issued.
pub trait RasterSurface {
    fn paint(&self) -> &PaintState;

    fn paint_mut(&mut self) -> &mut PaintState;

    /// Stroke a straight segment using the current width, color, compositing
    /// mode and line cap.
    fn stroke_segment(&mut self, from: Position, to: Position);

    /// Fill the rectangle `[x, x + width) x [y, y + height)` with the current color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Fill `text` with its alphabetic baseline starting at `at`.
    fn fill_text(&mut self, text: &str, at: Position, font_size: f32);

    /// Replace the surface contents with `image`, adopting its dimensions.
    /// The paint state survives the blit.
    fn blit_image(&mut self, image: &RgbaImage);
}
