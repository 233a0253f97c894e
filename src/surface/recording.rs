use image::RgbaImage;

use super::{PaintState, RasterSurface};
use crate::input::Position;

/// A primitive captured by `RecordingSurface`, tagged with the paint state it
/// was issued under
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    StrokeSegment {
        from: Position,
        to: Position,
        paint: PaintState,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        paint: PaintState,
    },
    FillText {
        text: String,
        at: Position,
        font_size: f32,
        paint: PaintState,
    },
    BlitImage {
        width: u32,
        height: u32,
    },
}

/// A surface that keeps a log of primitives instead of touching pixels.
///
/// Used to drive tool sessions headlessly, and to replay a gesture later.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    paint: PaintState,
    primitives: Vec<Primitive>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Take the recorded primitives, leaving the log empty
    pub fn drain(&mut self) -> Vec<Primitive> {
        std::mem::take(&mut self.primitives)
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn stroke_segments(&self) -> impl Iterator<Item = (Position, Position, &PaintState)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::StrokeSegment { from, to, paint } => Some((*from, *to, paint)),
            _ => None,
        })
    }

    pub fn fill_rect_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::FillRect { .. }))
            .count()
    }

    /// Replay every recorded primitive onto another surface, restoring the
    /// paint state each one was recorded with.
    pub fn replay(&self, target: &mut dyn RasterSurface) {
        for primitive in &self.primitives {
            match primitive {
                Primitive::StrokeSegment { from, to, paint } => {
                    *target.paint_mut() = *paint;
                    target.stroke_segment(*from, *to);
                }
                Primitive::FillRect { x, y, width, height, paint } => {
                    *target.paint_mut() = *paint;
                    target.fill_rect(*x, *y, *width, *height);
                }
                Primitive::FillText { text, at, font_size, paint } => {
                    *target.paint_mut() = *paint;
                    target.fill_text(text, *at, *font_size);
                }
                Primitive::BlitImage { .. } => {
                    log::warn!("Skipping blit during replay: image data is not recorded");
                }
            }
        }
    }
}

impl RasterSurface for RecordingSurface {
    fn paint(&self) -> &PaintState {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut PaintState {
        &mut self.paint
    }

    fn stroke_segment(&mut self, from: Position, to: Position) {
        self.primitives.push(Primitive::StrokeSegment {
            from,
            to,
            paint: self.paint,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.primitives.push(Primitive::FillRect {
            x,
            y,
            width,
            height,
            paint: self.paint,
        });
    }

    fn fill_text(&mut self, text: &str, at: Position, font_size: f32) {
        self.primitives.push(Primitive::FillText {
            text: text.to_owned(),
            at,
            font_size,
            paint: self.paint,
        });
    }

    fn blit_image(&mut self, image: &RgbaImage) {
        self.primitives.push(Primitive::BlitImage {
            width: image.width(),
            height: image.height(),
        });
    }
}
