use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use egui::{ColorImage, Pos2};
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, Rgba, RgbaImage};

use super::text::TextRasterizer;
use super::{CompositeMode, LineCap, PaintState, RasterSurface};
use crate::error::{PaintError, PaintResult};
use crate::input::Position;

/// A raster surface backed by an RGBA pixel buffer.
///
/// Integer positions address pixel centres, so a one pixel wide segment
/// between two positions on the same row covers exactly that row.
pub struct ImageSurface {
    pixels: RgbaImage,
    paint: PaintState,
    /// Bumped on every pixel mutation
    version: u64,
    text: Option<TextRasterizer>,
}

impl std::fmt::Debug for ImageSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSurface")
            .field("width", &self.pixels.width())
            .field("height", &self.pixels.height())
            .field("paint", &self.paint)
            .field("version", &self.version)
            .finish()
    }
}

impl ImageSurface {
    /// Create a white surface with default paint state
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
            paint: PaintState::default(),
            version: 0,
            text: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Changes whenever pixels change; hosts use it to skip texture uploads
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied(
            [self.pixels.width() as usize, self.pixels.height() as usize],
            self.pixels.as_raw(),
        )
    }

    /// Decode an encoded image and make it the new base layer
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> PaintResult<()> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        log::info!("Loaded image {}x{} from memory", decoded.width(), decoded.height());
        self.blit_image(&decoded);
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> PaintResult<()> {
        let path = path.as_ref();
        let decoded = image::open(path)?.to_rgba8();
        log::info!(
            "Loaded image {}x{} from {}",
            decoded.width(),
            decoded.height(),
            path.display()
        );
        self.blit_image(&decoded);
        Ok(())
    }

    /// Fetch an encoded image over HTTP(S) and make it the new base layer
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_url(&mut self, url: &str) -> PaintResult<()> {
        log::debug!("Fetching image from {}", url);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let bytes = client.get(url).send()?.error_for_status()?.bytes()?;
        log::info!("Fetched {} bytes from {}", bytes.len(), url);
        self.load_from_bytes(&bytes)
    }

    fn non_empty_dimensions(&self) -> PaintResult<(u32, u32)> {
        let (width, height) = self.pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(PaintError::EmptyImage { width, height });
        }
        Ok((width, height))
    }

    /// Encode the surface as PNG, alpha included
    pub fn encode_png(&self) -> PaintResult<Vec<u8>> {
        let (width, height) = self.non_empty_dimensions()?;
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes).write_image(
            self.pixels.as_raw(),
            width,
            height,
            ExtendedColorType::Rgba8,
        )?;
        Ok(bytes)
    }

    /// Write a flat snapshot of the surface. The format follows the file
    /// extension; formats without alpha get the color channels only.
    pub fn export(&self, path: impl AsRef<Path>) -> PaintResult<()> {
        let path = path.as_ref();
        let (width, height) = self.non_empty_dimensions()?;

        let format = ImageFormat::from_path(path)?;
        match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgba8(self.pixels.clone())
                .to_rgb8()
                .save_with_format(path, format)?,
            _ => self.pixels.save_with_format(path, format)?,
        }
        log::info!("Exported {}x{} surface to {}", width, height, path.display());
        Ok(())
    }

    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Composite the current color into one pixel with the given coverage
    fn plot(&mut self, x: i64, y: i64, coverage: f32) {
        if x < 0 || y < 0 || x >= self.pixels.width() as i64 || y >= self.pixels.height() as i64 {
            return;
        }
        let [sr, sg, sb, sa] = self.paint.color.to_srgba_unmultiplied();
        let src_alpha = sa as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        let dst_alpha = dst.0[3] as f32 / 255.0;

        match self.paint.composite {
            CompositeMode::Normal => {
                let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
                if out_alpha <= 0.0 {
                    dst.0 = [0, 0, 0, 0];
                    return;
                }
                let blend = |s: u8, d: u8| {
                    let v = (s as f32 * src_alpha + d as f32 * dst_alpha * (1.0 - src_alpha)) / out_alpha;
                    v.round().clamp(0.0, 255.0) as u8
                };
                dst.0 = [
                    blend(sr, dst.0[0]),
                    blend(sg, dst.0[1]),
                    blend(sb, dst.0[2]),
                    (out_alpha * 255.0).round() as u8,
                ];
            }
            CompositeMode::Erase => {
                let out_alpha = dst_alpha * (1.0 - src_alpha);
                dst.0[3] = (out_alpha * 255.0).round() as u8;
            }
        }
    }

    /// Clipped pixel span `[start, end)` along one axis
    fn clip_span(start: i64, end: i64, limit: u32) -> (i64, i64) {
        (start.max(0), end.min(limit as i64))
    }
}

impl RasterSurface for ImageSurface {
    fn paint(&self) -> &PaintState {
        &self.paint
    }

    fn paint_mut(&mut self) -> &mut PaintState {
        &mut self.paint
    }

    fn stroke_segment(&mut self, from: Position, to: Position) {
        let radius = (self.paint.width / 2.0).max(0.0) as f64;
        let (ax, ay) = (from.x as f64 + 0.5, from.y as f64 + 0.5);
        let (bx, by) = (to.x as f64 + 0.5, to.y as f64 + 0.5);
        let (dx, dy) = (bx - ax, by - ay);
        let length_sq = dx * dx + dy * dy;
        let round = self.paint.line_cap == LineCap::Round;

        if length_sq == 0.0 && !round {
            return;
        }

        let (x0, x1) = Self::clip_span(
            (ax.min(bx) - radius).floor() as i64,
            (ax.max(bx) + radius).ceil() as i64 + 1,
            self.pixels.width(),
        );
        let (y0, y1) = Self::clip_span(
            (ay.min(by) - radius).floor() as i64,
            (ay.max(by) + radius).ceil() as i64 + 1,
            self.pixels.height(),
        );

        let mut touched = false;
        for py in y0..y1 {
            for px in x0..x1 {
                let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
                let t = if length_sq == 0.0 {
                    0.0
                } else {
                    ((cx - ax) * dx + (cy - ay) * dy) / length_sq
                };
                if !round && !(0.0..=1.0).contains(&t) {
                    continue;
                }
                let t = t.clamp(0.0, 1.0);
                let (nx, ny) = (ax + t * dx - cx, ay + t * dy - cy);
                if nx * nx + ny * ny <= radius * radius {
                    self.plot(px, py, 1.0);
                    touched = true;
                }
            }
        }
        if touched {
            self.touch();
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let snap = |start: f64, extent: f64| {
            let lo = start.round() as i64;
            let hi = (start + extent).round() as i64;
            (lo, hi.max(lo + 1))
        };
        let (x0, x1) = snap(x, width);
        let (y0, y1) = snap(y, height);
        let (x0, x1) = Self::clip_span(x0, x1, self.pixels.width());
        let (y0, y1) = Self::clip_span(y0, y1, self.pixels.height());
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for py in y0..y1 {
            for px in x0..x1 {
                self.plot(px, py, 1.0);
            }
        }
        self.touch();
    }

    fn fill_text(&mut self, text: &str, at: Position, font_size: f32) {
        let rasterizer = self.text.take().unwrap_or_else(TextRasterizer::new);
        let mut covered = Vec::new();
        rasterizer.rasterize(
            text,
            Pos2::new(at.x as f32, at.y as f32),
            font_size,
            |x, y, coverage| covered.push((x, y, coverage)),
        );
        self.text = Some(rasterizer);

        for &(x, y, coverage) in &covered {
            self.plot(x, y, coverage);
        }
        if !covered.is_empty() {
            self.touch();
        }
    }

    fn blit_image(&mut self, image: &RgbaImage) {
        self.pixels = image.clone();
        self.touch();
    }
}

impl Default for ImageSurface {
    fn default() -> Self {
        Self::new(800, 500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn rgba(color: Color32) -> [u8; 4] {
        color.to_srgba_unmultiplied()
    }

    #[test]
    fn test_new_surface_is_white() {
        let surface = ImageSurface::new(4, 3);
        assert_eq!(surface.pixel(0, 0), Some(WHITE));
        assert_eq!(surface.pixel(3, 2), Some(WHITE));
        assert_eq!(surface.pixel(4, 0), None);
        assert_eq!(*surface.paint(), PaintState::default());
    }

    #[test]
    fn test_one_pixel_segment_covers_single_row() {
        let mut surface = ImageSurface::new(20, 20);
        surface.stroke_segment(Position::new(2, 10), Position::new(8, 10));

        for x in 2..=8 {
            assert_eq!(surface.pixel(x, 10), Some(BLACK), "x = {x}");
        }
        assert_eq!(surface.pixel(5, 9), Some(WHITE));
        assert_eq!(surface.pixel(5, 11), Some(WHITE));
        assert_eq!(surface.pixel(9, 10), Some(WHITE));
    }

    #[test]
    fn test_round_cap_dot_for_zero_length_segment() {
        let mut surface = ImageSurface::new(20, 20);
        surface.paint_mut().width = 5.0;
        surface.paint_mut().line_cap = LineCap::Round;
        surface.stroke_segment(Position::new(10, 10), Position::new(10, 10));
        assert_eq!(surface.pixel(10, 10), Some(BLACK));
        assert_eq!(surface.pixel(12, 10), Some(BLACK));
        assert_eq!(surface.pixel(14, 10), Some(WHITE));

        let before = surface.version();
        surface.paint_mut().line_cap = LineCap::Butt;
        surface.stroke_segment(Position::new(3, 3), Position::new(3, 3));
        assert_eq!(surface.version(), before);
        assert_eq!(surface.pixel(3, 3), Some(WHITE));
    }

    #[test]
    fn test_erase_clears_alpha() {
        let mut surface = ImageSurface::new(10, 10);
        surface.paint_mut().composite = CompositeMode::Erase;
        surface.fill_rect(2.0, 2.0, 2.0, 2.0);
        assert_eq!(surface.pixel(2, 2).map(|p| p[3]), Some(0));
        assert_eq!(surface.pixel(3, 3).map(|p| p[3]), Some(0));
        assert_eq!(surface.pixel(4, 4), Some(WHITE));
    }

    #[test]
    fn test_fractional_unit_rect_fills_one_pixel() {
        let mut surface = ImageSurface::new(10, 10);
        surface.paint_mut().color = Color32::RED;
        surface.fill_rect(3.4, 5.6, 1.0, 1.0);
        assert_eq!(surface.pixel(3, 6), Some(rgba(Color32::RED)));
        assert_eq!(surface.pixel(4, 6), Some(WHITE));
        assert_eq!(surface.pixel(3, 5), Some(WHITE));
    }

    #[test]
    fn test_out_of_bounds_primitives_are_clipped() {
        let mut surface = ImageSurface::new(10, 10);
        surface.fill_rect(-50.0, -50.0, 10.0, 10.0);
        surface.fill_rect(100.0, 100.0, 1.0, 1.0);
        surface.stroke_segment(Position::new(-100, -100), Position::new(-20, -20));
        assert_eq!(surface.version(), 0);
    }

    #[test]
    fn test_encode_png_decodes_to_same_pixels() {
        let mut surface = ImageSurface::new(6, 4);
        surface.paint_mut().color = Color32::from_rgba_unmultiplied(10, 200, 30, 128);
        surface.fill_rect(1.0, 1.0, 2.0, 2.0);
        surface.paint_mut().composite = CompositeMode::Erase;
        surface.fill_rect(4.0, 0.0, 1.0, 1.0);

        let bytes = surface.encode_png().unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&decoded, surface.image());
    }

    #[test]
    fn test_encode_png_rejects_empty_surface() {
        let err = ImageSurface::new(3, 0).encode_png().unwrap_err();
        assert!(matches!(err, PaintError::EmptyImage { width: 3, height: 0 }));
    }

    #[test]
    fn test_blit_adopts_image_size_and_keeps_paint() {
        let mut surface = ImageSurface::new(10, 10);
        surface.paint_mut().width = 12.0;
        surface.paint_mut().color = Color32::BLUE;

        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        surface.blit_image(&image);

        assert_eq!((surface.width(), surface.height()), (3, 2));
        assert_eq!(surface.pixel(2, 1), Some([1, 2, 3, 255]));
        assert_eq!(surface.paint().width, 12.0);
        assert_eq!(surface.paint().color, Color32::BLUE);
    }
}
