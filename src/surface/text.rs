use egui::epaint::text::{FontDefinitions, Fonts};
use egui::{Color32, FontFamily, FontId, Pos2, Vec2};

/// Largest glyph atlas the rasterizer will grow to
const MAX_ATLAS_SIDE: usize = 2048;

/// Rasterizes text with egui's bundled proportional (sans-serif) font.
///
/// Glyphs are laid out and cached in an atlas at one pixel per point; their
/// alpha coverage is then handed to a caller-supplied plotter.
pub(crate) struct TextRasterizer {
    fonts: Fonts,
}

impl TextRasterizer {
    pub fn new() -> Self {
        Self {
            fonts: Fonts::new(1.0, MAX_ATLAS_SIDE, FontDefinitions::default()),
        }
    }

    /// Calls `plot(x, y, coverage)` for every pixel the text touches, with the
    /// alphabetic baseline of the first line at `baseline`.
    pub fn rasterize(
        &self,
        text: &str,
        baseline: Pos2,
        font_size: f32,
        mut plot: impl FnMut(i64, i64, f32),
    ) {
        let font_id = FontId::new(font_size, FontFamily::Proportional);
        let galley = self
            .fonts
            .layout_no_wrap(text.to_owned(), font_id, Color32::WHITE);

        let Some(first_baseline) = galley
            .rows
            .iter()
            .flat_map(|row| row.glyphs.first())
            .map(|glyph| glyph.pos.y)
            .next()
        else {
            return;
        };
        let shift = Vec2::new(baseline.x, baseline.y - first_baseline);

        let atlas = self.fonts.image();
        let atlas_width = atlas.size[0];

        for glyph in galley.rows.iter().flat_map(|row| row.glyphs.iter()) {
            let uv = glyph.uv_rect;
            if uv.is_nothing() {
                continue;
            }
            let left_top = glyph.pos + shift + uv.offset;
            let (x0, y0) = (left_top.x.round() as i64, left_top.y.round() as i64);

            for ay in uv.min[1] as usize..uv.max[1] as usize {
                for ax in uv.min[0] as usize..uv.max[0] as usize {
                    let coverage = atlas.pixels.get(ay * atlas_width + ax).copied().unwrap_or(0.0);
                    if coverage > 0.0 {
                        plot(
                            x0 + (ax - uv.min[0] as usize) as i64,
                            y0 + (ay - uv.min[1] as usize) as i64,
                            coverage,
                        );
                    }
                }
            }
        }
    }
}
