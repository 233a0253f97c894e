use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::tools::ToolName;

/// Brush sizes offered by the size picker
pub const BRUSH_SIZES: [f32; 11] = [1.0, 2.0, 3.0, 5.0, 8.0, 12.0, 25.0, 35.0, 50.0, 75.0, 100.0];

/// Settings persisted between runs through eframe storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct CanvasSettings {
    pub width: u32,
    pub height: u32,
    pub tool: ToolName,
    pub brush_size: f32,
    /// Unmultiplied sRGBA
    pub color: [u8; 4],
    pub export_path: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            tool: ToolName::Line,
            brush_size: 1.0,
            color: [0, 0, 0, 255],
            export_path: "painting.png".to_owned(),
        }
    }
}

impl CanvasSettings {
    pub fn color32(&self) -> Color32 {
        let [r, g, b, a] = self.color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn set_color32(&mut self, color: Color32) {
        self.color = color.to_srgba_unmultiplied();
    }
}
