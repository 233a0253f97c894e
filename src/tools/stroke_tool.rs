use super::{Tool, ToolContext, ToolEvent, ToolName};
use crate::input::Position;
use crate::surface::{CompositeMode, LineCap, PaintState};

/// Freehand stroking shared by the line and eraser tools.
///
/// Every move while the pointer is held issues one straight segment between
/// the two most recent pointer positions. The tools differ only in the
/// compositing mode they switch the surface into on activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrokeTool {
    name: ToolName,
    composite: CompositeMode,
}

impl StrokeTool {
    pub fn line() -> Self {
        Self {
            name: ToolName::Line,
            composite: CompositeMode::Normal,
        }
    }

    pub fn eraser() -> Self {
        Self {
            name: ToolName::Eraser,
            composite: CompositeMode::Erase,
        }
    }

    pub fn composite(&self) -> CompositeMode {
        self.composite
    }
}

impl Tool for StrokeTool {
    fn name(&self) -> ToolName {
        self.name
    }

    fn handled_events(&self) -> &'static [ToolEvent] {
        &[ToolEvent::PointerMove]
    }

    fn activate(&mut self, paint: &mut PaintState) {
        paint.composite = self.composite;
        // The eraser keeps whatever cap is already set
        if self.composite == CompositeMode::Normal {
            paint.line_cap = LineCap::Round;
        }
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, _pos: Position) {
        if !ctx.pointer.is_down {
            return;
        }
        if let (Some(from), Some(to)) = (ctx.pointer.previous, ctx.pointer.current) {
            ctx.surface.stroke_segment(from, to);
        }
    }
}
