use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PaintError, PaintResult};
use crate::input::Position;
use crate::session::PointerState;
use crate::surface::{PaintState, RasterSurface};

mod spray;
mod stroke_tool;
mod text_stamp;

pub use spray::{
    dots_per_tick, random_point_in_radius, IntervalTimer, SprayEmitter, SprayTool, MAX_TICKS_PER_ADVANCE,
    SPRAY_INTERVAL,
};
pub use stroke_tool::StrokeTool;
pub use text_stamp::{NoTextInput, TextInput, TextRequestQueue, TextStampTool, MIN_FONT_SIZE};

/// Events a tool may choose to handle.
///
/// A tool that does not list an event is never called for it; the session
/// checks `Tool::handles` before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolEvent {
    PointerDown,
    PointerMove,
    PointerUp,
    /// Elapsed host time, delivered while the tool reports itself animating
    Tick,
}

/// Everything a tool handler may touch while handling one event
pub struct ToolContext<'a> {
    pub surface: &'a mut dyn RasterSurface,
    /// Pointer state, already updated for the event being handled
    pub pointer: &'a PointerState,
    pub text_input: &'a mut dyn TextInput,
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    fn name(&self) -> ToolName;

    /// The events this tool reacts to
    fn handled_events(&self) -> &'static [ToolEvent];

    fn handles(&self, event: ToolEvent) -> bool {
        self.handled_events().contains(&event)
    }

    /// Called once when the tool becomes the active tool.
    /// Applies whatever paint state the tool requires.
    fn activate(&mut self, _paint: &mut PaintState) {}

    /// Called when another tool replaces this one. Must release any timer.
    fn deactivate(&mut self) {}

    fn on_pointer_down(&mut self, _ctx: &mut ToolContext<'_>, _pos: Position) {}

    fn on_pointer_move(&mut self, _ctx: &mut ToolContext<'_>, _pos: Position) {}

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pos: Position) {}

    fn on_tick(&mut self, _ctx: &mut ToolContext<'_>, _elapsed: Duration) {}

    /// True while the tool has a live timer and wants `Tick` events
    fn is_animating(&self) -> bool {
        false
    }
}

/// The names tools are registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolName {
    #[default]
    Line,
    Eraser,
    Text,
    Spray,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [Self::Line, Self::Eraser, Self::Text, Self::Spray];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Eraser => "eraser",
            Self::Text => "text",
            Self::Spray => "spray",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = PaintError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name)
            .ok_or_else(|| PaintError::UnknownTool(name.to_owned()))
    }
}

/// Enum representing all available tool types.
/// Lets the session own its tool by value instead of through `Box<dyn Tool>`.
#[derive(Debug)]
pub enum ToolKind {
    Line(StrokeTool),
    Eraser(StrokeTool),
    Text(TextStampTool),
    Spray(SprayTool),
}

impl ToolKind {
    /// Construct a fresh, not yet activated instance of the named tool
    pub fn new(name: ToolName) -> Self {
        match name {
            ToolName::Line => Self::Line(StrokeTool::line()),
            ToolName::Eraser => Self::Eraser(StrokeTool::eraser()),
            ToolName::Text => Self::Text(TextStampTool::new()),
            ToolName::Spray => Self::Spray(SprayTool::new()),
        }
    }

    pub fn as_spray(&self) -> Option<&SprayTool> {
        match self {
            Self::Spray(tool) => Some(tool),
            _ => None,
        }
    }

    fn as_tool(&self) -> &dyn Tool {
        match self {
            Self::Line(tool) | Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
            Self::Spray(tool) => tool,
        }
    }

    fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Line(tool) | Self::Eraser(tool) => tool,
            Self::Text(tool) => tool,
            Self::Spray(tool) => tool,
        }
    }
}

impl Tool for ToolKind {
    fn name(&self) -> ToolName {
        self.as_tool().name()
    }

    fn handled_events(&self) -> &'static [ToolEvent] {
        self.as_tool().handled_events()
    }

    fn activate(&mut self, paint: &mut PaintState) {
        self.as_tool_mut().activate(paint)
    }

    fn deactivate(&mut self) {
        self.as_tool_mut().deactivate()
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pos: Position) {
        self.as_tool_mut().on_pointer_down(ctx, pos)
    }

    fn on_pointer_move(&mut self, ctx: &mut ToolContext<'_>, pos: Position) {
        self.as_tool_mut().on_pointer_move(ctx, pos)
    }

    fn on_pointer_up(&mut self, ctx: &mut ToolContext<'_>, pos: Position) {
        self.as_tool_mut().on_pointer_up(ctx, pos)
    }

    fn on_tick(&mut self, ctx: &mut ToolContext<'_>, elapsed: Duration) {
        self.as_tool_mut().on_tick(ctx, elapsed)
    }

    fn is_animating(&self) -> bool {
        self.as_tool().is_animating()
    }
}

/// Factory function to create a new tool from its registered name
pub fn new_tool(name: &str) -> PaintResult<ToolKind> {
    Ok(ToolKind::new(name.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip_through_from_str() {
        for name in ToolName::ALL {
            assert_eq!(name.as_str().parse::<ToolName>().unwrap(), name);
        }
    }

    #[test]
    fn test_unknown_tool_name_is_an_error() {
        let err = new_tool("lasso").unwrap_err();
        assert!(matches!(err, PaintError::UnknownTool(ref name) if name == "lasso"));
        assert!("Line".parse::<ToolName>().is_err());
    }

    #[test]
    fn test_capabilities_are_queryable() {
        let line = ToolKind::new(ToolName::Line);
        assert!(line.handles(ToolEvent::PointerMove));
        assert!(!line.handles(ToolEvent::PointerDown));

        let text = ToolKind::new(ToolName::Text);
        assert_eq!(text.handled_events(), &[ToolEvent::PointerDown]);

        let spray = ToolKind::new(ToolName::Spray);
        assert!(spray.handles(ToolEvent::Tick));
        assert!(spray.handles(ToolEvent::PointerUp));
        assert!(!spray.handles(ToolEvent::PointerMove));
    }
}
