//! The tool session: the single owner of the active tool and of the pointer
//! state every tool reads.
//!
//! One session is created per surface and lives as long as the surface.
//! Surfaces are passed in by reference on every call so a session can drive
//! any [`RasterSurface`], including a [`RecordingSurface`](crate::RecordingSurface)
//! in tests.

use std::time::Duration;

use crate::error::PaintResult;
use crate::input::{PointerEvent, PointerKind, Position};
use crate::surface::RasterSurface;
use crate::tools::{NoTextInput, TextInput, TextStampTool, Tool, ToolContext, ToolEvent, ToolKind, ToolName};

/// Pointer state shared with every tool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    /// The position reported by the move before the latest one
    pub previous: Option<Position>,
    /// The position reported by the latest move
    pub current: Option<Position>,
    pub is_down: bool,
}

impl PointerState {
    fn shift(&mut self, pos: Position) {
        self.previous = self.current;
        self.current = Some(pos);
    }
}

pub struct ToolSession {
    tool: ToolKind,
    pointer: PointerState,
    text_input: Box<dyn TextInput>,
}

impl std::fmt::Debug for ToolSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolSession")
            .field("tool", &self.tool)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}

impl ToolSession {
    /// Create a session with the line tool active on `surface`
    pub fn new(surface: &mut dyn RasterSurface) -> Self {
        let mut tool = ToolKind::new(ToolName::Line);
        tool.activate(surface.paint_mut());
        Self {
            tool,
            pointer: PointerState::default(),
            text_input: Box::new(NoTextInput),
        }
    }

    pub fn set_text_input(&mut self, input: impl TextInput + 'static) {
        self.text_input = Box::new(input);
    }

    pub fn active_tool(&self) -> &ToolKind {
        &self.tool
    }

    pub fn tool_name(&self) -> ToolName {
        self.tool.name()
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Switch to the tool registered under `name`.
    ///
    /// Unknown names are rejected and the current tool stays active.
    pub fn set_tool(&mut self, surface: &mut dyn RasterSurface, name: &str) -> PaintResult<()> {
        let name: ToolName = name.parse()?;
        self.select_tool(surface, name);
        Ok(())
    }

    pub fn select_tool(&mut self, surface: &mut dyn RasterSurface, name: ToolName) {
        self.activate_tool(surface, ToolKind::new(name));
    }

    /// Replace the active tool with `tool`. The outgoing tool is deactivated
    /// first, which cancels any timer it still holds.
    pub fn activate_tool(&mut self, surface: &mut dyn RasterSurface, mut tool: ToolKind) {
        self.tool.deactivate();
        tool.activate(surface.paint_mut());
        log::debug!("Tool switched: {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
    }

    pub fn on_pointer_down(&mut self, surface: &mut dyn RasterSurface, pos: Position) {
        self.pointer.is_down = true;
        self.dispatch(surface, ToolEvent::PointerDown, pos);
    }

    pub fn on_pointer_move(&mut self, surface: &mut dyn RasterSurface, pos: Position) {
        self.pointer.shift(pos);
        self.dispatch(surface, ToolEvent::PointerMove, pos);
    }

    pub fn on_pointer_up(&mut self, surface: &mut dyn RasterSurface, pos: Position) {
        self.pointer.is_down = false;
        self.dispatch(surface, ToolEvent::PointerUp, pos);
    }

    pub fn handle_event(&mut self, surface: &mut dyn RasterSurface, event: PointerEvent) {
        match event.kind {
            PointerKind::Down => self.on_pointer_down(surface, event.position),
            PointerKind::Move => self.on_pointer_move(surface, event.position),
            PointerKind::Up => self.on_pointer_up(surface, event.position),
        }
    }

    /// Advance timed tools by `elapsed` host time
    pub fn advance(&mut self, surface: &mut dyn RasterSurface, elapsed: Duration) {
        if !self.tool.is_animating() || !self.tool.handles(ToolEvent::Tick) {
            return;
        }
        let mut ctx = ToolContext {
            surface,
            pointer: &self.pointer,
            text_input: self.text_input.as_mut(),
        };
        self.tool.on_tick(&mut ctx, elapsed);
    }

    /// Whether the host should keep delivering time to the session
    pub fn is_animating(&self) -> bool {
        self.tool.is_animating()
    }

    /// Answer a text request that was deferred by the text input.
    /// Returns whether anything was drawn.
    pub fn complete_text_request(
        &mut self,
        surface: &mut dyn RasterSurface,
        at: Position,
        text: Option<&str>,
    ) -> bool {
        match text {
            Some(text) => TextStampTool::stamp(surface, at, text),
            None => false,
        }
    }

    fn dispatch(&mut self, surface: &mut dyn RasterSurface, event: ToolEvent, pos: Position) {
        if !self.tool.handles(event) {
            log::trace!("{} ignores {:?}", self.tool.name(), event);
            return;
        }
        let mut ctx = ToolContext {
            surface,
            pointer: &self.pointer,
            text_input: self.text_input.as_mut(),
        };
        match event {
            ToolEvent::PointerDown => self.tool.on_pointer_down(&mut ctx, pos),
            ToolEvent::PointerMove => self.tool.on_pointer_move(&mut ctx, pos),
            ToolEvent::PointerUp => self.tool.on_pointer_up(&mut ctx, pos),
            ToolEvent::Tick => {}
        }
    }
}
