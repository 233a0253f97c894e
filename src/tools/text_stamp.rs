use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Tool, ToolContext, ToolEvent, ToolName};
use crate::input::Position;
use crate::surface::RasterSurface;

/// Smallest font size a stamp is rendered at, regardless of stroke width
pub const MIN_FONT_SIZE: f32 = 7.0;

/// Supplies the text for a stamp.
///
/// A blocking host answers immediately. A non-blocking host returns `None`,
/// remembers the request and later calls
/// [`ToolSession::complete_text_request`](crate::ToolSession::complete_text_request).
/// `None` and an empty string both mean "no stamp".
pub trait TextInput {
    fn request_text(&mut self, at: Position) -> Option<String>;
}

impl<F> TextInput for F
where
    F: FnMut(Position) -> Option<String>,
{
    fn request_text(&mut self, at: Position) -> Option<String> {
        self(at)
    }
}

/// Text input that never answers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTextInput;

impl TextInput for NoTextInput {
    fn request_text(&mut self, _at: Position) -> Option<String> {
        None
    }
}

/// Deferred text input: every request is queued for the host to answer later.
/// Clones share the same queue.
#[derive(Debug, Clone, Default)]
pub struct TextRequestQueue {
    pending: Rc<RefCell<VecDeque<Position>>>,
}

impl TextRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest unanswered request
    pub fn pop(&self) -> Option<Position> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl TextInput for TextRequestQueue {
    fn request_text(&mut self, at: Position) -> Option<String> {
        self.pending.borrow_mut().push_back(at);
        None
    }
}

/// Stamps a line of text where the pointer goes down
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStampTool;

impl TextStampTool {
    pub fn new() -> Self {
        Self
    }

    /// Fill `text` at `at`, sized from the current stroke width.
    /// Returns whether anything was drawn.
    pub fn stamp(surface: &mut dyn RasterSurface, at: Position, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let font_size = surface.paint().width.max(MIN_FONT_SIZE);
        surface.fill_text(text, at, font_size);
        true
    }
}

impl Tool for TextStampTool {
    fn name(&self) -> ToolName {
        ToolName::Text
    }

    fn handled_events(&self) -> &'static [ToolEvent] {
        &[ToolEvent::PointerDown]
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pos: Position) {
        if let Some(text) = ctx.text_input.request_text(pos) {
            Self::stamp(ctx.surface, pos, &text);
        }
    }
}
