use egui::{PointerButton, Pos2, Rect, Response};

/// A pointer position resolved into surface-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Resolve a screen position against the origin of the canvas it was
    /// reported on. Fractional coordinates are floored.
    pub fn from_screen(pos: Pos2, canvas_origin: Pos2) -> Self {
        Self {
            x: (pos.x - canvas_origin.x).floor() as i32,
            y: (pos.y - canvas_origin.y).floor() as i32,
        }
    }
}

/// The kind of pointer event delivered to the tool session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A single pointer event, already translated into surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Position,
}

impl PointerEvent {
    pub fn down(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Down, position: Position::new(x, y) }
    }

    pub fn moved(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Move, position: Position::new(x, y) }
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self { kind: PointerKind::Up, position: Position::new(x, y) }
    }
}

/// Converts egui pointer input over the canvas into `PointerEvent`s
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    button_down: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            last_pointer_pos: None,
            button_down: false,
        }
    }

    /// Collect the events produced by one frame of input over `canvas_rect`.
    ///
    /// Moves are reported whenever the hover position changes, held button or
    /// not; a press that started on the canvas keeps producing moves and its
    /// release even when the pointer leaves the canvas.
    pub fn process_input(&mut self, response: &Response, canvas_rect: Rect) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        let origin = canvas_rect.min;

        response.ctx.input(|input| {
            let pos = input.pointer.hover_pos().or(self.last_pointer_pos);
            let Some(pos) = pos else {
                return;
            };
            let position = Position::from_screen(pos, origin);
            let over_canvas = canvas_rect.contains(pos);

            if input.pointer.button_pressed(PointerButton::Primary) && over_canvas {
                self.button_down = true;
                events.push(PointerEvent { kind: PointerKind::Down, position });
            }

            if Some(pos) != self.last_pointer_pos && (over_canvas || self.button_down) {
                events.push(PointerEvent { kind: PointerKind::Move, position });
            }

            if input.pointer.button_released(PointerButton::Primary) && self.button_down {
                self.button_down = false;
                events.push(PointerEvent { kind: PointerKind::Up, position });
            }

            self.last_pointer_pos = input.pointer.hover_pos();
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Event, Modifiers, RawInput, Sense};

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, egui::vec2(100.0, 100.0))
    }

    fn moved(x: f32, y: f32) -> Event {
        Event::PointerMoved(Pos2::new(x, y))
    }

    fn button(x: f32, y: f32, pressed: bool) -> Event {
        Event::PointerButton {
            pos: Pos2::new(x, y),
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    /// Run one egui frame with `events` and collect what the handler reports
    fn run_frame(ctx: &egui::Context, handler: &mut InputHandler, events: Vec<Event>) -> Vec<PointerEvent> {
        let raw = RawInput {
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(400.0, 300.0))),
            events,
            ..Default::default()
        };
        let mut reported = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let response = ui.allocate_rect(canvas(), Sense::drag());
                reported = handler.process_input(&response, canvas());
            });
        });
        reported
    }

    #[test]
    fn test_press_move_release_in_one_frame_keeps_order() {
        let ctx = egui::Context::default();
        let mut handler = InputHandler::new();

        let events = run_frame(
            &ctx,
            &mut handler,
            vec![moved(10.0, 10.0), button(10.0, 10.0, true), moved(20.0, 15.0), button(20.0, 15.0, false)],
        );
        assert_eq!(
            events,
            vec![PointerEvent::down(20, 15), PointerEvent::moved(20, 15), PointerEvent::up(20, 15)]
        );
    }

    #[test]
    fn test_drag_released_off_canvas_still_ends_stroke() {
        let ctx = egui::Context::default();
        let mut handler = InputHandler::new();

        let events = run_frame(&ctx, &mut handler, vec![moved(10.0, 10.0), button(10.0, 10.0, true)]);
        assert_eq!(events, vec![PointerEvent::down(10, 10), PointerEvent::moved(10, 10)]);

        let events = run_frame(&ctx, &mut handler, vec![moved(150.0, 20.0)]);
        assert_eq!(events, vec![PointerEvent::moved(150, 20)]);

        let events = run_frame(&ctx, &mut handler, vec![button(150.0, 20.0, false)]);
        assert_eq!(events, vec![PointerEvent::up(150, 20)]);
    }

    #[test]
    fn test_press_outside_canvas_is_ignored() {
        let ctx = egui::Context::default();
        let mut handler = InputHandler::new();

        let events = run_frame(&ctx, &mut handler, vec![moved(200.0, 200.0), button(200.0, 200.0, true)]);
        assert!(events.is_empty());

        let events = run_frame(&ctx, &mut handler, vec![moved(50.0, 50.0)]);
        assert_eq!(events, vec![PointerEvent::moved(50, 50)]);

        // Releasing a press that never started on the canvas reports nothing
        let events = run_frame(&ctx, &mut handler, vec![button(50.0, 50.0, false)]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_from_screen_floors_fractional_offsets() {
        let origin = Pos2::new(10.5, 20.0);
        assert_eq!(Position::from_screen(Pos2::new(15.9, 20.2), origin), Position::new(5, 0));
        assert_eq!(Position::from_screen(Pos2::new(10.0, 19.5), origin), Position::new(-1, -1));
    }
}
