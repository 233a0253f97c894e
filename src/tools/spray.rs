use std::f64::consts::PI;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Tool, ToolContext, ToolEvent, ToolName};
use crate::input::Position;

/// Cadence of spray emission
pub const SPRAY_INTERVAL: Duration = Duration::from_millis(25);

/// Most ticks a single `advance` will fire. Anything beyond this (a hidden
/// window, a stalled frame) is dropped rather than painted in one burst.
pub const MAX_TICKS_PER_ADVANCE: u32 = 10;

/// Brush area covered by one dot per tick
const AREA_PER_DOT: f64 = 30.0;

/// Number of dots emitted per tick for a given stroke width.
///
/// Proportional to the brush area, so doubling the width roughly quadruples
/// the count.
pub fn dots_per_tick(width: f32) -> u32 {
    let radius = width as f64 / 2.0;
    let area = PI * radius * radius;
    (area / AREA_PER_DOT).ceil() as u32
}

/// Uniform sample from the disk of the given radius, centred on the origin.
///
/// Candidates are drawn from the enclosing square and rejected until one lands
/// inside the unit disk.
pub fn random_point_in_radius<R: Rng>(rng: &mut R, radius: f64) -> (f64, f64) {
    loop {
        let x = rng.gen_range(-1.0..=1.0);
        let y = rng.gen_range(-1.0..=1.0);
        if x * x + y * y <= 1.0 {
            return (x * radius, y * radius);
        }
    }
}

/// A cancellable periodic timer driven by elapsed host time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    interval: Duration,
    pending: Duration,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Accumulate `elapsed` and return how many whole intervals fired, at most
    /// `MAX_TICKS_PER_ADVANCE`. A backlog past the cap is discarded; the
    /// partial interval is kept.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        self.pending = self.pending.saturating_add(elapsed);
        let interval = self.interval.as_nanos();
        let pending = self.pending.as_nanos();
        let whole = pending / interval;
        self.pending = Duration::from_nanos((pending % interval) as u64);

        if whole > MAX_TICKS_PER_ADVANCE as u128 {
            log::debug!("Dropping {} missed timer ticks", whole - MAX_TICKS_PER_ADVANCE as u128);
        }
        whole.min(MAX_TICKS_PER_ADVANCE as u128) as u32
    }
}

/// Timed dot emission for one press of the spray tool
#[derive(Debug)]
pub struct SprayEmitter {
    timer: Option<IntervalTimer>,
    radius: f64,
    dots_per_tick: u32,
    /// Where the pointer went down; used until the first move is seen
    anchor: Position,
    rng: StdRng,
}

impl SprayEmitter {
    pub fn new(rng: StdRng) -> Self {
        Self {
            timer: None,
            radius: 0.0,
            dots_per_tick: 0,
            anchor: Position::default(),
            rng,
        }
    }

    /// Start a fresh emission sequence. Radius and density are fixed here from
    /// the stroke width at the time of the press.
    pub fn start(&mut self, width: f32, anchor: Position) {
        self.radius = width as f64 / 2.0;
        self.dots_per_tick = dots_per_tick(width);
        self.anchor = anchor;
        self.timer = Some(IntervalTimer::new(SPRAY_INTERVAL));
        log::debug!(
            "Spray started at {:?}: radius {}, {} dots per tick",
            anchor,
            self.radius,
            self.dots_per_tick
        );
    }

    /// Cancel the timer. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        let was_active = self.timer.take().is_some();
        if was_active {
            log::debug!("Spray stopped");
        }
        was_active
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    pub fn dots_per_tick(&self) -> u32 {
        self.dots_per_tick
    }

    /// Emit dots for every tick that fired during `elapsed`, around the live
    /// pointer position.
    pub fn advance(&mut self, ctx: &mut ToolContext<'_>, elapsed: Duration) {
        let Some(timer) = self.timer.as_mut() else {
            return;
        };
        let ticks = timer.advance(elapsed);
        let center = ctx.pointer.current.unwrap_or(self.anchor);

        for _ in 0..ticks {
            for _ in 0..self.dots_per_tick {
                let (dx, dy) = random_point_in_radius(&mut self.rng, self.radius);
                ctx.surface
                    .fill_rect(center.x as f64 + dx, center.y as f64 + dy, 1.0, 1.0);
            }
        }
    }
}

/// Sprays random dots inside a disk around the pointer while it is held
#[derive(Debug)]
pub struct SprayTool {
    emitter: SprayEmitter,
}

impl Default for SprayTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SprayTool {
    pub fn new() -> Self {
        Self {
            emitter: SprayEmitter::new(StdRng::from_entropy()),
        }
    }

    /// Spray tool with a reproducible dot pattern
    pub fn with_seed(seed: u64) -> Self {
        Self {
            emitter: SprayEmitter::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn emitter(&self) -> &SprayEmitter {
        &self.emitter
    }
}

impl Tool for SprayTool {
    fn name(&self) -> ToolName {
        ToolName::Spray
    }

    fn handled_events(&self) -> &'static [ToolEvent] {
        &[ToolEvent::PointerDown, ToolEvent::PointerUp, ToolEvent::Tick]
    }

    fn deactivate(&mut self) {
        self.emitter.stop();
    }

    fn on_pointer_down(&mut self, ctx: &mut ToolContext<'_>, pos: Position) {
        self.emitter.start(ctx.surface.paint().width, pos);
    }

    fn on_pointer_up(&mut self, _ctx: &mut ToolContext<'_>, _pos: Position) {
        self.emitter.stop();
    }

    fn on_tick(&mut self, ctx: &mut ToolContext<'_>, elapsed: Duration) {
        self.emitter.advance(ctx, elapsed);
    }

    fn is_animating(&self) -> bool {
        self.emitter.is_active()
    }
}
