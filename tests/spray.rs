use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use spray_paint::tools::{
    dots_per_tick, random_point_in_radius, SprayTool, MAX_TICKS_PER_ADVANCE, SPRAY_INTERVAL,
};
use spray_paint::{Position, Primitive, RasterSurface, RecordingSurface, Tool, ToolKind, ToolSession};

fn spray_session(width: f32) -> (ToolSession, RecordingSurface) {
    let mut surface = RecordingSurface::new();
    surface.paint_mut().width = width;
    let mut session = ToolSession::new(&mut surface);
    session.activate_tool(&mut surface, ToolKind::Spray(SprayTool::with_seed(42)));
    (session, surface)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn fill_positions(surface: &RecordingSurface) -> Vec<(f64, f64)> {
    surface
        .primitives()
        .iter()
        .filter_map(|p| match p {
            Primitive::FillRect { x, y, width, height, .. } => {
                assert_eq!((*width, *height), (1.0, 1.0));
                Some((*x, *y))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn test_density_scales_with_area() {
    for (w1, w2) in [(100.0_f32, 200.0_f32), (200.0, 400.0), (150.0, 600.0)] {
        let ratio = dots_per_tick(w2) as f64 / dots_per_tick(w1) as f64;
        let expected = ((w2 / w1) as f64).powi(2);
        assert!(
            (ratio - expected).abs() / expected < 0.01,
            "widths {w1} -> {w2}: ratio {ratio}, expected {expected}"
        );
    }

    // Doubling the width roughly quadruples the count for mid-size brushes
    let small = dots_per_tick(25.0) as f64;
    let large = dots_per_tick(50.0) as f64;
    assert!((large / small - 4.0).abs() < 0.3);
}

#[test]
fn test_rejection_sampler_is_uniform_over_disk() {
    let mut rng = StdRng::seed_from_u64(1234);
    let radius = 10.0;
    let samples: Vec<(f64, f64)> = (0..10_000)
        .map(|_| random_point_in_radius(&mut rng, radius))
        .collect();

    for (x, y) in &samples {
        assert!(x * x + y * y <= radius * radius + 1e-9);
    }

    // Uniform over the disk: P(r <= rho) = (rho / R)^2
    for k in 1..10 {
        let fraction = k as f64 / 10.0;
        let rho = radius * fraction.sqrt();
        let inside = samples
            .iter()
            .filter(|(x, y)| (x * x + y * y).sqrt() <= rho)
            .count() as f64
            / samples.len() as f64;
        assert!(
            (inside - fraction).abs() < 0.02,
            "expected {fraction} of samples within {rho}, got {inside}"
        );
    }

    // No quadrant is favoured
    for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
        let count = samples
            .iter()
            .filter(|(x, y)| x * sx >= 0.0 && y * sy >= 0.0)
            .count() as f64
            / samples.len() as f64;
        assert!((count - 0.25).abs() < 0.02, "quadrant ({sx}, {sy}) has {count}");
    }
}

#[test]
fn test_spray_emits_on_each_tick_while_held() {
    let (mut session, mut surface) = spray_session(12.0);
    let per_tick = dots_per_tick(12.0) as usize;

    session.on_pointer_down(&mut surface, Position::new(50, 50));
    assert!(session.is_animating());
    session.advance(&mut surface, ms(24));
    assert_eq!(surface.fill_rect_count(), 0);

    session.advance(&mut surface, ms(1));
    assert_eq!(surface.fill_rect_count(), per_tick);

    session.advance(&mut surface, SPRAY_INTERVAL * 3);
    assert_eq!(surface.fill_rect_count(), per_tick * 4);
}

#[test]
fn test_long_stall_does_not_replay_backlog() {
    let (mut session, mut surface) = spray_session(100.0);
    let per_tick = dots_per_tick(100.0) as usize;

    session.on_pointer_down(&mut surface, Position::new(50, 50));
    session.advance(&mut surface, Duration::from_secs(600));
    assert_eq!(surface.fill_rect_count(), per_tick * MAX_TICKS_PER_ADVANCE as usize);

    // Normal cadence resumes afterwards
    session.advance(&mut surface, SPRAY_INTERVAL);
    assert_eq!(surface.fill_rect_count(), per_tick * (MAX_TICKS_PER_ADVANCE as usize + 1));
    assert!(session.is_animating());
}

#[test]
fn test_dots_land_inside_the_brush_disk() {
    let (mut session, mut surface) = spray_session(40.0);
    session.on_pointer_down(&mut surface, Position::new(100, 80));
    session.advance(&mut surface, SPRAY_INTERVAL * 10);

    let dots = fill_positions(&surface);
    assert_eq!(dots.len(), dots_per_tick(40.0) as usize * 10);
    for (x, y) in dots {
        let (dx, dy) = (x - 100.0, y - 80.0);
        assert!(dx * dx + dy * dy <= 20.0 * 20.0 + 1e-9);
    }
}

#[test]
fn test_spray_follows_live_pointer_position() {
    let (mut session, mut surface) = spray_session(1.0);

    // Before any move, dots are centred on the press position
    session.on_pointer_down(&mut surface, Position::new(10, 10));
    session.advance(&mut surface, SPRAY_INTERVAL);
    session.on_pointer_move(&mut surface, Position::new(200, 150));
    session.advance(&mut surface, SPRAY_INTERVAL);

    let dots = fill_positions(&surface);
    assert_eq!(dots.len(), 2);
    assert!((dots[0].0 - 10.0).abs() <= 0.5 && (dots[0].1 - 10.0).abs() <= 0.5);
    assert!((dots[1].0 - 200.0).abs() <= 0.5 && (dots[1].1 - 150.0).abs() <= 0.5);
}

#[test]
fn test_quick_release_leaves_no_orphaned_timer() {
    let (mut session, mut surface) = spray_session(12.0);

    session.on_pointer_down(&mut surface, Position::new(5, 5));
    session.advance(&mut surface, ms(10));
    session.on_pointer_up(&mut surface, Position::new(5, 5));
    assert!(!session.is_animating());

    session.advance(&mut surface, ms(500));
    assert_eq!(surface.fill_rect_count(), 0);

    // A new press starts its own sequence without the earlier 10ms carried over
    session.on_pointer_down(&mut surface, Position::new(5, 5));
    session.advance(&mut surface, ms(15));
    assert_eq!(surface.fill_rect_count(), 0);
    session.advance(&mut surface, ms(10));
    assert_eq!(surface.fill_rect_count(), dots_per_tick(12.0) as usize);
}

#[test]
fn test_switching_tools_mid_spray_stops_emission() {
    let (mut session, mut surface) = spray_session(12.0);

    session.on_pointer_down(&mut surface, Position::new(5, 5));
    session.advance(&mut surface, SPRAY_INTERVAL);
    let emitted = surface.fill_rect_count();
    assert!(emitted > 0);

    session.set_tool(&mut surface, "line").unwrap();
    assert!(!session.is_animating());
    session.advance(&mut surface, SPRAY_INTERVAL * 20);
    assert_eq!(surface.fill_rect_count(), emitted);
}

#[test]
fn test_density_is_fixed_at_press_time() {
    let (mut session, mut surface) = spray_session(12.0);
    session.on_pointer_down(&mut surface, Position::new(5, 5));
    surface.paint_mut().width = 100.0;
    session.advance(&mut surface, SPRAY_INTERVAL);

    assert_eq!(surface.fill_rect_count(), dots_per_tick(12.0) as usize);
    let spray = session.active_tool().as_spray().unwrap();
    assert_eq!(spray.emitter().dots_per_tick(), dots_per_tick(12.0));
}

#[test]
fn test_seeded_spray_is_reproducible() {
    let run = || {
        let (mut session, mut surface) = spray_session(30.0);
        session.on_pointer_down(&mut surface, Position::new(40, 40));
        session.advance(&mut surface, SPRAY_INTERVAL * 4);
        surface.drain()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_spray_tool_ignores_moves() {
    let tool = SprayTool::new();
    assert!(!tool.handles(spray_paint::ToolEvent::PointerMove));
    assert!(!tool.is_animating());
}
