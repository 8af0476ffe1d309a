use portfolio_site::config::{ColorSource, ParticleOptions};
use portfolio_site::particles::{
    connection_opacity, parse_hex_color, particle_count, resolve_color, DrawCommand,
    ManualScheduler, Particle, ParticleBackground, ParticleEnvironment, ParticleField,
    RecordingSurface, Rgb,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn env(width: f64, height: f64) -> ParticleEnvironment {
    ParticleEnvironment {
        width,
        height,
        prefers_reduced_motion: false,
        primary_color: None,
    }
}

fn start(width: f64, height: f64) -> ParticleBackground<RecordingSurface> {
    ParticleBackground::start(
        Some(RecordingSurface::new()),
        &env(width, height),
        &ParticleOptions::default(),
        7,
    )
    .expect("Background should start")
}

fn still(x: f64, y: f64) -> Particle {
    Particle {
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        radius: 1.0,
        opacity: 0.3,
    }
}

/// Fire up to `frames` pending frames.
fn run_frames(
    background: &mut ParticleBackground<RecordingSurface>,
    scheduler: &mut ManualScheduler,
    frames: usize,
) {
    for _ in 0..frames {
        if scheduler.fire_next().is_none() {
            break;
        }
        background.on_frame(scheduler);
    }
}

#[test]
fn test_particle_count_formula() {
    let options = ParticleOptions::default();
    for (width, expected) in [(0.0, 0), (9.0, 0), (10.0, 1), (375.0, 37), (999.0, 99), (1000.0, 100), (2560.0, 100)] {
        assert_eq!(particle_count(width, &options), expected, "width {width}");
    }
}

#[test]
fn test_count_fixed_after_resize() {
    let mut background = start(500.0, 400.0);
    assert_eq!(background.particle_count(), 50);

    background.resize(1920.0, 1080.0);
    assert_eq!(background.particle_count(), 50);
    assert_eq!(background.surface().size, (1920, 1080));

    background.resize(120.0, 80.0);
    assert_eq!(background.particle_count(), 50);
}

#[test]
fn test_canvas_sized_to_viewport() {
    let background = start(800.0, 600.0);
    assert_eq!(background.surface().size, (800, 600));
}

#[test]
fn test_particles_stay_in_bounds() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut field = ParticleField::new(100, 300.0, 200.0, &mut rng);

    for _ in 0..5_000 {
        field.step();
        for p in field.particles() {
            assert!((0.0..300.0).contains(&p.x), "x out of range: {}", p.x);
            assert!((0.0..200.0).contains(&p.y), "y out of range: {}", p.y);
        }
    }
}

#[test]
fn test_wrap_to_opposite_edge() {
    let mut left = Particle { vx: -0.25, ..still(0.1, 50.0) };
    left.update(100.0, 100.0);
    assert!((left.x - 99.85).abs() < 1e-9);

    let mut right = Particle { vx: 0.25, ..still(99.9, 50.0) };
    right.update(100.0, 100.0);
    assert!((right.x - 0.15).abs() < 1e-9);

    let mut bottom = Particle { vy: 0.5, ..still(50.0, 99.75) };
    bottom.update(100.0, 100.0);
    assert!((bottom.y - 0.25).abs() < 1e-9);
}

#[test]
fn test_wrap_after_shrink() {
    let mut field = ParticleField::from_particles(vec![still(900.0, 700.0)], 1000.0, 800.0);
    field.resize(200.0, 100.0);
    field.step();

    let p = &field.particles()[0];
    assert!(p.x >= 0.0 && p.x < 200.0);
    assert!(p.y >= 0.0 && p.y < 100.0);
}

#[test]
fn test_spawned_particle_ranges() {
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..1_000 {
        let p = Particle::random(&mut rng, 640.0, 480.0);
        assert!((0.0..640.0).contains(&p.x));
        assert!((0.0..480.0).contains(&p.y));
        assert!(p.vx.abs() <= 0.25 && p.vy.abs() <= 0.25);
        assert!((0.0..2.0).contains(&p.radius));
        assert!((0.0..0.5).contains(&p.opacity));
    }
}

#[test]
fn test_connection_opacity() {
    assert_eq!(connection_opacity(0.0, 100.0, 0.1), Some(0.1));
    let half = connection_opacity(50.0, 100.0, 0.1).unwrap();
    assert!((half - 0.05).abs() < 1e-12);
    assert!(connection_opacity(99.999, 100.0, 0.1).unwrap() > 0.0);
    assert_eq!(connection_opacity(100.0, 100.0, 0.1), None);
    assert_eq!(connection_opacity(150.0, 100.0, 0.1), None);
}

#[test]
fn test_lines_drawn_only_for_close_pairs() {
    let field = ParticleField::from_particles(
        vec![still(10.0, 10.0), still(70.0, 90.0), still(110.0, 10.0), still(300.0, 300.0)],
        400.0,
        400.0,
    );
    let mut background = ParticleBackground::from_parts(
        RecordingSurface::new(),
        field,
        Rgb::new(0, 255, 136),
        ParticleOptions::default(),
    );

    background.render_frame();
    let surface = background.surface();

    assert_eq!(surface.circles().count(), 4);
    // (10,10)-(70,90) is 100 apart exactly, (10,10)-(110,10) likewise; only
    // (70,90)-(110,10) at ~89.44 connects.
    let lines: Vec<_> = surface.lines().collect();
    assert_eq!(lines.len(), 1);
    match lines[0] {
        DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        } => {
            assert_eq!(*from, (70.0, 90.0));
            assert_eq!(*to, (110.0, 10.0));
            let distance = (40.0f64 * 40.0 + 80.0 * 80.0).sqrt();
            assert!((color.alpha - 0.1 * (1.0 - distance / 100.0)).abs() < 1e-12);
            assert_eq!(color.rgb, Rgb::new(0, 255, 136));
            assert_eq!(*line_width, 0.5);
        }
        other => panic!("Expected a line, got {other:?}"),
    }
}

#[test]
fn test_circle_uses_particle_opacity() {
    let field = ParticleField::from_particles(vec![still(5.0, 5.0)], 50.0, 50.0);
    let mut background =
        ParticleBackground::from_parts(RecordingSurface::new(), field, Rgb::new(1, 2, 3), ParticleOptions::default());

    background.render_frame();

    match background.surface().commands.first() {
        Some(DrawCommand::Circle { radius, color, .. }) => {
            assert_eq!(*radius, 1.0);
            assert_eq!(color.to_string(), "rgba(1, 2, 3, 0.3)");
        }
        other => panic!("Expected a circle, got {other:?}"),
    }
}

#[test]
fn test_frame_clears_before_drawing() {
    let mut background = start(300.0, 300.0);
    let mut scheduler = ManualScheduler::new();

    background.begin(&mut scheduler);
    run_frames(&mut background, &mut scheduler, 4);

    assert_eq!(background.surface().clears, 5);
    assert_eq!(background.surface().circles().count(), 30);
}

#[test]
fn test_run_frames_renders_requested_count() {
    let mut background = start(300.0, 300.0);
    let mut scheduler = ManualScheduler::new();

    background.run_frames(&mut scheduler, 0);
    assert_eq!(background.frames_rendered(), 0);
    assert_eq!(background.surface().clears, 0);
    assert!(scheduler.pending().is_empty());

    background.run_frames(&mut scheduler, 5);
    assert_eq!(background.frames_rendered(), 5);
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn test_missing_canvas_is_noop() {
    let background = ParticleBackground::<RecordingSurface>::start(
        None,
        &env(1000.0, 800.0),
        &ParticleOptions::default(),
        1,
    );
    assert!(background.is_none());
}

#[test]
fn test_reduced_motion_disables_background() {
    let mut environment = env(1000.0, 800.0);
    environment.prefers_reduced_motion = true;

    let options = ParticleOptions::default();
    assert!(ParticleBackground::start(Some(RecordingSurface::new()), &environment, &options, 1).is_none());

    let options = ParticleOptions {
        respect_reduced_motion: false,
        ..ParticleOptions::default()
    };
    assert!(ParticleBackground::start(Some(RecordingSurface::new()), &environment, &options, 1).is_some());
}

#[test]
fn test_single_pending_frame() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();

    background.begin(&mut scheduler);
    background.begin(&mut scheduler);
    assert_eq!(scheduler.pending().len(), 1);

    run_frames(&mut background, &mut scheduler, 10);
    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(background.frames_rendered(), 11);
}

#[test]
fn test_hidden_document_pauses_and_resumes() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);

    background.set_document_hidden(true, &mut scheduler);
    assert!(!background.is_visible());
    assert!(!background.is_running());
    assert!(scheduler.pending().is_empty());
    assert_eq!(scheduler.cancelled.len(), 1);

    let frames = background.frames_rendered();
    background.set_document_hidden(false, &mut scheduler);
    assert!(background.is_visible());
    assert_eq!(background.frames_rendered(), frames + 1);
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn test_offscreen_canvas_pauses_and_resumes() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);

    background.set_canvas_intersecting(false, &mut scheduler);
    assert!(scheduler.pending().is_empty());

    // the loop exits at the top of a frame while invisible
    let frames = background.frames_rendered();
    background.on_frame(&mut scheduler);
    assert_eq!(background.frames_rendered(), frames);
    assert!(scheduler.pending().is_empty());

    background.set_canvas_intersecting(true, &mut scheduler);
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn test_resume_while_running_does_not_duplicate() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);

    // initial observer report and a spurious visibility event
    background.set_canvas_intersecting(true, &mut scheduler);
    background.set_document_hidden(false, &mut scheduler);

    assert_eq!(scheduler.pending().len(), 1);
    assert_eq!(background.frames_rendered(), 1);
}

#[test]
fn test_either_signal_resumes_shared_flag() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);

    background.set_document_hidden(true, &mut scheduler);
    background.set_canvas_intersecting(false, &mut scheduler);
    assert!(scheduler.pending().is_empty());

    background.set_canvas_intersecting(true, &mut scheduler);
    assert!(background.is_visible());
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn test_signals_ignored_without_pause_support() {
    let options = ParticleOptions {
        pause_when_hidden: false,
        ..ParticleOptions::default()
    };
    let mut background =
        ParticleBackground::start(Some(RecordingSurface::new()), &env(400.0, 300.0), &options, 3)
            .expect("Background should start");
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);

    background.set_document_hidden(true, &mut scheduler);

    assert!(background.is_visible());
    assert_eq!(scheduler.pending().len(), 1);
}

#[test]
fn test_teardown_cancels_pending_frame() {
    let mut background = start(400.0, 300.0);
    let mut scheduler = ManualScheduler::new();
    background.begin(&mut scheduler);
    let pending = scheduler.pending()[0];

    background.teardown(&mut scheduler);

    assert!(background.is_torn_down());
    assert!(scheduler.pending().is_empty());
    assert_eq!(scheduler.cancelled, vec![pending]);

    // nothing restarts the loop afterwards
    background.set_document_hidden(false, &mut scheduler);
    background.on_frame(&mut scheduler);
    background.begin(&mut scheduler);
    assert!(scheduler.pending().is_empty());
}

#[test]
fn test_parse_hex_color() {
    assert_eq!(parse_hex_color("#00ff88"), Some(Rgb::new(0, 255, 136)));
    assert_eq!(parse_hex_color("  #3572A5 "), Some(Rgb::new(0x35, 0x72, 0xa5)));
    assert_eq!(parse_hex_color("ABCDEF"), Some(Rgb::new(0xab, 0xcd, 0xef)));
    assert_eq!(parse_hex_color("#fff"), None);
    assert_eq!(parse_hex_color("teal"), None);
    assert_eq!(parse_hex_color("#gg0000"), None);
    assert_eq!(parse_hex_color("rgb(1, 2, 3)"), None);
}

#[test]
fn test_color_resolution() {
    let themed = ColorSource::Themed {
        fallback: Rgb::new(0, 255, 136),
    };
    assert_eq!(resolve_color(&themed, Some("#ff0000")), Rgb::new(255, 0, 0));
    assert_eq!(resolve_color(&themed, Some("")), Rgb::new(0, 255, 136));
    assert_eq!(resolve_color(&themed, Some("hsl(0 0% 0%)")), Rgb::new(0, 255, 136));
    assert_eq!(resolve_color(&themed, None), Rgb::new(0, 255, 136));

    let fixed = ColorSource::Fixed {
        color: Rgb::new(10, 20, 30),
    };
    assert_eq!(resolve_color(&fixed, Some("#ff0000")), Rgb::new(10, 20, 30));
}

#[test]
fn test_color_resolved_once_at_start() {
    let mut environment = env(400.0, 300.0);
    environment.primary_color = Some(" #112233".to_string());

    let background = ParticleBackground::start(
        Some(RecordingSurface::new()),
        &environment,
        &ParticleOptions::default(),
        9,
    )
    .expect("Background should start");

    assert_eq!(background.color(), Rgb::new(0x11, 0x22, 0x33));
}

#[test]
fn test_same_seed_same_field() {
    let a = start(640.0, 480.0);
    let b = start(640.0, 480.0);
    assert_eq!(a.field().particles(), b.field().particles());
}
