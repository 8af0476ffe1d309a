use super::color::{resolve_color, Rgb};
use super::field::{connection_opacity, particle_count, ParticleField};
use super::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
use super::surface::DrawSurface;
use crate::config::ParticleOptions;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// What the page reports about its surroundings when the backdrop starts.
#[derive(Debug, Clone, Default)]
pub struct ParticleEnvironment {
    pub width: f64,
    pub height: f64,
    pub prefers_reduced_motion: bool,
    /// Value of `--color-primary` on the document root, if any.
    pub primary_color: Option<String>,
}

/// Animated particle backdrop bound to one canvas.
///
/// The loop only re-arms itself from inside a frame. Visibility changes flip a
/// single flag and either cancel the pending frame or run one fresh frame, so
/// at most one frame is ever pending.
pub struct ParticleBackground<S> {
    surface: S,
    field: ParticleField,
    color: Rgb,
    options: ParticleOptions,
    visible: bool,
    pending: Option<FrameHandle>,
    torn_down: bool,
    frames_rendered: u64,
}

impl<S: DrawSurface> ParticleBackground<S> {
    /// Set up the backdrop, or return `None` when there is no canvas or the
    /// user asked for reduced motion.
    pub fn start(
        canvas: Option<S>,
        env: &ParticleEnvironment,
        options: &ParticleOptions,
        seed: u64,
    ) -> Option<Self> {
        let Some(surface) = canvas else {
            debug!("No particle canvas on the page");
            return None;
        };
        if options.respect_reduced_motion && env.prefers_reduced_motion {
            info!("Reduced motion requested, particle background disabled");
            return None;
        }

        let count = particle_count(env.width, options);
        let mut rng = SmallRng::seed_from_u64(seed);
        let field = ParticleField::new(count, env.width, env.height, &mut rng);
        let color = resolve_color(&options.color, env.primary_color.as_deref());

        info!(particles = count, width = env.width, height = env.height, "Particle background started");
        Some(Self::from_parts(surface, field, color, options.clone()))
    }

    pub fn from_parts(mut surface: S, field: ParticleField, color: Rgb, options: ParticleOptions) -> Self {
        surface.set_size(field.width() as u32, field.height() as u32);
        Self {
            surface,
            field,
            color,
            options,
            visible: true,
            pending: None,
            torn_down: false,
            frames_rendered: 0,
        }
    }

    /// Run the first frame. Does nothing if a frame is already pending.
    pub fn begin<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if self.pending.is_none() {
            self.tick(scheduler);
        }
    }

    /// Frame callback: the pending frame has fired.
    pub fn on_frame<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        self.pending = None;
        self.tick(scheduler);
    }

    fn tick<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if !self.visible || self.torn_down {
            return;
        }
        self.render_frame();
        match scheduler.request_frame() {
            Ok(handle) => self.pending = Some(handle),
            Err(err) => warn!(%err, "Could not schedule the next particle frame"),
        }
    }

    /// Clear, advance every particle, then draw particles and their connections.
    pub fn render_frame(&mut self) {
        let Self {
            surface,
            field,
            color,
            options,
            ..
        } = self;

        surface.clear(field.width(), field.height());
        field.step();

        let particles = field.particles();
        for (i, particle) in particles.iter().enumerate() {
            surface.fill_circle(
                particle.x,
                particle.y,
                particle.radius,
                color.with_alpha(particle.opacity),
            );

            for other in &particles[i + 1..] {
                let distance = particle.distance_to(other);
                if let Some(opacity) =
                    connection_opacity(distance, options.connect_distance, options.max_line_opacity)
                {
                    surface.stroke_line(
                        (particle.x, particle.y),
                        (other.x, other.y),
                        color.with_alpha(opacity),
                        options.line_width,
                    );
                }
            }
        }
        self.frames_rendered += 1;
    }

    /// Render exactly `frames` frames by firing each pending frame in turn.
    /// Stops early once the loop no longer re-arms itself.
    pub fn run_frames(&mut self, scheduler: &mut ManualScheduler, frames: u32) {
        if frames == 0 {
            return;
        }
        self.begin(scheduler);
        for _ in 1..frames {
            if scheduler.fire_next().is_none() {
                break;
            }
            self.on_frame(scheduler);
        }
    }

    /// Viewport resized. The particle count stays what it was at start.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.field.resize(width, height);
        self.surface.set_size(width as u32, height as u32);
        debug!(width, height, "Particle canvas resized");
    }

    /// Intersection signal for the canvas element.
    pub fn set_canvas_intersecting<F: FrameScheduler>(&mut self, intersecting: bool, scheduler: &mut F) {
        if intersecting {
            self.resume(scheduler);
        } else {
            self.pause(scheduler);
        }
    }

    /// Page visibility signal (tab hidden or shown).
    pub fn set_document_hidden<F: FrameScheduler>(&mut self, hidden: bool, scheduler: &mut F) {
        if hidden {
            self.pause(scheduler);
        } else {
            self.resume(scheduler);
        }
    }

    fn pause<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if !self.options.pause_when_hidden {
            return;
        }
        self.visible = false;
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
            debug!("Particle loop paused");
        }
    }

    fn resume<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        if !self.options.pause_when_hidden || self.visible || self.torn_down {
            return;
        }
        self.visible = true;
        debug!("Particle loop resumed");
        self.tick(scheduler);
    }

    /// Page is unloading: drop the pending frame and never schedule another.
    pub fn teardown<F: FrameScheduler>(&mut self, scheduler: &mut F) {
        self.torn_down = true;
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        info!(frames = self.frames_rendered, "Particle background stopped");
    }

    pub fn particle_count(&self) -> usize {
        self.field.len()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// True while a frame is pending.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}
