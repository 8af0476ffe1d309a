use crate::config::ParticleOptions;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    /// Random position on the canvas, slow drift, radius in [0, 2), opacity in [0, 0.5).
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            vx: (rng.random::<f64>() - 0.5) * 0.5,
            vy: (rng.random::<f64>() - 0.5) * 0.5,
            radius: rng.random::<f64>() * 2.0,
            opacity: rng.random::<f64>() * 0.5,
        }
    }

    pub fn update(&mut self, width: f64, height: f64) {
        self.x = wrap(self.x + self.vx, width);
        self.y = wrap(self.y + self.vy, height);
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Toroidal wrap into `[0, extent)`.
fn wrap(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// `min(max_particles, floor(width / spacing))`
pub fn particle_count(width: f64, options: &ParticleOptions) -> usize {
    if width <= 0.0 || options.spacing <= 0.0 {
        return 0;
    }
    let by_width = (width / options.spacing).floor() as usize;
    by_width.min(options.max_particles)
}

/// Opacity of the line joining two particles `distance` apart, or `None`
/// when they are too far apart to be connected.
pub fn connection_opacity(distance: f64, max_distance: f64, max_opacity: f64) -> Option<f64> {
    if distance < max_distance {
        Some(max_opacity * (1.0 - distance / max_distance))
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
}

impl ParticleField {
    pub fn new<R: Rng>(count: usize, width: f64, height: f64, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle::random(rng, width, height))
            .collect();
        Self {
            particles,
            width,
            height,
        }
    }

    pub fn from_particles(particles: Vec<Particle>, width: f64, height: f64) -> Self {
        Self {
            particles,
            width,
            height,
        }
    }

    /// New bounds for wrapping. The particle set itself is kept as is.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for particle in &mut self.particles {
            particle.update(width, height);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}
