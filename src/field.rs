// The particle field owns every particle plus the viewport bounds they bounce
// inside. A resize throws the whole set away and samples a fresh one.

use crate::color::Color;
use crate::particle::Particle;
use crate::surface::{Bounds, LinearGradient, Surface};
use rand::Rng;

pub const PARTICLE_COUNT: usize = 100;

pub const PALETTE: [Color; 4] = [
    Color::from_u32(0x00FF00FF),
    Color::from_u32(0x00FFFFFF),
    Color::from_u32(0xFFD700FF),
    Color::from_u32(0xFFFFFFFF),
];

pub const BACKGROUND_START: Color = Color::from_u32(0x004D40FF);
pub const BACKGROUND_END: Color = Color::from_u32(0x00BFFFFF);

const MIN_RADIUS: f64 = 1.0;
const MAX_RADIUS: f64 = 4.0;
const MAX_SPEED: f64 = 1.0;

pub struct ParticleField {
    bounds: Bounds,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(bounds: Bounds) -> ParticleField {
        let mut field = ParticleField {
            bounds,
            particles: Vec::with_capacity(PARTICLE_COUNT),
        };
        field.initialize(bounds);
        field
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn initialize(&mut self, bounds: Bounds) {
        self.initialize_with(bounds, &mut rand::thread_rng());
    }

    /// Fills the field with freshly sampled particles drawn from `rng`.
    pub fn initialize_with<R: Rng>(&mut self, bounds: Bounds, rng: &mut R) {
        self.bounds = bounds;
        self.particles.reserve(PARTICLE_COUNT);
        for _ in 0..PARTICLE_COUNT {
            let p = sample_particle(bounds, rng);
            self.particles.push(p);
        }
    }

    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.fill_linear_gradient(&LinearGradient::diagonal(
            self.bounds,
            BACKGROUND_START,
            BACKGROUND_END,
        ));
        for particle in &mut self.particles {
            particle.advance(self.bounds, surface);
        }
    }

    pub fn on_resize(&mut self, bounds: Bounds) {
        self.on_resize_with(bounds, &mut rand::thread_rng());
    }

    pub fn on_resize_with<R: Rng>(&mut self, bounds: Bounds, rng: &mut R) {
        log::debug!(
            "regenerating {} particles for {}x{}",
            PARTICLE_COUNT,
            bounds.width,
            bounds.height
        );
        self.particles.clear();
        self.initialize_with(bounds, rng);
    }
}

fn sample_particle<R: Rng>(bounds: Bounds, rng: &mut R) -> Particle {
    let pos_x = sample_axis(bounds.width, rng);
    let pos_y = sample_axis(bounds.height, rng);
    let radius = rng.gen::<f64>() * (MAX_RADIUS - MIN_RADIUS) + MIN_RADIUS;
    let color = PALETTE[rng.gen_range(0, PALETTE.len())];
    let vel_x = (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED;
    let vel_y = (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED;

    Particle::new(
        glm::vec2(pos_x, pos_y),
        radius,
        color,
        glm::vec2(vel_x, vel_y),
    )
}

// A collapsed viewport puts everything on the origin of that axis
fn sample_axis<R: Rng>(extent: f64, rng: &mut R) -> f64 {
    if extent > 0.0 {
        rng.gen::<f64>() * extent
    } else {
        0.0
    }
}
