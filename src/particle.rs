// Simple particle struct to keep track of individual position, velocity, and color.
// Radius and color never change after creation; velocity only ever flips sign.

use crate::color::Color;
use crate::surface::{Bounds, Surface};
use glm::DVec2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: DVec2,
    vel: DVec2,
    radius: f64,
    color: Color,
}

impl Particle {
    pub fn new(pos: DVec2, radius: f64, color: Color, vel: DVec2) -> Particle {
        Particle {
            pos,
            vel,
            radius,
            color,
        }
    }

    pub fn vel(&self) -> DVec2 {
        self.vel
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.fill_circle(self.pos, self.radius, self.color);
    }

    /// Moves one unscaled step, reflects off the viewport edges and draws.
    ///
    /// The edge check runs after the move, so a particle may be drawn up to
    /// one step outside the bounds before it turns around.
    pub fn advance<S: Surface + ?Sized>(&mut self, bounds: Bounds, surface: &mut S) {
        self.pos += self.vel;

        if self.pos.x < 0.0 || self.pos.x > bounds.width {
            self.vel.x *= -1.0;
        }
        if self.pos.y < 0.0 || self.pos.y > bounds.height {
            self.vel.y *= -1.0;
        }

        self.render(surface);
    }
}
