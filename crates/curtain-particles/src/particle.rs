#![forbid(unsafe_code)]

//! Particle state, seeding and the per-frame physics.

use curtain_core::geometry::{Point, Velocity, Viewport};

use crate::rng::Xorshift64;

/// Pairs closer than this (px) get a connector.
pub const PROXIMITY_RADIUS: f32 = 150.0;
/// Connector alpha at zero distance.
pub const MAX_LINK_OPACITY: f32 = 0.15;
/// Connector stroke width (px).
pub const LINK_WIDTH: f32 = 0.5;

const MIN_RADIUS: f32 = 1.0;
const MAX_RADIUS: f32 = 3.0;
/// Per-axis speed bound in px per frame.
const MAX_SPEED: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Velocity,
    pub radius: f32,
}

impl Particle {
    /// Scatter one particle uniformly over `viewport`.
    pub fn random(rng: &mut Xorshift64, viewport: Viewport) -> Self {
        let position = Point::new(
            rng.range(0.0, viewport.width),
            rng.range(0.0, viewport.height),
        );
        let radius = rng.range(MIN_RADIUS, MAX_RADIUS);
        let velocity = Velocity::new(
            rng.range(-MAX_SPEED, MAX_SPEED),
            rng.range(-MAX_SPEED, MAX_SPEED),
        );
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Move by one frame of velocity and wrap onto the viewport.
    #[inline]
    pub fn advance(&mut self, viewport: Viewport) {
        self.position = viewport.wrap(self.position.offset(self.velocity));
    }
}

/// Seed `count` particles.
#[must_use]
pub fn seed(count: usize, viewport: Viewport, rng: &mut Xorshift64) -> Vec<Particle> {
    (0..count).map(|_| Particle::random(rng, viewport)).collect()
}

/// Connector opacity for two particles `distance` apart, or `None` when they
/// are too far apart to connect.
///
/// Decays linearly from [`MAX_LINK_OPACITY`] at zero to zero at
/// [`PROXIMITY_RADIUS`].
#[inline]
#[must_use]
pub fn connection_opacity(distance: f32) -> Option<f32> {
    if !(0.0..PROXIMITY_RADIUS).contains(&distance) {
        return None;
    }
    Some(MAX_LINK_OPACITY * (1.0 - distance / PROXIMITY_RADIUS))
}
