//! A single simulated grid cell.
//!
//! Each particle remembers the pixel it was sampled from (its origin) and is
//! pulled back towards it by a damped spring while the pointer pushes it away.
//! Particles know nothing about each other; the owning [`Field`](crate::Field)
//! hands them the shared [`Pointer`] every step.

use glam::{IVec2, Vec2};
use rand::Rng;

use crate::color::Color;
use crate::config::Vibrate;
use crate::input::Pointer;
use crate::surface::Surface;

/// Velocity multiplier applied every update.
pub const FRICTION: f32 = 0.9;

/// Lower bound of the per-particle elasticity.
pub const EASE_BASE: f32 = 0.1;

/// Numerator of the repulsion force.
const FORCE_SCALE: f32 = -10.0;

/// Floor on the squared distance used in the force term.
const MIN_DISTANCE_SQ: f32 = 10.0;

/// The influence gate compares `distance_sq / INFLUENCE_DIVISOR` with the radius.
const INFLUENCE_DIVISOR: f32 = 8.0;

/// Only velocities below this are nudged by vibration.
const VIBRATE_THRESHOLD: f32 = 0.01;

/// Physical state of one rendered block.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    origin: IVec2,
    position: Vec2,
    velocity: Vec2,
    color: Color,
    size: u32,
    ease: f32,
}

impl Particle {
    /// Create a particle anchored at `origin`, scattered somewhere inside
    /// `bounds`.
    ///
    /// The origin is truncated to whole pixels and the elasticity is drawn from
    /// `[EASE_BASE, EASE_BASE + ease_range)`.
    pub fn new(
        origin: Vec2,
        color: Color,
        size: u32,
        ease_range: f32,
        bounds: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let mut particle = Self {
            origin: origin.floor().as_ivec2(),
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            color,
            size,
            ease: ease_range * rng.gen::<f32>() + EASE_BASE,
        };
        particle.warp(bounds, rng);
        particle
    }

    /// Re-anchor a pooled particle on a new cell.
    ///
    /// Position, velocity and elasticity are kept so the particle glides from
    /// wherever it is to its new home.
    pub fn reinit(&mut self, origin: Vec2, color: Color) {
        self.origin = origin.floor().as_ivec2();
        self.color = color;
    }

    /// Advance one frame.
    pub fn update(&mut self, pointer: &Pointer, vibrate: Option<&Vibrate>, rng: &mut impl Rng) {
        // An unset pointer never repels.
        if let Some(target) = pointer.position() {
            let delta = target - self.position;
            let distance_sq = delta.length_squared();
            let force = FORCE_SCALE * pointer.radius() / distance_sq.max(MIN_DISTANCE_SQ);

            if distance_sq / INFLUENCE_DIVISOR < pointer.radius() {
                let angle = delta.y.atan2(delta.x);
                self.velocity += force * Vec2::new(angle.cos(), angle.sin());
            }
        }

        self.velocity *= FRICTION;

        // One roll gates both axes. The threshold is one-sided: large negative
        // velocities still receive jitter.
        if let Some(vibrate) = vibrate {
            if rng.gen::<f32>() < vibrate.chance {
                if self.velocity.x < VIBRATE_THRESHOLD {
                    self.velocity.x += jitter(vibrate.velocity, rng);
                }
                if self.velocity.y < VIBRATE_THRESHOLD {
                    self.velocity.y += jitter(vibrate.velocity, rng);
                }
            }
        }

        self.position += self.velocity + (self.origin.as_vec2() - self.position) * self.ease;
    }

    /// Fill this particle's block on the surface.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let size = self.size as f32;
        surface.fill_rect(self.position.x, self.position.y, size, size, self.color);
    }

    /// Jump to a uniformly random point in `[0, bounds.x) x [0, bounds.y)`.
    pub fn warp(&mut self, bounds: Vec2, rng: &mut impl Rng) {
        self.position = Vec2::new(rng.gen::<f32>() * bounds.x, rng.gen::<f32>() * bounds.y);
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Edge length of the rendered block.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Per-particle elasticity, fixed at construction.
    #[inline]
    pub fn ease(&self) -> f32 {
        self.ease
    }
}

fn jitter(velocity: f32, rng: &mut impl Rng) -> f32 {
    rng.gen::<f32>() * velocity - velocity / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(200.0, 100.0);

    fn particle(rng: &mut SmallRng) -> Particle {
        Particle::new(Vec2::new(40.7, 30.2), Rgb([1, 2, 3]), 4, 0.1, BOUNDS, rng)
    }

    #[test]
    fn test_new_truncates_origin_and_scatters() {
        let mut rng = SmallRng::seed_from_u64(1);
        let p = particle(&mut rng);
        assert_eq!(p.origin(), IVec2::new(40, 30));
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert!(p.position().x >= 0.0 && p.position().x < BOUNDS.x);
        assert!(p.position().y >= 0.0 && p.position().y < BOUNDS.y);
        assert!(p.ease() >= EASE_BASE && p.ease() < EASE_BASE + 0.1);
    }

    #[test]
    fn test_converges_to_origin_without_pointer() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut p = particle(&mut rng);
        let pointer = Pointer::new(20_000.0);
        for _ in 0..500 {
            p.update(&pointer, None, &mut rng);
        }
        assert!(p.position().distance(Vec2::new(40.0, 30.0)) < 1e-3);
    }

    #[test]
    fn test_converges_with_distant_pointer() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut p = particle(&mut rng);
        let mut pointer = Pointer::new(100.0);
        // (distance^2) / 8 far above the radius everywhere in the bounds.
        pointer.set(10_000.0, 10_000.0);
        for _ in 0..500 {
            p.update(&pointer, None, &mut rng);
        }
        assert!(p.position().distance(Vec2::new(40.0, 30.0)) < 1e-3);
    }

    #[test]
    fn test_coincident_pointer_force_is_finite() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut p = particle(&mut rng);
        let mut pointer = Pointer::new(20_000.0);
        pointer.set(p.position().x, p.position().y);
        p.update(&pointer, None, &mut rng);
        assert!(p.velocity().is_finite());
        assert!(p.position().is_finite());
        // -10 * 20000 / 10, then friction.
        assert!((p.velocity().length() - 18_000.0).abs() < 1.0);
    }

    #[test]
    fn test_pointer_repels() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut p = particle(&mut rng);
        p.position = Vec2::new(50.0, 50.0);
        let mut pointer = Pointer::new(20_000.0);
        pointer.set(60.0, 50.0);
        p.update(&pointer, None, &mut rng);
        assert!(p.velocity().x < 0.0);
        assert!(p.velocity().y.abs() < 1e-3);
    }

    #[test]
    fn test_outside_gate_only_friction() {
        let mut rng = SmallRng::seed_from_u64(6);
        let mut p = particle(&mut rng);
        p.position = Vec2::new(0.0, 0.0);
        p.velocity = Vec2::new(1.0, -2.0);
        let mut pointer = Pointer::new(10.0);
        // distance_sq = 100, 100 / 8 > 10
        pointer.set(10.0, 0.0);
        p.update(&pointer, None, &mut rng);
        assert_eq!(p.velocity(), Vec2::new(0.9, -1.8));
    }

    #[test]
    fn test_vibrate_guard_is_one_sided() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut p = particle(&mut rng);
        let pointer = Pointer::new(0.0);
        let vibrate = Vibrate { chance: 1.0, velocity: 0.2 };

        // Large positive velocity: never jittered, only friction.
        p.velocity = Vec2::new(10.0, 10.0);
        p.update(&pointer, Some(&vibrate), &mut rng);
        assert_eq!(p.velocity(), Vec2::new(9.0, 9.0));

        // Large negative velocity: still jittered on both axes.
        p.velocity = Vec2::new(-10.0, -10.0);
        p.update(&pointer, Some(&vibrate), &mut rng);
        assert!((p.velocity().x + 9.0).abs() <= 0.1);
        assert!((p.velocity().y + 9.0).abs() <= 0.1);
        assert_ne!(p.velocity(), Vec2::new(-9.0, -9.0));
    }

    #[test]
    fn test_vibrate_zero_chance_never_jitters() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut p = particle(&mut rng);
        let pointer = Pointer::new(0.0);
        let vibrate = Vibrate { chance: 0.0, velocity: 5.0 };
        for _ in 0..50 {
            p.update(&pointer, Some(&vibrate), &mut rng);
            assert_eq!(p.velocity(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_reinit_keeps_motion_state() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut p = particle(&mut rng);
        p.velocity = Vec2::new(3.0, 4.0);
        let (position, ease) = (p.position(), p.ease());

        p.reinit(Vec2::new(7.9, 8.1), Rgb([9, 9, 9]));
        assert_eq!(p.origin(), IVec2::new(7, 8));
        assert_eq!(p.color(), Rgb([9, 9, 9]));
        assert_eq!(p.position(), position);
        assert_eq!(p.velocity(), Vec2::new(3.0, 4.0));
        assert_eq!(p.ease(), ease);
    }
}
