//! Simulation systems.
//!
//! Each system is caller-owned logic that asks the world for a view and
//! mutates components in place. The [`TickLoop`](crate::tick::TickLoop)
//! invokes them in a fixed order.

use engine_ecs::{EcsError, World};
use glam::Vec2;
use serde::Deserialize;

use crate::components::{Circle, Position, Rectangle, Velocity};

/// Integrates positions: `position += velocity * dt`.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Advance every moving entity by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Fails if `Position` or `Velocity` is not registered.
    pub fn update(&self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        world
            .view::<(Position, Velocity)>()?
            .each(|_, pos, vel| pos.0 += vel.0 * dt);
        Ok(())
    }
}

/// Axis-aligned box that shapes bounce inside.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(800.0, 600.0),
        }
    }
}

/// Reflects shapes off the edges of a [`Bounds`] box.
#[derive(Debug, Clone)]
pub struct Collision {
    bounds: Bounds,
}

impl Collision {
    /// Create a collision system for the given box.
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }

    /// Flip the velocity of every shape touching an edge along that axis
    /// and clamp it back inside the box.
    ///
    /// # Errors
    ///
    /// Fails if any of the shape components is not registered.
    pub fn update(&self, world: &mut World) -> Result<(), EcsError> {
        let Bounds { min, max } = self.bounds;

        world
            .view::<(Position, Velocity, Circle)>()?
            .each(|_, pos, vel, circle| {
                let r = Vec2::splat(circle.radius);
                bounce(&mut pos.0, &mut vel.0, min + r, max - r);
            });

        world
            .view::<(Position, Velocity, Rectangle)>()?
            .each(|_, pos, vel, rect| {
                let size = Vec2::new(rect.width, rect.height);
                bounce(&mut pos.0, &mut vel.0, min, max - size);
            });

        Ok(())
    }
}

/// Reflects `vel` on every axis where the anchor `pos` has reached the
/// allowed range `[lo, hi]`, and pulls `pos` back into it.
fn bounce(pos: &mut Vec2, vel: &mut Vec2, lo: Vec2, hi: Vec2) {
    if pos.x <= lo.x || pos.x >= hi.x {
        vel.x = -vel.x;
        pos.x = clamp_axis(pos.x, lo.x, hi.x);
    }
    if pos.y <= lo.y || pos.y >= hi.y {
        vel.y = -vel.y;
        pos.y = clamp_axis(pos.y, lo.y, hi.y);
    }
}

/// `f32::clamp` panics when `lo > hi`, which happens for a shape larger
/// than the box; pin such shapes to `lo`.
fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi { lo } else { value.clamp(lo, hi) }
}
