//! Component definitions for the bouncing-shapes simulation.
//!
//! Components are plain values; deriving `Debug` is all `engine_ecs` asks
//! of them.

use glam::Vec2;

/// World-space position. Circles are centred on it, rectangles hang from
/// it by their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position(pub Vec2);

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity(pub Vec2);

impl Velocity {
    /// Create a new velocity.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// A circle shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Radius in world units.
    pub radius: f32,
}

/// An axis-aligned rectangle shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Extent along x.
    pub width: f32,
    /// Extent along y.
    pub height: f32,
}

/// RGBA fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl ShapeColor {
    /// Build an opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// The colour packed as `0xRRGGBBAA`.
    #[must_use]
    pub const fn packed(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_packing() {
        let c = ShapeColor::rgb(0x12, 0x34, 0x56);
        assert_eq!(c.packed(), 0x1234_56ff);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Position::new(1.0, 2.0).0, Vec2::new(1.0, 2.0));
        assert_eq!(Velocity::default(), Velocity::new(0.0, 0.0));
    }
}
