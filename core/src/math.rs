//! Math type aliases and helper functions.
//!
//! Definitions store positions as plain `[f32; 2]` arrays so they serialize
//! cleanly. Runtime evaluation converts to nalgebra vectors through the
//! helpers below.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// Convert a `[x, y]` array to a [`Vec2`].
pub fn vec2_from_array(a: [f32; 2]) -> Vec2 {
    Vec2::new(a[0], a[1])
}

/// Convert a [`Vec2`] to a `[x, y]` array.
pub fn vec2_to_array(v: Vec2) -> [f32; 2] {
    [v.x, v.y]
}

/// Rotate a vector by `degrees` using the standard 2D rotation matrix.
pub fn rotate_vector(v: Vec2, degrees: f32) -> Vec2 {
    nalgebra::Rotation2::new(degrees.to_radians()) * v
}

/// Rotate `point` around `anchor` by `degrees`.
pub fn rotate_around(point: Vec2, anchor: Vec2, degrees: f32) -> Vec2 {
    anchor + rotate_vector(point - anchor, degrees)
}

/// Reflect an x coordinate across the vertical midline of a canvas `width` wide.
pub fn reflect_x(x: f32, width: f32) -> f32 {
    width - x
}
