//! Geometry primitives shared by the builder and the generators

use glam::Vec3;

use crate::error::{IcosphereError, Result};

/// Golden ratio φ = (1 + √5) / 2
pub const PHI: f32 = 1.618_034;

/// Project a point onto the sphere of radius `scale` centered at the origin
///
/// # Errors
///
/// Returns `DegenerateGeometry` for a zero-length or non-finite point, which
/// would otherwise turn into NaN coordinates.
pub fn project_to_sphere(point: Vec3, scale: f32) -> Result<Vec3> {
    let length = point.length();
    if length == 0.0 || !length.is_finite() {
        return Err(IcosphereError::DegenerateGeometry(format!(
            "cannot project {:?} onto a sphere (length {})",
            point, length
        )));
    }
    Ok(point / length * scale)
}

/// Arithmetic midpoint of two positions
#[inline]
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) / 2.0
}

/// Outward direction of a sphere vertex, falling back to +Y at the origin
#[inline]
pub fn radial_direction(position: Vec3) -> Vec3 {
    position.try_normalize().unwrap_or(Vec3::Y)
}
