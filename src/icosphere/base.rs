//! Base icosahedron
//!
//! Twelve vertices built from three orthogonal golden rectangles, twenty
//! triangles with counter-clockwise winding when viewed from outside.

use glam::Vec3;

use super::Icosphere;
use crate::config::check_scale;
use crate::error::Result;
use crate::geometry::PHI;

/// Number of vertices in the base icosahedron
pub const BASE_VERTEX_COUNT: usize = 12;

/// Number of triangles in the base icosahedron
pub const BASE_TRIANGLE_COUNT: usize = 20;

const BASE_TRIANGLES: [u32; BASE_TRIANGLE_COUNT * 3] = [
    2, 1, 0, //
    1, 2, 3, //
    5, 4, 3, //
    4, 8, 3, //
    7, 6, 0, //
    6, 9, 0, //
    11, 10, 4, //
    10, 11, 6, //
    9, 5, 2, //
    5, 9, 11, //
    8, 7, 1, //
    7, 8, 10, //
    2, 5, 3, //
    8, 1, 3, //
    9, 2, 0, //
    1, 7, 0, //
    11, 9, 6, //
    7, 10, 6, //
    5, 11, 4, //
    10, 8, 4, //
];

/// Build the unsubdivided icosahedron for a sphere of radius `scale`
///
/// Vertices are placed at `(0, ±b, ±a)`, `(±b, ±a, 0)` and `(±a, 0, ±b)` with
/// `a = scale` and `b = scale / φ`, so they sit slightly outside the target
/// sphere (|v| ≈ 1.1756 · scale) until projected.
///
/// # Errors
///
/// Returns `InvalidConfig` if scale is NaN or outside
/// [`MIN_SCALE`](crate::config::MIN_SCALE)..=[`MAX_SCALE`](crate::config::MAX_SCALE)
pub fn create_base_shape(scale: f32) -> Result<Icosphere> {
    check_scale(scale)?;

    let a = scale;
    let b = scale / PHI;

    let vertices = vec![
        Vec3::new(0.0, b, -a),
        Vec3::new(b, a, 0.0),
        Vec3::new(-b, a, 0.0),
        Vec3::new(0.0, b, a),
        Vec3::new(0.0, -b, a),
        Vec3::new(-a, 0.0, b),
        Vec3::new(0.0, -b, -a),
        Vec3::new(a, 0.0, -b),
        Vec3::new(a, 0.0, b),
        Vec3::new(-a, 0.0, -b),
        Vec3::new(b, -a, 0.0),
        Vec3::new(-b, -a, 0.0),
    ];

    Ok(Icosphere {
        scale,
        vertices,
        triangles: BASE_TRIANGLES.to_vec(),
    })
}
