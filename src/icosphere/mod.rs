//! Icosphere construction
//!
//! Builds a closed, manifold sphere by recursively subdividing an icosahedron.
//!
//! # Algorithm
//!
//! 1. Create the base 12-vertex / 20-triangle icosahedron
//! 2. Project every vertex onto the sphere of radius `scale`
//! 3. For each subdivision pass:
//!    - split every triangle `(v1, v2, v3)` into `(v1, a, c)`, `(v2, b, a)`,
//!      `(v3, c, b)`, `(a, b, c)` using cached edge midpoints
//!    - project the whole vertex set back onto the sphere
//!
//! Vertex indices are append-only, so an index stays valid once assigned.

mod base;
mod cache;

pub use base::{create_base_shape, BASE_TRIANGLE_COUNT, BASE_VERTEX_COUNT};
pub use cache::MidpointCache;

use glam::Vec3;
use std::time::Instant;

use crate::config::SphereConfig;
use crate::error::{IcosphereError, Result};
use crate::geometry::project_to_sphere;

/// Vertex and triangle arrays of a sphere mesh
///
/// `triangles` is flattened: every three consecutive entries index one
/// triangle in `vertices`, wound counter-clockwise when seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Icosphere {
    /// Radius the vertices are projected to
    pub scale: f32,
    /// Vertex positions, indexed by triangle entries
    pub vertices: Vec<Vec3>,
    /// Flattened triangle indices (length is a multiple of 3)
    pub triangles: Vec<u32>,
}

impl Icosphere {
    /// Get the number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Check that the triangle list is well formed
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the index count is not a multiple of 3
    /// or any index points past the end of the vertex set.
    pub fn validate_indices(&self) -> Result<()> {
        if self.triangles.len() % 3 != 0 {
            return Err(IcosphereError::DegenerateGeometry(format!(
                "triangle index count {} is not a multiple of 3",
                self.triangles.len()
            )));
        }
        let count = self.vertices.len();
        if let Some(&bad) = self.triangles.iter().find(|&&i| i as usize >= count) {
            return Err(IcosphereError::DegenerateGeometry(format!(
                "triangle index {} out of range for {} vertices",
                bad, count
            )));
        }
        Ok(())
    }

    /// Project every vertex onto the sphere of radius `self.scale`
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if any vertex has zero length; the vertex
    /// set is left untouched in that case.
    pub fn normalize(&mut self) -> Result<()> {
        let projected = self
            .vertices
            .iter()
            .map(|&v| project_to_sphere(v, self.scale))
            .collect::<Result<Vec<_>>>()?;
        self.vertices = projected;
        Ok(())
    }

    /// Apply `depth` subdivision passes, sharing midpoints through `cache`
    ///
    /// Each pass quadruples the triangle count and adds one vertex per
    /// unique edge. Depth 0 leaves the mesh unchanged.
    pub fn subdivide(&mut self, depth: usize, cache: &mut MidpointCache) -> Result<()> {
        for pass in 0..depth {
            let mut new_triangles = Vec::with_capacity(self.triangles.len() * 4);

            for tri in self.triangles.chunks_exact(3) {
                let (v1, v2, v3) = (tri[0], tri[1], tri[2]);

                let a = cache.middle_point(&mut self.vertices, v1, v2)?;
                let b = cache.middle_point(&mut self.vertices, v2, v3)?;
                let c = cache.middle_point(&mut self.vertices, v3, v1)?;

                new_triangles.extend_from_slice(&[
                    v1, a, c, //
                    v2, b, a, //
                    v3, c, b, //
                    a, b, c, //
                ]);
            }

            self.triangles = new_triangles;
            self.normalize()?;

            log::trace!(
                "subdivision pass {}: {} vertices, {} triangles",
                pass + 1,
                self.vertex_count(),
                self.triangle_count()
            );
        }
        Ok(())
    }
}

/// Build the projected, subdivided sphere described by `config`
///
/// A fresh [`MidpointCache`] is created for every call, so repeated calls with
/// the same configuration return identical arrays.
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let config = SphereConfigBuilder::new()
///     .scale(2.0)
///     .unwrap()
///     .subdivision_limit(1)
///     .unwrap()
///     .build();
///
/// let sphere = generate_icosphere(&config).unwrap();
/// assert_eq!(sphere.vertex_count(), 42);
/// assert_eq!(sphere.triangle_count(), 80);
/// ```
pub fn generate_icosphere(config: &SphereConfig) -> Result<Icosphere> {
    config.validate()?;
    let start = Instant::now();

    let mut cache = MidpointCache::new();
    let mut sphere = create_base_shape(config.scale)?;
    sphere.normalize()?;
    sphere.subdivide(config.subdivision_limit, &mut cache)?;

    log::debug!(
        "built icosphere (scale {}, depth {}): {} vertices, {} triangles in {:.2?}",
        config.scale,
        config.subdivision_limit,
        sphere.vertex_count(),
        sphere.triangle_count(),
        start.elapsed()
    );

    Ok(sphere)
}
