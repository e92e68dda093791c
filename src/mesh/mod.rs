//! Mesh upload target
//!
//! [`MeshSink`] is the seam to whatever renders the sphere. [`MeshData`] is an
//! engine-agnostic implementation holding plain arrays:
//! - Bevy: Convert to `Mesh` with attributes
//! - Godot: Convert to `ArrayMesh`
//! - wgpu: Use directly as vertex buffers

use glam::Vec3;

use crate::error::{IcosphereError, Result};

/// Width of the triangle index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexFormat {
    /// 16-bit indices, at most 65,536 addressable vertices
    #[default]
    U16,
    /// 32-bit indices
    U32,
}

impl IndexFormat {
    /// Largest vertex count this format can address
    pub fn max_vertices(self) -> usize {
        match self {
            IndexFormat::U16 => u16::MAX as usize + 1,
            IndexFormat::U32 => (u32::MAX as usize).saturating_add(1),
        }
    }
}

/// Consumer of finished vertex and triangle arrays
///
/// Mirrors the call sequence a rendering engine expects: clear, pick the index
/// width, upload vertices, upload triangles, then rebuild normals.
pub trait MeshSink {
    /// Drop all vertex, index and normal data
    fn clear(&mut self);

    /// Select the index buffer width; must precede `set_triangles`
    fn set_index_format(&mut self, format: IndexFormat);

    /// Replace the vertex positions
    fn set_vertices(&mut self, vertices: Vec<Vec3>);

    /// Replace the triangle indices of `submesh`
    fn set_triangles(&mut self, indices: Vec<u32>, submesh: usize, recalculate_bounds: bool)
        -> Result<()>;

    /// Recompute per-vertex normals from the current triangles
    fn recalculate_normals(&mut self);
}

/// Axis-aligned bounding box of the vertex positions
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Smallest box containing every point; zero-sized at the origin when empty
    pub fn from_points(points: &[[f32; 3]]) -> Self {
        let mut iter = points.iter().map(|&p| Vec3::from_array(p));
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    /// Size along each axis
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Engine-agnostic mesh data output
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, empty until `recalculate_normals` runs
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    /// Index buffer width
    pub index_format: IndexFormat,
    /// Bounding box, refreshed when triangles are set with `recalculate_bounds`
    pub bounds: Bounds,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl MeshSink for MeshData {
    fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
        self.bounds = Bounds::default();
    }

    fn set_index_format(&mut self, format: IndexFormat) {
        self.index_format = format;
    }

    fn set_vertices(&mut self, vertices: Vec<Vec3>) {
        self.positions = vertices.into_iter().map(|v| v.to_array()).collect();
        self.normals.clear();
    }

    fn set_triangles(
        &mut self,
        indices: Vec<u32>,
        submesh: usize,
        recalculate_bounds: bool,
    ) -> Result<()> {
        if submesh != 0 {
            return Err(IcosphereError::InvalidConfig(format!(
                "mesh has a single submesh (got submesh {})",
                submesh
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(IcosphereError::DegenerateGeometry(format!(
                "index count {} is not a multiple of 3",
                indices.len()
            )));
        }

        let limit = self.vertex_count().min(self.index_format.max_vertices());
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= limit) {
            return Err(IcosphereError::DegenerateGeometry(format!(
                "index {} out of range for {} vertices with {:?} indices",
                bad,
                self.vertex_count(),
                self.index_format
            )));
        }

        self.indices = indices;
        if recalculate_bounds {
            self.bounds = Bounds::from_points(&self.positions);
        }
        Ok(())
    }

    fn recalculate_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
            let (pa, pb, pc) = (
                Vec3::from_array(self.positions[a]),
                Vec3::from_array(self.positions[b]),
                Vec3::from_array(self.positions[c]),
            );
            // length is twice the triangle area, so larger faces weigh more
            let face = (pb - pa).cross(pc - pa);
            accumulated[a] += face;
            accumulated[b] += face;
            accumulated[c] += face;
        }

        self.normals = accumulated
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}
