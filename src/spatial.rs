//! Spatial indexing for position-to-vertex lookups
//!
//! This module is only available with the `spatial-index` feature.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over sphere vertex positions
///
/// Turns a 3D position (a raycast hit, a spawn point handed to a secondary
/// hook) into the index of the closest vertex in O(log n).
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n), about 24 comparisons at depth 10
/// - Memory: ~20 bytes per vertex
#[derive(Clone)]
pub struct SpatialIndex {
    // kiddo cannot build a tree from zero points
    tree: Option<ImmutableKdTree<f32, usize, 3, 32>>,
    len: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    /// Build the index from vertex positions
    ///
    /// # Arguments
    ///
    /// * `positions` - Vertex positions; the item stored for each is its index
    ///
    /// # Example
    ///
    /// ```
    /// use icosphere_planet::*;
    ///
    /// let positions = vec![
    ///     Vec3::new(1.0, 0.0, 0.0),
    ///     Vec3::new(0.0, 1.0, 0.0),
    ///     Vec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&positions);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), Some(0));
    /// ```
    pub fn new(positions: &[Vec3]) -> Self {
        // Convert to kiddo's array format
        let points: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();

        Self {
            tree: (!points.is_empty()).then(|| ImmutableKdTree::new_from_slice(&points)),
            len: points.len(),
        }
    }

    /// Find the vertex closest to a position
    ///
    /// # Arguments
    ///
    /// * `position` - Query point, anywhere in space
    ///
    /// # Returns
    ///
    /// Index of the nearest vertex, or `None` for an empty index
    pub fn find_nearest(&self, position: Vec3) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(result.item as usize)
    }

    /// Number of indexed positions
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no positions
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SphereConfig;
    use crate::icosphere::generate_icosphere;

    #[test]
    fn test_spatial_index_basic() {
        let positions = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];

        let index = SpatialIndex::new(&positions);

        assert_eq!(index.find_nearest(Vec3::new(0.9, 0.1, 0.0)), Some(0));
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.95, 0.0)), Some(1));
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.1, 0.9)), Some(2));
        assert_eq!(index.find_nearest(Vec3::new(-0.8, 0.0, 0.0)), Some(3));
    }

    #[test]
    fn test_every_sphere_vertex_finds_itself() {
        let config = SphereConfig {
            scale: 4.0,
            subdivision_limit: 2,
        };
        let sphere = generate_icosphere(&config).unwrap();
        let index = SpatialIndex::new(&sphere.vertices);

        assert_eq!(index.len(), sphere.vertex_count());
        for (i, v) in sphere.vertices.iter().enumerate() {
            assert_eq!(index.find_nearest(*v), Some(i));
        }
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.find_nearest(Vec3::X), None);
    }
}
