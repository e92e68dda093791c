//! Edge-keyed midpoint cache
//!
//! Two triangles sharing an edge must reuse one midpoint vertex. The cache
//! maps an unordered index pair to the index of that vertex.

use glam::Vec3;
use std::collections::HashMap;

use crate::error::{IcosphereError, Result};
use crate::geometry::midpoint;

/// Maps an unordered vertex index pair to the index of its midpoint vertex
///
/// Entries are never removed. A fresh cache is created for every full
/// generation so indices from a previous scale or depth cannot leak in.
#[derive(Debug, Clone, Default)]
pub struct MidpointCache {
    entries: HashMap<u64, u32>,
}

impl MidpointCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Order-independent key: smaller index in the high 32 bits, greater in the low
    #[inline]
    pub fn key(p1: u32, p2: u32) -> u64 {
        let (smaller, greater) = if p1 < p2 { (p1, p2) } else { (p2, p1) };
        ((smaller as u64) << 32) | greater as u64
    }

    /// Index of the midpoint between `p1` and `p2`, appending it on a miss
    ///
    /// On a hit the cached index is returned untouched. On a miss the raw
    /// (unprojected) average of both endpoints is appended to `vertices`;
    /// projection happens afterwards in one pass over the whole set.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if either endpoint is not an index into
    /// `vertices`; nothing is appended in that case.
    pub fn middle_point(&mut self, vertices: &mut Vec<Vec3>, p1: u32, p2: u32) -> Result<u32> {
        let key = Self::key(p1, p2);
        if let Some(&index) = self.entries.get(&key) {
            return Ok(index);
        }

        let endpoint = |i: u32| {
            vertices.get(i as usize).copied().ok_or_else(|| {
                IcosphereError::DegenerateGeometry(format!(
                    "edge endpoint {} out of range for {} vertices",
                    i,
                    vertices.len()
                ))
            })
        };
        let middle = midpoint(endpoint(p1)?, endpoint(p2)?);

        let index = vertices.len() as u32;
        vertices.push(middle);
        self.entries.insert(key, index);
        Ok(index)
    }

    /// Cached midpoint for an edge, if it has been created
    #[inline]
    pub fn get(&self, p1: u32, p2: u32) -> Option<u32> {
        self.entries.get(&Self::key(p1, p2)).copied()
    }

    /// Number of distinct edges split so far
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no edge has been split yet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_layout() {
        assert_eq!(MidpointCache::key(1, 2), (1u64 << 32) | 2);
        assert_eq!(MidpointCache::key(7, 3), (3u64 << 32) | 7);
    }

    #[test]
    fn test_miss_appends_average() {
        let mut cache = MidpointCache::new();
        let mut vertices = vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)];

        let index = cache.middle_point(&mut vertices, 0, 1).unwrap();

        assert_eq!(index, 2);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_hit_does_not_append() {
        let mut cache = MidpointCache::new();
        let mut vertices = vec![Vec3::X, Vec3::Y, Vec3::Z];

        let first = cache.middle_point(&mut vertices, 0, 2).unwrap();
        let second = cache.middle_point(&mut vertices, 2, 0).unwrap();

        assert_eq!(first, second);
        assert_eq!(vertices.len(), 4);
        assert_eq!(cache.get(0, 2), Some(first));
        assert_eq!(cache.get(0, 1), None);
    }

    #[test]
    fn test_out_of_range_endpoint_is_an_error() {
        let mut cache = MidpointCache::new();
        let mut vertices = vec![Vec3::X, Vec3::Y];

        let result = cache.middle_point(&mut vertices, 0, 5);

        assert!(matches!(result, Err(IcosphereError::DegenerateGeometry(_))));
        assert_eq!(vertices.len(), 2);
        assert!(cache.is_empty());
    }

    proptest! {
        #[test]
        fn proptest_key_is_symmetric(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(MidpointCache::key(a, b), MidpointCache::key(b, a));
        }

        #[test]
        fn proptest_distinct_edges_get_distinct_keys(
            a in 0u32..1000, b in 0u32..1000, c in 0u32..1000, d in 0u32..1000,
        ) {
            let same_edge = (a.min(b), a.max(b)) == (c.min(d), c.max(d));
            prop_assert_eq!(MidpointCache::key(a, b) == MidpointCache::key(c, d), same_edge);
        }
    }
}
