//! Icosphere configuration and builder
//!
//! A [`SphereConfig`] fully determines the base sphere: the same configuration
//! always yields bit-identical vertex and triangle arrays.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{IcosphereError, Result};

/// Deepest subdivision the builder accepts
///
/// Depth 10 already produces 10,485,762 vertices; anything beyond that is
/// far outside what a single mesh buffer should hold.
pub const MAX_SUBDIVISION_LIMIT: usize = 10;

/// Smallest sphere radius the builder accepts
///
/// Squared vertex lengths stay normal `f32` values down to this radius.
pub const MIN_SCALE: f32 = 1e-6;

/// Largest sphere radius the builder accepts
///
/// Base vertices sit at about 1.18 × scale; their squared length overflows
/// `f32` past roughly 1.8e19, so the cap leaves headroom for displacement.
pub const MAX_SCALE: f32 = 1e15;

/// Configuration for icosphere generation
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let config = SphereConfigBuilder::new()
///     .scale(2.0)
///     .unwrap()
///     .subdivision_limit(3)
///     .unwrap()
///     .build();
///
/// assert_eq!(config.expected_vertex_count(), 642);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereConfig {
    /// Radius of the generated sphere, within [`MIN_SCALE`]..=[`MAX_SCALE`]
    pub scale: f32,

    /// Number of subdivision passes applied to the base icosahedron
    ///
    /// - 0: plain icosahedron (12 vertices, 20 triangles)
    /// - 1: 42 vertices, 80 triangles
    /// - 5: 10,242 vertices, needs 32-bit indices once past 65,535
    pub subdivision_limit: usize,
}

impl SphereConfig {
    /// Check that the configuration can produce non-degenerate geometry
    ///
    /// Builders already enforce this; it exists for configs assembled by hand
    /// or deserialized from elsewhere.
    pub fn validate(&self) -> Result<()> {
        check_scale(self.scale)?;
        check_subdivision_limit(self.subdivision_limit)
    }

    /// Vertex count the builder will produce for this configuration
    #[inline]
    pub fn expected_vertex_count(&self) -> usize {
        expected_vertex_count(self.subdivision_limit)
    }

    /// Triangle count the builder will produce for this configuration
    #[inline]
    pub fn expected_triangle_count(&self) -> usize {
        expected_triangle_count(self.subdivision_limit)
    }
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            subdivision_limit: 0,
        }
    }
}

/// Closed-form vertex count of an icosphere after `depth` passes: 10·4^d + 2
///
/// Saturates at `usize::MAX` for depths whose count does not fit.
pub fn expected_vertex_count(depth: usize) -> usize {
    scaled_power_of_four(10, depth).saturating_add(2)
}

/// Closed-form triangle count of an icosphere after `depth` passes: 20·4^d
///
/// Saturates at `usize::MAX` for depths whose count does not fit.
pub fn expected_triangle_count(depth: usize) -> usize {
    scaled_power_of_four(20, depth)
}

fn scaled_power_of_four(factor: usize, depth: usize) -> usize {
    u32::try_from(depth)
        .ok()
        .and_then(|d| 4usize.checked_pow(d))
        .and_then(|p| p.checked_mul(factor))
        .unwrap_or(usize::MAX)
}

pub(crate) fn check_scale(scale: f32) -> Result<()> {
    // also rejects NaN, which fails both comparisons
    if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
        return Err(IcosphereError::InvalidConfig(format!(
            "scale must be within {:e}..={:e} (got {})",
            MIN_SCALE, MAX_SCALE, scale
        )));
    }
    Ok(())
}

fn check_subdivision_limit(limit: usize) -> Result<()> {
    if limit > MAX_SUBDIVISION_LIMIT {
        return Err(IcosphereError::InvalidConfig(format!(
            "subdivision limit must be <= {} (got {})",
            MAX_SUBDIVISION_LIMIT, limit
        )));
    }
    Ok(())
}

/// Builder for [`SphereConfig`] with validation at every setter
#[derive(Debug, Clone, Default)]
pub struct SphereConfigBuilder {
    config: SphereConfig,
}

impl SphereConfigBuilder {
    /// Create a builder with defaults (scale 1, no subdivision)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sphere radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale is NaN or outside
    /// [`MIN_SCALE`]..=[`MAX_SCALE`]
    pub fn scale(mut self, scale: f32) -> Result<Self> {
        check_scale(scale)?;
        self.config.scale = scale;
        Ok(self)
    }

    /// Set the number of subdivision passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if limit > [`MAX_SUBDIVISION_LIMIT`]
    pub fn subdivision_limit(mut self, limit: usize) -> Result<Self> {
        check_subdivision_limit(limit)?;
        self.config.subdivision_limit = limit;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> SphereConfig {
        self.config
    }
}
