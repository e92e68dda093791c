//! Displacement generators
//!
//! A generator looks at the base sphere vertices and returns one offset
//! vector per vertex. Generators never see each other's output; the
//! [`GeneratorComposer`](crate::composer::GeneratorComposer) sums their
//! offsets onto the base positions.

mod perlin;

pub use perlin::Perlin;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::radial_direction;

/// Capability contract for anything that deforms the base sphere
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// struct Bulge;
///
/// impl DisplacementGenerator for Bulge {
///     fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
///         vertices.iter().map(|v| *v * 0.1).collect()
///     }
/// }
///
/// let offsets = Bulge.generate(&[Vec3::X]);
/// assert_eq!(offsets, vec![Vec3::new(0.1, 0.0, 0.0)]);
/// ```
pub trait DisplacementGenerator {
    /// Name used in logs and contract-violation errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Per-vertex offsets (not absolute positions), one for each input vertex
    fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3>;

    /// Auxiliary position-keyed work such as scattering detail objects
    ///
    /// No ordering is guaranteed relative to other generators' hooks.
    fn generate_secondary(&mut self, _position: Vec3, _scale: f32) {}
}

/// Parameters shared by the noise-driven generators
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSettings {
    /// Seed for the noise field or random stream
    pub seed: u32,
    /// Maximum displacement along the vertex normal, in world units
    pub strength: f32,
    /// Frequency applied to the unit direction before sampling
    pub frequency: f32,
    /// Number of fBm layers
    pub octaves: usize,
    /// Amplitude decay per octave
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Normalized noise below this level produces no displacement (sea floor)
    pub min_value: f32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            seed: 0,
            strength: 0.1,
            frequency: 1.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            min_value: 0.0,
        }
    }
}

impl ShapeSettings {
    /// Default settings with the given seed
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

/// Moves every vertex by the same vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantOffset(pub Vec3);

impl DisplacementGenerator for ConstantOffset {
    fn name(&self) -> &str {
        "constant-offset"
    }

    fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
        vec![self.0; vertices.len()]
    }
}

/// Raises terrain radially using fractal Perlin noise
///
/// The noise is sampled at each vertex direction, remapped to [0, 1], cut off
/// below `min_value` and scaled by `strength`.
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    settings: ShapeSettings,
    perlin: Perlin,
}

impl NoiseGenerator {
    /// Create a generator; the noise table is derived from `settings.seed`
    pub fn new(settings: ShapeSettings) -> Self {
        Self {
            perlin: Perlin::new(settings.seed),
            settings,
        }
    }

    /// Settings this generator was built with
    #[inline]
    pub fn settings(&self) -> &ShapeSettings {
        &self.settings
    }

    /// Radial elevation for a direction on the unit sphere
    pub fn elevation(&self, direction: Vec3) -> f32 {
        let s = &self.settings;
        let raw = self
            .perlin
            .fbm(direction * s.frequency, s.octaves, s.persistence, s.lacunarity);
        let normalized = ((raw + 1.0) * 0.5).clamp(0.0, 1.0);
        (normalized - s.min_value).max(0.0) * s.strength
    }
}

impl DisplacementGenerator for NoiseGenerator {
    fn name(&self) -> &str {
        "perlin-noise"
    }

    fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
        vertices
            .iter()
            .map(|&v| {
                let direction = radial_direction(v);
                direction * self.elevation(direction)
            })
            .collect()
    }
}

/// Deterministic per-vertex radial jitter in `[-strength, strength]`
///
/// A NaN or infinite `strength` produces zero offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterGenerator {
    /// Seed for the ChaCha8 stream
    pub seed: u32,
    /// Largest displacement in either direction
    pub strength: f32,
}

impl DisplacementGenerator for JitterGenerator {
    fn name(&self) -> &str {
        "jitter"
    }

    fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
        if !self.strength.is_finite() {
            log::warn!("jitter strength {} is not finite, skipping", self.strength);
            return vec![Vec3::ZERO; vertices.len()];
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed as u64);
        let strength = self.strength.abs();
        // sample a unit range so strengths near f32::MAX cannot overflow it
        vertices
            .iter()
            .map(|&v| radial_direction(v) * (rng.gen_range(-1.0f32..=1.0) * strength))
            .collect()
    }
}
