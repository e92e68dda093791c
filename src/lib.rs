//! Icosphere planet mesh generation
//!
//! Builds a subdivided icosahedral sphere and deforms it with a stack of
//! displacement generators, producing engine-agnostic vertex and triangle
//! arrays for planets and terrain-like geometry.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use icosphere_planet::*;
//!
//! let config = SphereConfigBuilder::new()
//!     .scale(10.0).unwrap()
//!     .subdivision_limit(5).unwrap()
//!     .build();
//!
//! let composer = GeneratorComposer::new()
//!     .with_generator(NoiseGenerator::new(ShapeSettings {
//!         strength: 0.8,
//!         ..ShapeSettings::with_seed(42)
//!     }))
//!     .with_generator(JitterGenerator { seed: 7, strength: 0.02 });
//!
//! let mut planet = IcospherePlanet::new(config, composer).unwrap();
//! planet.generate().unwrap();
//! println!("Generated {} triangles", planet.mesh().triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-vertex lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and generator settings

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod icosphere;
pub mod generator;
pub mod composer;
pub mod mesh;
pub mod planet;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{IcosphereError, Result};
pub use config::{SphereConfig, SphereConfigBuilder, MAX_SCALE, MAX_SUBDIVISION_LIMIT, MIN_SCALE};
pub use icosphere::{create_base_shape, generate_icosphere, Icosphere, MidpointCache};
pub use generator::{
    ConstantOffset, DisplacementGenerator, JitterGenerator, NoiseGenerator, Perlin, ShapeSettings,
};
pub use composer::GeneratorComposer;
pub use mesh::{Bounds, IndexFormat, MeshData, MeshSink};
pub use planet::{IcospherePlanet, Inspector};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
