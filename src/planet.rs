//! IcospherePlanet: the mesh object tying builder, composer and renderer together

use glam::Vec3;

use crate::composer::GeneratorComposer;
use crate::config::SphereConfig;
use crate::error::Result;
use crate::icosphere::{generate_icosphere, Icosphere};
use crate::mesh::{IndexFormat, MeshData, MeshSink};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// A displaced icosphere bound to a rendering target
///
/// Generic over the mesh sink `S` so any engine can receive the arrays.
/// Every regeneration either fully succeeds or leaves the previously uploaded
/// mesh untouched.
///
/// # Examples
///
/// ```
/// use icosphere_planet::*;
///
/// let config = SphereConfigBuilder::new()
///     .scale(2.0)
///     .unwrap()
///     .subdivision_limit(1)
///     .unwrap()
///     .build();
///
/// let composer = GeneratorComposer::new()
///     .with_generator(NoiseGenerator::new(ShapeSettings::with_seed(42)));
///
/// let mut planet = IcospherePlanet::new(config, composer).unwrap();
/// planet.start().unwrap();
/// assert!(planet.generate().unwrap());
/// assert_eq!(planet.mesh().vertex_count(), 42);
/// ```
#[derive(Debug)]
pub struct IcospherePlanet<S = MeshData> {
    /// Configuration used for the next regeneration
    config: SphereConfig,

    /// Displacement generators applied by `generate`
    composer: GeneratorComposer,

    /// Base sphere from the last successful regeneration
    sphere: Option<Icosphere>,

    /// Rendering target that owns the uploaded arrays
    mesh: S,

    /// Activation gate for `generate`
    active: bool,

    /// Nearest-vertex lookup over the base sphere
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl IcospherePlanet<MeshData> {
    /// Create an active planet that uploads into a fresh [`MeshData`]
    ///
    /// # Arguments
    ///
    /// * `config` - Sphere configuration (scale, subdivision limit)
    /// * `composer` - Displacement generators applied by `generate`
    ///
    /// # Returns
    ///
    /// `Result<IcospherePlanet>` - Planet with nothing generated yet, or error
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn new(config: SphereConfig, composer: GeneratorComposer) -> Result<Self> {
        Self::with_sink(config, composer, MeshData::default())
    }
}

impl<S: MeshSink> IcospherePlanet<S> {
    /// Create an active planet uploading into `mesh`
    ///
    /// Nothing is generated until [`start`](Self::start),
    /// [`generate_mesh`](Self::generate_mesh) or [`generate`](Self::generate).
    ///
    /// # Arguments
    ///
    /// * `config` - Sphere configuration, validated here
    /// * `composer` - Displacement generators applied by `generate`
    /// * `mesh` - Rendering target that receives every upload
    ///
    /// # Returns
    ///
    /// `Result<IcospherePlanet<S>>` - Planet bound to `mesh`, or error
    ///
    /// # Example
    ///
    /// ```
    /// use icosphere_planet::*;
    ///
    /// let planet = IcospherePlanet::with_sink(
    ///     SphereConfig::default(),
    ///     GeneratorComposer::new(),
    ///     MeshData::default(),
    /// )
    /// .unwrap();
    /// assert!(planet.mesh().is_empty());
    /// ```
    pub fn with_sink(config: SphereConfig, composer: GeneratorComposer, mesh: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            composer,
            sphere: None,
            mesh,
            active: true,
            #[cfg(feature = "spatial-index")]
            spatial_index: None,
        })
    }

    /// Lifecycle initialization: build and upload the base sphere once
    pub fn start(&mut self) -> Result<()> {
        self.generate_mesh()
    }

    /// Rebuild the base sphere and upload it without displacement
    ///
    /// Runs create-shape, subdivide and upload synchronously; safe to call
    /// repeatedly.
    pub fn generate_mesh(&mut self) -> Result<()> {
        let sphere = generate_icosphere(&self.config)?;
        sphere.validate_indices()?;

        upload(&mut self.mesh, sphere.vertices.clone(), sphere.triangles.clone())?;
        self.store_sphere(sphere);
        Ok(())
    }

    /// Rebuild the base sphere and upload it displaced by every generator
    ///
    /// Returns `Ok(false)` without touching the mesh when the planet is
    /// inactive.
    ///
    /// # Returns
    ///
    /// `Ok(true)` once the displaced mesh has been uploaded
    ///
    /// # Performance
    ///
    /// Rebuilds the sphere from scratch (O(4^depth)), runs every generator
    /// over its own copy of the vertices, then rebuilds the spatial index
    /// in O(n log n).
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` if a generator misbehaves; the previously
    /// uploaded mesh stays as it was.
    pub fn generate(&mut self) -> Result<bool> {
        if !self.active {
            log::warn!("planet is inactive, skipping regeneration");
            return Ok(false);
        }

        // Build and check everything before the sink is touched
        let sphere = generate_icosphere(&self.config)?;
        sphere.validate_indices()?;
        let displaced = self.composer.compose(&sphere.vertices)?;

        // Upload displaced positions, keep the undisplaced sphere for lookups
        upload(&mut self.mesh, displaced, sphere.triangles.clone())?;
        self.store_sphere(sphere);
        Ok(true)
    }

    /// Forward a position to every generator's secondary hook
    pub fn generate_secondary(&mut self, position: Vec3) {
        let scale = self.config.scale;
        self.composer.generate_secondary(position, scale);
    }

    fn store_sphere(&mut self, sphere: Icosphere) {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index = Some(SpatialIndex::new(&sphere.vertices));
        }
        self.sphere = Some(sphere);
    }

    /// Activate or deactivate regeneration through [`generate`](Self::generate)
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether [`generate`](Self::generate) currently does anything
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Get the configuration for the next regeneration
    #[inline]
    pub fn config(&self) -> &SphereConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next regeneration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` and keeps the old configuration if `config`
    /// does not validate.
    pub fn set_config(&mut self, config: SphereConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Get the displacement generators
    #[inline]
    pub fn composer(&self) -> &GeneratorComposer {
        &self.composer
    }

    /// Get the displacement generators for editing
    #[inline]
    pub fn composer_mut(&mut self) -> &mut GeneratorComposer {
        &mut self.composer
    }

    /// Base sphere from the last successful regeneration
    #[inline]
    pub fn sphere(&self) -> Option<&Icosphere> {
        self.sphere.as_ref()
    }

    /// Get the rendering target
    #[inline]
    pub fn mesh(&self) -> &S {
        &self.mesh
    }

    /// Index of the base-sphere vertex nearest to `position` (requires spatial-index feature)
    ///
    /// Returns `None` before the first successful regeneration.
    #[cfg(feature = "spatial-index")]
    pub fn find_vertex_at(&self, position: Vec3) -> Option<usize> {
        self.spatial_index.as_ref()?.find_nearest(position)
    }
}

/// Hand finished arrays to the rendering target
fn upload<S: MeshSink>(mesh: &mut S, vertices: Vec<Vec3>, triangles: Vec<u32>) -> Result<()> {
    let (vertex_count, triangle_count) = (vertices.len(), triangles.len() / 3);

    mesh.clear();
    mesh.set_index_format(IndexFormat::U32);
    mesh.set_vertices(vertices);
    mesh.set_triangles(triangles, 0, true)?;
    mesh.recalculate_normals();

    log::debug!(
        "uploaded mesh: {} vertices, {} triangles",
        vertex_count,
        triangle_count
    );
    Ok(())
}

/// Editor command surface for one specific planet
///
/// Holds a direct reference to the planet being edited, so several planets
/// can be inspected independently.
#[derive(Debug)]
pub struct Inspector<'a, S = MeshData> {
    planet: &'a mut IcospherePlanet<S>,
}

impl<'a, S: MeshSink> Inspector<'a, S> {
    /// Attach to a planet
    pub fn new(planet: &'a mut IcospherePlanet<S>) -> Self {
        Self { planet }
    }

    /// "Generate Mesh" button: rebuild and upload the base sphere now
    ///
    /// Failures are logged and returned so the UI can show the reason.
    pub fn generate_mesh_now(&mut self) -> Result<()> {
        self.planet.generate_mesh().inspect_err(|err| {
            log::error!("mesh generation failed: {}", err);
        })
    }

    /// Get the planet being edited
    pub fn planet(&self) -> &IcospherePlanet<S> {
        &*self.planet
    }

    /// Get the planet being edited, mutably
    pub fn planet_mut(&mut self) -> &mut IcospherePlanet<S> {
        &mut *self.planet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SphereConfigBuilder;
    use crate::error::IcosphereError;
    use crate::generator::{ConstantOffset, DisplacementGenerator};

    fn config(scale: f32, depth: usize) -> SphereConfig {
        SphereConfigBuilder::new()
            .scale(scale)
            .unwrap()
            .subdivision_limit(depth)
            .unwrap()
            .build()
    }

    struct Empty;

    impl DisplacementGenerator for Empty {
        fn name(&self) -> &str {
            "empty"
        }

        fn generate(&self, _vertices: &[Vec3]) -> Vec<Vec3> {
            Vec::new()
        }
    }

    #[test]
    fn test_start_uploads_base_sphere() {
        let mut planet = IcospherePlanet::new(config(1.0, 0), GeneratorComposer::new()).unwrap();
        assert!(planet.mesh().is_empty());

        planet.start().unwrap();

        let mesh = planet.mesh();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
        assert_eq!(mesh.index_format, IndexFormat::U32);
        assert_eq!(mesh.normals.len(), 12);
        assert_eq!(planet.sphere().unwrap().vertex_count(), 12);
    }

    #[test]
    fn test_generate_applies_offsets() {
        let composer = GeneratorComposer::new().with_generator(ConstantOffset(Vec3::Y));
        let mut planet = IcospherePlanet::new(config(2.0, 1), composer).unwrap();

        assert!(planet.generate().unwrap());

        let sphere = planet.sphere().unwrap();
        for (base, uploaded) in sphere.vertices.iter().zip(&planet.mesh().positions) {
            assert_eq!(Vec3::from_array(*uploaded), *base + Vec3::Y);
        }
        assert_eq!(planet.mesh().indices, sphere.triangles);
    }

    #[test]
    fn test_inactive_generate_is_noop() {
        let composer = GeneratorComposer::new().with_generator(ConstantOffset(Vec3::X));
        let mut planet = IcospherePlanet::new(config(1.0, 1), composer).unwrap();
        planet.start().unwrap();
        let before = planet.mesh().positions.clone();

        planet.set_active(false);
        assert!(!planet.generate().unwrap());
        assert_eq!(planet.mesh().positions, before);

        planet.set_active(true);
        assert!(planet.generate().unwrap());
        assert_ne!(planet.mesh().positions, before);
    }

    #[test]
    fn test_failed_generate_keeps_previous_mesh() {
        let composer = GeneratorComposer::new().with_generator(ConstantOffset(Vec3::Z));
        let mut planet = IcospherePlanet::new(config(1.0, 1), composer).unwrap();
        planet.generate().unwrap();
        let before = planet.mesh().positions.clone();

        planet.composer_mut().push(Empty);
        let err = planet.generate().unwrap_err();

        assert!(matches!(err, IcosphereError::ContractViolation { .. }));
        assert_eq!(planet.mesh().positions, before);
    }

    #[test]
    fn test_set_config_validates() {
        let mut planet = IcospherePlanet::new(config(1.0, 0), GeneratorComposer::new()).unwrap();
        let bad = SphereConfig {
            scale: 0.0,
            subdivision_limit: 0,
        };
        assert!(planet.set_config(bad).is_err());
        assert_eq!(planet.config().scale, 1.0);

        planet.set_config(config(3.0, 2)).unwrap();
        planet.generate_mesh().unwrap();
        assert_eq!(planet.mesh().vertex_count(), 162);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = SphereConfig {
            scale: -1.0,
            subdivision_limit: 0,
        };
        assert!(IcospherePlanet::new(bad, GeneratorComposer::new()).is_err());
    }

    #[test]
    fn test_out_of_range_scale_is_a_config_error() {
        for scale in [1e-8, 1e20] {
            let bad = SphereConfig {
                scale,
                subdivision_limit: 1,
            };
            let err = IcospherePlanet::new(bad, GeneratorComposer::new()).unwrap_err();
            assert!(matches!(err, IcosphereError::InvalidConfig(_)));
        }
    }

    #[test]
    fn test_regeneration_is_deterministic() {
        let mut planet = IcospherePlanet::new(config(1.0, 3), GeneratorComposer::new()).unwrap();
        planet.generate_mesh().unwrap();
        let first = planet.mesh().clone();
        planet.generate_mesh().unwrap();
        assert_eq!(first.positions, planet.mesh().positions);
        assert_eq!(first.indices, planet.mesh().indices);
    }

    #[test]
    fn test_inspector_generates_and_reports() {
        let mut planet = IcospherePlanet::new(config(1.0, 2), GeneratorComposer::new()).unwrap();
        {
            let mut inspector = Inspector::new(&mut planet);
            inspector.generate_mesh_now().unwrap();
            inspector.generate_mesh_now().unwrap();
            assert_eq!(inspector.planet().mesh().vertex_count(), 162);
        }

        let mut other = IcospherePlanet::new(config(1.0, 0), GeneratorComposer::new()).unwrap();
        Inspector::new(&mut other).generate_mesh_now().unwrap();

        assert_eq!(planet.mesh().vertex_count(), 162);
        assert_eq!(other.mesh().vertex_count(), 12);
    }

    #[test]
    fn test_secondary_hook_receives_scale() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Scatter(Rc<RefCell<Vec<(Vec3, f32)>>>);

        impl DisplacementGenerator for Scatter {
            fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
                vec![Vec3::ZERO; vertices.len()]
            }

            fn generate_secondary(&mut self, position: Vec3, scale: f32) {
                self.0.borrow_mut().push((position, scale));
            }
        }

        let spawned = Rc::new(RefCell::new(Vec::new()));
        let composer = GeneratorComposer::new().with_generator(Scatter(spawned.clone()));
        let mut planet = IcospherePlanet::new(config(5.0, 0), composer).unwrap();

        planet.generate_secondary(Vec3::Y);
        assert_eq!(*spawned.borrow(), vec![(Vec3::Y, 5.0)]);
    }

    #[cfg(feature = "spatial-index")]
    #[test]
    fn test_find_vertex_at() {
        let mut planet = IcospherePlanet::new(config(2.0, 2), GeneratorComposer::new()).unwrap();
        assert_eq!(planet.find_vertex_at(Vec3::X), None);

        planet.generate_mesh().unwrap();
        let target = planet.sphere().unwrap().vertices[17];
        assert_eq!(planet.find_vertex_at(target * 1.01), Some(17));
    }
}
