//! Additive composition of displacement generators
//!
//! Every generator receives its own copy of the base vertices, so none of them
//! sees another's displacement. Offsets are summed per vertex and added onto
//! the base positions once all generators have succeeded.

use glam::Vec3;
use std::time::Instant;

use crate::error::{IcosphereError, Result};
use crate::generator::DisplacementGenerator;

/// Ordered list of generators whose offsets are summed onto a base vertex set
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let composer = GeneratorComposer::new()
///     .with_generator(ConstantOffset(Vec3::new(0.0, 1.0, 0.0)))
///     .with_generator(ConstantOffset(Vec3::new(0.0, 0.0, 2.0)));
///
/// let displaced = composer.compose(&[Vec3::X]).unwrap();
/// assert_eq!(displaced, vec![Vec3::new(1.0, 1.0, 2.0)]);
/// ```
#[derive(Default)]
pub struct GeneratorComposer {
    generators: Vec<Box<dyn DisplacementGenerator>>,
}

impl std::fmt::Debug for GeneratorComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.generators.iter().map(|g| g.name()))
            .finish()
    }
}

impl GeneratorComposer {
    /// Create a composer with no generators
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a generator, builder style
    pub fn with_generator<G: DisplacementGenerator + 'static>(mut self, generator: G) -> Self {
        self.push(generator);
        self
    }

    /// Append a generator
    pub fn push<G: DisplacementGenerator + 'static>(&mut self, generator: G) {
        self.generators.push(Box::new(generator));
    }

    /// Remove every generator
    pub fn clear(&mut self) {
        self.generators.clear();
    }

    /// Number of registered generators
    #[inline]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if no generators are registered
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Names of the registered generators, in run order
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Base positions plus the sum of every generator's offsets
    ///
    /// With no generators the output equals `base` exactly.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` if a generator returns a different number
    /// of offsets than there are vertices. Nothing is applied in that case.
    pub fn compose(&self, base: &[Vec3]) -> Result<Vec<Vec3>> {
        let start = Instant::now();
        let mut accumulated = vec![Vec3::ZERO; base.len()];

        for generator in &self.generators {
            let current = base.to_vec();
            let offsets = generator.generate(&current);

            if offsets.len() != base.len() {
                return Err(IcosphereError::ContractViolation {
                    generator: generator.name().to_string(),
                    expected: base.len(),
                    actual: offsets.len(),
                });
            }

            for (sum, offset) in accumulated.iter_mut().zip(offsets) {
                *sum += offset;
            }
        }

        let displaced = base
            .iter()
            .zip(accumulated)
            .map(|(&v, offset)| v + offset)
            .collect();

        log::debug!(
            "composed {} generators over {} vertices in {:.2?}",
            self.generators.len(),
            base.len(),
            start.elapsed()
        );

        Ok(displaced)
    }

    /// Forward a position to every generator's secondary hook
    pub fn generate_secondary(&mut self, position: Vec3, scale: f32) {
        for generator in &mut self.generators {
            generator.generate_secondary(position, scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{ConstantOffset, JitterGenerator, NoiseGenerator, ShapeSettings};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn base() -> Vec<Vec3> {
        vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ]
    }

    /// Returns the wrong number of offsets
    struct Truncating;

    impl DisplacementGenerator for Truncating {
        fn name(&self) -> &str {
            "truncating"
        }

        fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
            vec![Vec3::ONE; vertices.len().saturating_sub(1)]
        }
    }

    /// Records the vertices it was handed
    struct Recorder(Rc<RefCell<Vec<Vec<Vec3>>>>);

    impl DisplacementGenerator for Recorder {
        fn generate(&self, vertices: &[Vec3]) -> Vec<Vec3> {
            self.0.borrow_mut().push(vertices.to_vec());
            vec![Vec3::splat(10.0); vertices.len()]
        }

        fn generate_secondary(&mut self, position: Vec3, scale: f32) {
            self.0.borrow_mut().push(vec![position * scale]);
        }
    }

    #[test]
    fn test_no_generators_is_identity() {
        let composer = GeneratorComposer::new();
        assert!(composer.is_empty());
        assert_eq!(composer.compose(&base()).unwrap(), base());
    }

    #[test]
    fn test_offsets_are_summed() {
        let o1 = Vec3::new(0.5, 0.0, -1.0);
        let o2 = Vec3::new(0.0, 2.0, 0.25);
        let composer = GeneratorComposer::new()
            .with_generator(ConstantOffset(o1))
            .with_generator(ConstantOffset(o2));

        let displaced = composer.compose(&base()).unwrap();
        for (v, d) in base().iter().zip(&displaced) {
            assert_eq!(*d, *v + o1 + o2);
        }
    }

    #[test]
    fn test_order_independent() {
        let settings = ShapeSettings::with_seed(5);
        let forward = GeneratorComposer::new()
            .with_generator(NoiseGenerator::new(settings))
            .with_generator(JitterGenerator {
                seed: 1,
                strength: 0.1,
            });
        let backward = GeneratorComposer::new()
            .with_generator(JitterGenerator {
                seed: 1,
                strength: 0.1,
            })
            .with_generator(NoiseGenerator::new(settings));

        let a = forward.compose(&base()).unwrap();
        let b = backward.compose(&base()).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert!(x.distance(*y) < 1e-6);
        }
    }

    #[test]
    fn test_generators_see_unmodified_base() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let composer = GeneratorComposer::new()
            .with_generator(Recorder(log.clone()))
            .with_generator(Recorder(log.clone()));

        let displaced = composer.compose(&base()).unwrap();

        let seen = log.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|input| *input == base()));
        assert_eq!(displaced[0], Vec3::new(21.0, 20.0, 20.0));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let composer = GeneratorComposer::new()
            .with_generator(ConstantOffset(Vec3::X))
            .with_generator(Truncating);

        let err = composer.compose(&base()).unwrap_err();
        assert_eq!(
            err,
            IcosphereError::ContractViolation {
                generator: "truncating".to_string(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_secondary_hook_reaches_every_generator() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut composer = GeneratorComposer::new()
            .with_generator(Recorder(log.clone()))
            .with_generator(ConstantOffset(Vec3::ZERO))
            .with_generator(Recorder(log.clone()));

        composer.generate_secondary(Vec3::X, 2.0);

        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[0], vec![Vec3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_names() {
        let composer = GeneratorComposer::new()
            .with_generator(ConstantOffset(Vec3::ZERO))
            .with_generator(JitterGenerator {
                seed: 0,
                strength: 0.0,
            });
        assert_eq!(composer.names(), vec!["constant-offset", "jitter"]);
        assert_eq!(composer.len(), 2);
    }
}
