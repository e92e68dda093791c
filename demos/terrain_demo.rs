//! Demonstration of displacement generators on a planet

use icosphere_planet::*;

fn main() -> Result<()> {
    env_logger::init();

    let config = SphereConfigBuilder::new()
        .scale(10.0)?
        .subdivision_limit(5)?
        .build();

    let continents = NoiseGenerator::new(ShapeSettings {
        strength: 1.2,
        frequency: 1.5,
        octaves: 6,
        min_value: 0.45,
        ..ShapeSettings::with_seed(42)
    });
    let roughness = JitterGenerator {
        seed: 7,
        strength: 0.03,
    };

    let composer = GeneratorComposer::new()
        .with_generator(continents)
        .with_generator(roughness);
    println!("Generators: {:?}", composer.names());

    let mut planet = IcospherePlanet::new(config, composer)?;
    planet.start()?;
    planet.generate()?;

    let radii: Vec<f32> = planet
        .mesh()
        .positions
        .iter()
        .map(|p| Vec3::from_array(*p).length())
        .collect();
    let lowest = radii.iter().copied().fold(f32::MAX, f32::min);
    let highest = radii.iter().copied().fold(f32::MIN, f32::max);
    let raised = radii.iter().filter(|&&r| r > config.scale + 0.05).count();

    println!("Vertices: {}", planet.mesh().vertex_count());
    println!("Radius range: {:.3} .. {:.3}", lowest, highest);
    println!(
        "Raised terrain: {} vertices ({:.1}%)",
        raised,
        raised as f32 / radii.len() as f32 * 100.0
    );

    #[cfg(feature = "spatial-index")]
    {
        let probe = Vec3::new(0.0, config.scale, 0.0);
        if let Some(vertex) = planet.find_vertex_at(probe) {
            println!("Vertex nearest the north pole: {}", vertex);
        }
    }

    Ok(())
}
