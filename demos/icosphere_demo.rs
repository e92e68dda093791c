//! Demonstration of icosphere construction at increasing depths

use icosphere_planet::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Icosphere construction");
    println!("{:-<60}", "");

    for depth in 0..=6 {
        let config = SphereConfigBuilder::new()
            .scale(2.0)?
            .subdivision_limit(depth)?
            .build();

        let sphere = generate_icosphere(&config)?;

        let max_error = sphere
            .vertices
            .iter()
            .map(|v| (v.length() - config.scale).abs())
            .fold(0.0f32, f32::max);

        println!(
            "depth {}: {:>7} vertices, {:>7} triangles, max radius error {:.2e}",
            depth,
            sphere.vertex_count(),
            sphere.triangle_count(),
            max_error
        );
    }

    // Upload through the mesh object, as a renderer would receive it
    let config = SphereConfigBuilder::new().subdivision_limit(3)?.build();
    let mut planet = IcospherePlanet::new(config, GeneratorComposer::new())?;
    Inspector::new(&mut planet).generate_mesh_now()?;

    let mesh = planet.mesh();
    let memory = mesh.positions.len() * 12 + mesh.normals.len() * 12 + mesh.indices.len() * 4;
    println!("\nUploaded mesh:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Index format: {:?}", mesh.index_format);
    println!("  Memory: {} bytes", memory);

    Ok(())
}
