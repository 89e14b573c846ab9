//! Cornell box example.
//!
//! Renders the classic box with two rotated blocks and an area light, then
//! saves it in PPM format.
//!
//! ```text
//! cargo run --release --example cornell_box -- [camera.json] [output.ppm]
//! ```
//!
//! The optional JSON file overrides any [`CameraConfig`] fields; missing
//! fields keep the box's framing.

use anyhow::Context;
use lux_renderer::{
    make_box, Camera, CameraConfig, Color, DiffuseLight, HittableList, Lambertian, MaterialTable,
    Quad, Rotate, Scene, Translate, Vec3,
};
use std::fs::File;
use std::io::BufWriter;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read camera config {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("Invalid camera config {path}"))?
        }
        None => default_config(),
    };
    let output = args.next().unwrap_or_else(|| "cornell_box.ppm".to_string());

    let start = std::time::Instant::now();
    let scene = build_scene();
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::from_config(config);
    let rendered = camera.render(&scene)?;

    let file = File::create(&output).with_context(|| format!("Failed to create {output}"))?;
    rendered.image.write_ppm(BufWriter::new(file))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn default_config() -> CameraConfig {
    CameraConfig {
        aspect_ratio: 1.0,
        image_width: 400,
        samples_per_pixel: 30,
        max_depth: 50,
        background: Color::ZERO,
        vfov: 40.0,
        look_from: Vec3::new(278.0, 278.0, -800.0),
        look_at: Vec3::new(278.0, 278.0, 0.0),
        vup: Vec3::Y,
        defocus_angle: 0.0,
        ..Default::default()
    }
}

fn build_scene() -> Scene {
    let mut materials = MaterialTable::new();
    let red = materials.add(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = materials.add(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green = materials.add(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light = materials.add(DiffuseLight::new(Color::splat(15.0)));

    let mut world = HittableList::new();

    // Walls
    world.add(Quad::new(Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), Vec3::new(0.0, 555.0, 0.0), green));
    world.add(Quad::new(Vec3::new(0.0, 0.0, 555.0), Vec3::new(0.0, 0.0, -555.0), Vec3::new(0.0, 555.0, 0.0), red));
    world.add(Quad::new(Vec3::new(0.0, 555.0, 0.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 555.0), white));
    world.add(Quad::new(Vec3::new(0.0, 0.0, 555.0), Vec3::new(555.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -555.0), white));
    world.add(Quad::new(Vec3::new(555.0, 0.0, 555.0), Vec3::new(-555.0, 0.0, 0.0), Vec3::new(0.0, 555.0, 0.0), white));

    // Ceiling light, facing down
    let lamp_corner = Vec3::new(343.0, 554.0, 332.0);
    let lamp_u = Vec3::new(-130.0, 0.0, 0.0);
    let lamp_v = Vec3::new(0.0, 0.0, -105.0);
    world.add(Quad::new(lamp_corner, lamp_u, lamp_v, light));

    let tall = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white);
    world.add(Translate::new(Rotate::y(tall, 15.0), Vec3::new(265.0, 0.0, 295.0)));

    let short = make_box(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white);
    world.add(Translate::new(Rotate::y(short, -18.0), Vec3::new(130.0, 0.0, 65.0)));

    let mut lights = HittableList::new();
    lights.add(Quad::new(lamp_corner, lamp_u, lamp_v, light));

    Scene::with_bvh(materials, world, lights)
}
