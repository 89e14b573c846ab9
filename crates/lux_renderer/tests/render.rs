//! End-to-end renders through the public camera API.

use lux_renderer::{
    color_to_rgb, Aabb, Camera, Color, HitRecord, Hittable, HittableList, Interval, Lambertian,
    MaterialTable, Quad, Ray, RenderError, Scene, Sphere, Vec3,
};
use lux_renderer::DiffuseLight;
use rand::RngCore;
use std::sync::atomic::AtomicBool;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SKY: Color = Color::new(0.5, 0.7, 1.0);

fn single_sphere_scene() -> Scene {
    let mut materials = MaterialTable::new();
    let grey = materials.add(Lambertian::new(Color::splat(0.5)));
    let mut world = HittableList::new();
    world.add(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey));
    Scene::new(materials, world, HittableList::new())
}

fn camera(width: u32, height: u32, spp: u32, depth: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_quality(spp, depth)
        .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
        .with_lens(90.0, 0.0, 1.0)
        .with_background(SKY)
        .with_seed(42)
}

#[test]
fn test_single_sphere_corners_show_background() {
    init_logging();
    let scene = single_sphere_scene();
    let mut cam = camera(16, 16, 1, 1);

    let output = cam.render(&scene).unwrap();
    let image = &output.image;
    assert_eq!((image.width, image.height), (16, 16));

    for (x, y) in [(0, 0), (15, 0), (0, 15), (15, 15)] {
        assert_eq!(image.get(x, y), SKY, "corner ({x}, {y})");
    }

    // Depth 1 gives the sphere nothing to bounce into
    assert_eq!(image.get(8, 8), Color::ZERO);
}

#[test]
fn test_render_is_deterministic_for_seed() {
    init_logging();
    let scene = single_sphere_scene();

    let a = camera(24, 16, 4, 5).render(&scene).unwrap();
    let b = camera(24, 16, 4, 5).render(&scene).unwrap();
    assert_eq!(a.image, b.image);

    let c = camera(24, 16, 4, 5).with_seed(43).render(&scene).unwrap();
    assert_ne!(a.image, c.image);
}

#[test]
fn test_lit_floor_with_light_sampling() {
    init_logging();
    let mut materials = MaterialTable::new();
    let white = materials.add(Lambertian::new(Color::splat(0.7)));
    let lamp = materials.add(DiffuseLight::new(Color::splat(4.0)));

    let mut world = HittableList::new();
    world.add(Quad::new(Vec3::new(-5.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -10.0), white));
    // Facing down
    let light = || Quad::new(Vec3::new(-1.0, 3.0, -1.0), Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), lamp);
    world.add(light());
    let mut lights = HittableList::new();
    lights.add(light());

    let scene = Scene::with_bvh(materials, world, lights);
    let mut cam = Camera::new()
        .with_resolution(8, 8)
        .with_quality(16, 4)
        .with_position(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, Vec3::Y)
        .with_lens(30.0, 0.0, 4.0);

    let output = cam.render(&scene).unwrap();
    let center = output.image.get(4, 4);
    assert!(center.x > 0.05 && center.x.is_finite());
    assert!(output.stats.quad_hits > 0);
    assert_eq!(output.stats.guarded_samples, 0);
}

/// Light that only ever proposes directions into the surface and assigns
/// them no density.
struct UnderfootLight;

impl Hittable for UnderfootLight {
    fn hit(&self, _ray: &Ray, _ray_t: Interval) -> Option<HitRecord> {
        None
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::EMPTY
    }

    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        -Vec3::Y
    }
}

fn degenerate_light_scene() -> Scene {
    let mut materials = MaterialTable::new();
    let grey = materials.add(Lambertian::new(Color::splat(0.5)));
    let mut world = HittableList::new();
    world.add(Quad::new(Vec3::new(-50.0, 0.0, 50.0), Vec3::new(100.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -100.0), grey));
    let mut lights = HittableList::new();
    lights.add(UnderfootLight);
    Scene::new(materials, world, lights)
}

fn looking_down(pdf_guard: bool) -> Camera {
    Camera::new()
        .with_resolution(4, 4)
        .with_quality(4, 3)
        .with_position(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, Vec3::Z)
        .with_lens(30.0, 0.0, 2.0)
        .with_background(Color::ONE)
        .with_pdf_guard(pdf_guard)
        .with_seed(3)
}

#[test]
fn test_guarded_samples_stay_finite() {
    init_logging();
    let scene = degenerate_light_scene();

    let output = looking_down(true).render(&scene).unwrap();
    assert!(output.stats.guarded_samples > 0);
    assert!(output.image.pixels.iter().all(|p| p.is_finite()));
}

#[test]
fn test_unguarded_samples_propagate_nan() {
    init_logging();
    let scene = degenerate_light_scene();

    let output = looking_down(false).render(&scene).unwrap();
    assert_eq!(output.stats.guarded_samples, 0);

    let poisoned: Vec<_> = output.image.pixels.iter().filter(|p| p.is_nan()).collect();
    assert!(!poisoned.is_empty());
    for p in poisoned {
        assert_eq!(color_to_rgb(*p), [0, 0, 0]);
    }
}

#[test]
fn test_ppm_output() {
    init_logging();
    let scene = single_sphere_scene();
    let output = camera(5, 3, 1, 2).render(&scene).unwrap();

    let mut bytes = Vec::new();
    output.image.write_ppm(&mut bytes).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("P3"));
    assert_eq!(lines.next(), Some("5 3"));
    assert_eq!(lines.next(), Some("255"));
    assert_eq!(lines.count(), 15);
}

#[test]
fn test_cancelled_render() {
    init_logging();
    let scene = single_sphere_scene();
    let cancel = AtomicBool::new(true);

    let result = camera(8, 8, 1, 2).render_with_cancel(&scene, &cancel);
    assert!(matches!(result, Err(RenderError::Cancelled)));
}
