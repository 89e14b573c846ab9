//! Everything a render reads: materials, geometry and the lights to sample.

use crate::{BvhNode, Hittable, HittableList, Material, MaterialId, MaterialTable};

/// A renderable scene.
///
/// Immutable once built; rendering only takes shared references, so a scene
/// can be traced from every worker thread at once.
pub struct Scene {
    pub materials: MaterialTable,
    pub world: Box<dyn Hittable>,
    /// Emitters to importance-sample. May be empty.
    pub lights: HittableList,
}

impl Scene {
    pub fn new(materials: MaterialTable, world: impl Hittable + 'static, lights: HittableList) -> Self {
        Self {
            materials,
            world: Box::new(world),
            lights,
        }
    }

    /// Build a scene whose world is a BVH over `objects`.
    pub fn with_bvh(materials: MaterialTable, objects: HittableList, lights: HittableList) -> Self {
        log::info!(
            "Building scene: {} objects, {} lights, {} materials",
            objects.len(),
            lights.len(),
            materials.len()
        );
        Self::new(materials, BvhNode::from_list(objects), lights)
    }

    pub fn material(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Ray, Sphere};
    use lux_math::{Interval, Vec3};

    #[test]
    fn test_scene_with_bvh() {
        let mut materials = MaterialTable::new();
        let grey = materials.add(Lambertian::new(Color::splat(0.5)));

        let mut objects = HittableList::new();
        objects.add(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, grey));
        objects.add(Sphere::new(Vec3::new(0.0, -100.5, -2.0), 100.0, grey));

        let scene = Scene::with_bvh(materials, objects, HittableList::new());

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = scene.world.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.5).abs() < 1e-4);
        assert!(scene.material(rec.material).is_some());
        assert!(scene.lights.is_empty());
    }
}
