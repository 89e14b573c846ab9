//! Planar parallelogram primitive and the axis-aligned box built from it.

use crate::sampling::gen_f32;
use crate::stats;
use crate::{HitRecord, Hittable, HittableList, MaterialId, Ray};
use lux_math::{Aabb, Interval, Vec3};
use rand::RngCore;

/// Below this `|n·d|` the ray is treated as parallel to the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A parallelogram with corner `q` and edges `u` and `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// `n / (n·n)`, for recovering planar coordinates
    w: Vec3,
    normal: Vec3,
    d: f32,
    area: f32,
    material: MaterialId,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: MaterialId) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let d = normal.dot(q);
        let w = if n.length_squared() > 0.0 {
            n / n.dot(n)
        } else {
            Vec3::ZERO
        };

        let bbox_diagonal1 = Aabb::from_points(q, q + u + v);
        let bbox_diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            area: n.length(),
            material,
            bbox: Aabb::surrounding(&bbox_diagonal1, &bbox_diagonal2),
        }
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Hittable for Quad {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let denom = self.normal.dot(ray.direction());

        // No hit if the ray is parallel to the plane
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.contains(t) {
            return None;
        }

        // Planar coordinates of the hit point relative to q
        let intersection = ray.at(t);
        let planar_hitpt = intersection - self.q;
        let alpha = self.w.dot(planar_hitpt.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hitpt));

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        stats::record(|s| s.quad_hits += 1);
        Some(HitRecord::new(ray, t, self.normal, self.material, alpha, beta))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let toward = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&toward, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let p = self.q + gen_f32(rng) * self.u + gen_f32(rng) * self.v;
        p - origin
    }
}

/// The six sides of the axis-aligned box with opposite corners `a` and `b`.
pub fn make_box(a: Vec3, b: Vec3, material: MaterialId) -> HittableList {
    let mut sides = HittableList::new();

    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    sides.add(Quad::new(Vec3::new(min.x, min.y, max.z), dx, dy, material)); // front
    sides.add(Quad::new(Vec3::new(max.x, min.y, max.z), -dz, dy, material)); // right
    sides.add(Quad::new(Vec3::new(max.x, min.y, min.z), -dx, dy, material)); // back
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dz, dy, material)); // left
    sides.add(Quad::new(Vec3::new(min.x, max.y, max.z), dx, -dz, material)); // top
    sides.add(Quad::new(Vec3::new(min.x, min.y, min.z), dx, dz, material)); // bottom

    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_quad() -> Quad {
        // Unit square in the XY plane at z = -1, facing +Z
        Quad::new(Vec3::new(0.0, 0.0, -1.0), Vec3::X, Vec3::Y, MaterialId(0))
    }

    #[test]
    fn test_quad_hit() {
        let quad = unit_quad();
        let ray = Ray::new(Vec3::new(0.25, 0.75, 0.0), -Vec3::Z, 0.0);

        let rec = quad.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.75).abs() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_quad_miss_outside_and_parallel() {
        let quad = unit_quad();
        let interval = Interval::new(0.001, f32::INFINITY);

        let outside = Ray::new(Vec3::new(1.5, 0.5, 0.0), -Vec3::Z, 0.0);
        assert!(quad.hit(&outside, interval).is_none());

        let parallel = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::X, 0.0);
        assert!(quad.hit(&parallel, interval).is_none());
    }

    #[test]
    fn test_quad_bbox_padded() {
        let quad = unit_quad();
        let bbox = quad.bounding_box();
        assert!(bbox.z.size() >= Aabb::MIN_EXTENT * 0.999);
        assert!(bbox.z.contains(-1.0));
    }

    #[test]
    fn test_quad_light_pdf() {
        // 2x2 light, 2 units above the origin, facing down
        let light = Quad::new(
            Vec3::new(-1.0, 2.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            MaterialId(0),
        );
        assert!((light.area() - 4.0).abs() < 1e-5);

        // Straight up: distance 2, cosine 1
        let pdf = light.pdf_value(Vec3::ZERO, Vec3::Y);
        assert!((pdf - 1.0).abs() < 1e-4);

        assert_eq!(light.pdf_value(Vec3::ZERO, -Vec3::Y), 0.0);

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            let dir = light.random(Vec3::ZERO, &mut rng);
            assert!(light.pdf_value(Vec3::ZERO, dir) > 0.0);
        }
    }

    #[test]
    fn test_make_box() {
        let sides = make_box(Vec3::ONE, Vec3::ZERO, MaterialId(3));
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert!(bbox.x.contains(0.0) && bbox.x.contains(1.0));

        // Rays from outside along each axis hit the near face
        let interval = Interval::new(0.001, f32::INFINITY);
        let from_front = Ray::new(Vec3::new(0.5, 0.5, 5.0), -Vec3::Z, 0.0);
        let rec = sides.hit(&from_front, interval).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!(rec.front_face);
        assert_eq!(rec.material, MaterialId(3));

        let from_below = Ray::new(Vec3::new(0.5, -3.0, 0.5), Vec3::Y, 0.0);
        let rec = sides.hit(&from_below, interval).unwrap();
        assert!((rec.t - 3.0).abs() < 1e-5);
    }
}
