//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::sampling::gen_f32;
use crate::stats;
use crate::{HitRecord, Hittable, MaterialId, Ray};
use lux_math::{Aabb, Interval, Vec2, Vec3};
use rand::RngCore;

/// Tolerance for the determinant and barycentric bounds.
pub const EPSILON: f32 = 1e-8;

/// A triangle primitive.
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Per-vertex shading normals
    vertex_normals: Option<[Vec3; 3]>,
    /// Per-vertex texture coordinates
    uvs: Option<[Vec2; 3]>,
    area: f32,
    material: MaterialId,
    /// Bounding box
    bbox: Aabb,
}

impl Triangle {
    /// Create a new flat-shaded triangle from three vertices.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: MaterialId) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let n = edge1.cross(edge2);

        let min = v0.min(v1).min(v2);
        let max = v0.max(v1).max(v2);

        Self {
            v0,
            v1,
            v2,
            edge1,
            edge2,
            normal: n.normalize_or_zero(),
            vertex_normals: None,
            uvs: None,
            area: 0.5 * n.length(),
            material,
            // Aabb pads thin axes, so axis-aligned triangles stay hittable
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Interpolate the given per-vertex normals across the face (smooth shading).
    pub fn with_vertex_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.vertex_normals = Some(normals);
        self
    }

    /// Interpolate the given per-vertex texture coordinates across the face.
    pub fn with_uvs(mut self, uvs: [Vec2; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn area(&self) -> f32 {
        self.area
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        stats::record(|s| s.triangle_tests += 1);

        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < EPSILON {
            stats::record(|s| s.triangle_parallel += 1);
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);

        // Check if intersection is outside triangle (u parameter)
        if u < -EPSILON || u > 1.0 + EPSILON {
            stats::record(|s| s.triangle_barycentric += 1);
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);

        // Check if intersection is outside triangle (v parameter)
        if v < -EPSILON || u + v > 1.0 + EPSILON {
            stats::record(|s| s.triangle_barycentric += 1);
            return None;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.contains(t) {
            stats::record(|s| s.triangle_beyond += 1);
            return None;
        }

        let w = 1.0 - u - v;
        let outward_normal = match self.vertex_normals {
            Some([n0, n1, n2]) => w * n0 + u * n1 + v * n2,
            None => self.normal,
        };
        let uv = match self.uvs {
            Some([t0, t1, t2]) => w * t0 + u * t1 + v * t2,
            None => Vec2::new(u, v),
        };

        stats::record(|s| s.triangle_hits += 1);
        Some(HitRecord::new(ray, t, outward_normal, self.material, uv.x, uv.y))
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
        let cosine = (direction.dot(self.normal) / direction.length()).abs();

        distance_squared / (cosine * self.area)
    }

    /// Direction to a point drawn uniformly over the face.
    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let su = gen_f32(rng).sqrt();
        let r2 = gen_f32(rng);
        let p = (1.0 - su) * self.v0 + su * (1.0 - r2) * self.v1 + su * r2 * self.v2;
        p - origin
    }
}
