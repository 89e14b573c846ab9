//! Instancing wrappers that place a hittable in the world.
//!
//! Each wrapper moves the incoming ray into the object's local frame, asks the
//! wrapped object for a hit, and moves the record back out. Bounding boxes are
//! transformed once at construction.

use crate::{HitRecord, Hittable, Ray};
use lux_math::{Aabb, Interval, Mat3, Mat3Ext, Vec3};
use rand::RngCore;

/// Offsets a hittable by a fixed vector.
pub struct Translate<H> {
    object: H,
    offset: Vec3,
    bbox: Aabb,
}

impl<H: Hittable> Translate<H> {
    pub fn new(object: H, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl<H: Hittable> Hittable for Translate<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let local = ray.spawn(ray.origin() - self.offset, ray.direction());

        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// Rotates a hittable about the origin.
///
/// Angles are XYZ Euler in degrees: X is applied first, then Y, then Z.
pub struct Rotate<H> {
    object: H,
    /// Object to world
    rotation: Mat3,
    /// World to object
    inverse: Mat3,
    bbox: Aabb,
}

impl<H: Hittable> Rotate<H> {
    pub fn new(object: H, degrees: Vec3) -> Self {
        Self::from_matrix(object, Mat3::from_euler_degrees(degrees.x, degrees.y, degrees.z))
    }

    /// Rotate about the Y axis only.
    pub fn y(object: H, degrees: f32) -> Self {
        Self::new(object, Vec3::new(0.0, degrees, 0.0))
    }

    /// Wrap with an arbitrary rotation matrix. Must be orthonormal.
    pub fn from_matrix(object: H, rotation: Mat3) -> Self {
        let bbox = rotation.transform_aabb(&object.bounding_box());
        Self {
            object,
            rotation,
            inverse: rotation.transpose(),
            bbox,
        }
    }
}

impl<H: Hittable> Hittable for Rotate<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let local = ray.spawn(self.inverse * ray.origin(), self.inverse * ray.direction());

        let mut rec = self.object.hit(&local, ray_t)?;

        // The normal already opposes the local ray; rotating both keeps that.
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object
            .pdf_value(self.inverse * origin, self.inverse * direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.rotation * self.object.random(self.inverse * origin, rng)
    }
}

/// Scales a hittable component-wise about the origin.
///
/// Light sampling is not forwarded: the wrapped object's density is measured
/// in its own frame and would be wrong after a non-uniform stretch.
pub struct Scale<H> {
    object: H,
    factor: Vec3,
    inv_factor: Vec3,
    bbox: Aabb,
}

impl<H: Hittable> Scale<H> {
    pub fn new(object: H, factor: Vec3) -> Self {
        let factor = if factor.cmpeq(Vec3::ZERO).any() {
            log::warn!("Scale factor {:?} has a zero component, substituting 1", factor);
            Vec3::select(factor.cmpeq(Vec3::ZERO), Vec3::ONE, factor)
        } else {
            factor
        };

        let bbox = object.bounding_box().scale(factor);
        Self {
            object,
            factor,
            inv_factor: factor.recip(),
            bbox,
        }
    }

    pub fn uniform(object: H, factor: f32) -> Self {
        Self::new(object, Vec3::splat(factor))
    }
}

impl<H: Hittable> Hittable for Scale<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // t is preserved because origin and direction are scaled alike
        let local = ray.spawn(ray.origin() * self.inv_factor, ray.direction() * self.inv_factor);

        let mut rec = self.object.hit(&local, ray_t)?;
        rec.p *= self.factor;
        // Normals transform by the inverse transpose
        rec.normal = (rec.normal * self.inv_factor).normalize_or_zero();
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Reports every hit as front-facing from the other side.
///
/// Turns a one-sided emitter around without moving its geometry.
pub struct FlipFace<H> {
    object: H,
}

impl<H: Hittable> FlipFace<H> {
    pub fn new(object: H) -> Self {
        Self { object }
    }
}

impl<H: Hittable> Hittable for FlipFace<H> {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut rec = self.object.hit(ray, ray_t)?;
        rec.front_face = !rec.front_face;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.object.bounding_box()
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.object.pdf_value(origin, direction)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }
}
