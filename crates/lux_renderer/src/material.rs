//! Material trait for surface scattering.
//!
//! Materials live in a [`MaterialTable`] owned by the scene. Primitives store a
//! [`MaterialId`] into that table, so any number of them can share one
//! material without reference counting.

use crate::pdf::{CosinePdf, ScatterPdf, SpherePdf};
use crate::sampling::{gen_f32, random_unit_vector};
use crate::texture::{SolidColor, Texture};
use crate::{Color, HitRecord, Ray};
use lux_math::{Vec3, Vec3Ext};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// Handle to a material stored in a [`MaterialTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialId(pub u32);

/// Arena of the materials a scene uses.
#[derive(Default)]
pub struct MaterialTable {
    materials: Vec<Box<dyn Material>>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn add(&mut self, material: impl Material + 'static) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Box::new(material));
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id.0 as usize).map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// How the integrator should continue a path after a scatter event.
#[derive(Debug, Clone, Copy)]
pub enum ScatterKind {
    /// Sample a direction from this density (mixed with light sampling).
    Pdf(ScatterPdf),
    /// Follow this ray as-is, without density weighting.
    Specular(Ray),
}

/// Result of [`Material::scatter`].
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    pub attenuation: Color,
    pub kind: ScatterKind,
}

impl ScatterRecord {
    pub fn pdf(attenuation: Color, pdf: ScatterPdf) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Pdf(pdf),
        }
    }

    pub fn specular(attenuation: Color, ray: Ray) -> Self {
        Self {
            attenuation,
            kind: ScatterKind::Specular(ray),
        }
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        None
    }

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// Density with which [`Material::scatter`] would have produced `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(SolidColor::shared(albedo))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let attenuation = self.texture.value(rec.u, rec.v, rec.p);
        Some(ScatterRecord::pdf(
            attenuation,
            ScatterPdf::Cosine(CosinePdf::new(rec.normal)),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize_or_zero());
        if cos_theta < 0.0 {
            0.0
        } else {
            cos_theta / PI
        }
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize_or_zero();
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the reflection below the surface; absorb those
        if scattered_dir.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::specular(
            self.albedo,
            ray_in.spawn(rec.p, scattered_dir),
        ))
    }
}

/// Textured mirror whose blur comes from a second texture.
///
/// The fuzz radius at a point is the length of the fuzz texture's color there,
/// which is what [`crate::texture::RoughnessFromSharpness`] produces.
pub struct Glossy {
    albedo: Arc<dyn Texture>,
    fuzz: Arc<dyn Texture>,
}

impl Glossy {
    pub fn new(albedo: Arc<dyn Texture>, fuzz: Arc<dyn Texture>) -> Self {
        Self { albedo, fuzz }
    }
}

impl Material for Glossy {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize_or_zero(), rec.normal);
        let attenuation = self.albedo.value(rec.u, rec.v, rec.p);
        let fuzz = self.fuzz.value(rec.u, rec.v, rec.p).length();

        let mut direction = reflected + fuzz * random_unit_vector(rng);

        // Catch degenerate scatter direction
        if direction.near_zero() {
            direction = rec.normal;
        }

        Some(ScatterRecord::specular(
            attenuation,
            ray_in.spawn(rec.p, direction),
        ))
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize_or_zero();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterRecord::specular(
            Color::ONE,
            ray_in.spawn(rec.p, direction),
        ))
    }
}

/// Diffuse light emitter. Emits from the front face only.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::from_texture(SolidColor::shared(emit))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        if !rec.front_face {
            return Color::ZERO;
        }
        self.texture.value(u, v, p)
    }
}

/// Scatters uniformly in every direction.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::from_texture(SolidColor::shared(albedo))
    }

    pub fn from_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        Some(ScatterRecord::pdf(
            self.texture.value(rec.u, rec.v, rec.p),
            ScatterPdf::Sphere(SpherePdf),
        ))
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
