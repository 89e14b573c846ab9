//! Composite material for MTL-style surface descriptions.
//!
//! An MTL material carries diffuse, specular, emissive, transparency and
//! sharpness maps at once. [`MixedMaterial`] reinterprets those as a random
//! choice per scatter event between a pass-through, a [`Lambertian`] lobe and
//! a [`Glossy`] lobe, weighted by the relative brightness of each map.

use crate::material::{DiffuseLight, Glossy, Lambertian, Material, ScatterRecord};
use crate::sampling::gen_f32;
use crate::texture::{RoughnessFromSharpness, Texture};
use crate::{Color, HitRecord, Ray};
use lux_math::Vec3;
use rand::RngCore;
use std::sync::Arc;

/// Keeps the probability denominators away from zero on all-black maps.
const WEIGHT_EPSILON: f32 = 1e-5;

/// Sharpness range the roughness remap clamps to.
const MIN_SHARPNESS: f32 = 1.0;
const MAX_SHARPNESS: f32 = 10000.0;

pub struct MixedMaterial {
    diffuse_texture: Arc<dyn Texture>,
    specular_texture: Arc<dyn Texture>,
    transparency_texture: Arc<dyn Texture>,
    diffuse: Lambertian,
    specular: Glossy,
    emissive: DiffuseLight,
}

impl MixedMaterial {
    pub fn new(
        diffuse: Arc<dyn Texture>,
        specular: Arc<dyn Texture>,
        emissive: Arc<dyn Texture>,
        transparency: Arc<dyn Texture>,
        sharpness: Arc<dyn Texture>,
    ) -> Self {
        let roughness: Arc<dyn Texture> = Arc::new(RoughnessFromSharpness::new(
            sharpness,
            MIN_SHARPNESS,
            MAX_SHARPNESS,
        ));

        Self {
            diffuse: Lambertian::from_texture(diffuse.clone()),
            specular: Glossy::new(specular.clone(), roughness),
            emissive: DiffuseLight::from_texture(emissive),
            diffuse_texture: diffuse,
            specular_texture: specular,
            transparency_texture: transparency,
        }
    }

    /// Chance that a ray passes straight through.
    fn transparency_prob(&self, u: f32, v: f32, p: Vec3) -> f32 {
        let diff = self.diffuse_texture.value(u, v, p).length();
        let spec = self.specular_texture.value(u, v, p).length();
        let transp = self.transparency_texture.value(u, v, p).length();
        transp / (transp + diff + spec + WEIGHT_EPSILON)
    }

    /// Chance that a reflected ray takes the diffuse lobe rather than the glossy one.
    fn diffuse_prob(&self, u: f32, v: f32, p: Vec3) -> f32 {
        let diff = self.diffuse_texture.value(u, v, p).length();
        let spec = self.specular_texture.value(u, v, p).length();
        diff / (diff + spec + WEIGHT_EPSILON)
    }
}

impl Material for MixedMaterial {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterRecord> {
        if self.transparency_prob(rec.u, rec.v, rec.p) > gen_f32(rng) {
            // Continue in the same direction from the hit point
            let attenuation = self.transparency_texture.value(rec.u, rec.v, rec.p);
            let through = ray_in.spawn(rec.p, ray_in.direction());
            return Some(ScatterRecord::specular(attenuation, through));
        }

        if self.diffuse_prob(rec.u, rec.v, rec.p) > gen_f32(rng) {
            self.diffuse.scatter(ray_in, rec, rng)
        } else {
            self.specular.scatter(ray_in, rec, rng)
        }
    }

    fn emitted(&self, ray_in: &Ray, rec: &HitRecord, u: f32, v: f32, p: Vec3) -> Color {
        self.emissive.emitted(ray_in, rec, u, v, p)
    }

    /// Only the diffuse lobe has a density; the glossy lobe is specular.
    fn scattering_pdf(&self, ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let diff_prob = self.diffuse_prob(rec.u, rec.v, rec.p);
        diff_prob * self.diffuse.scattering_pdf(ray_in, rec, scattered)
            + (1.0 - diff_prob) * self.specular.scattering_pdf(ray_in, rec, scattered)
    }
}
