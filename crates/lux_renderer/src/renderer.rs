//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Light sampling mixed 50/50 with material sampling
//! - Gamma correction and P3 pixel-map output

use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf, Pdf};
use crate::stats::{self, RenderStats};
use crate::{Color, Ray, Scene};
use lux_math::Interval;
use rand::RngCore;
use std::io::{self, Write};

/// Closest distance a scattered ray may travel before its next hit.
///
/// Keeps rays from re-hitting the surface they just left.
pub const SHADOW_EPSILON: f32 = 0.001;

/// Per-sample integrator settings.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Drop scatter samples whose mixture density is unusable instead of
    /// dividing by it
    pub pdf_guard: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            background: Color::ZERO,
            pdf_guard: true,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    // Ray didn't hit anything - return background
    let Some(rec) = scene.world.hit(ray, Interval::new(SHADOW_EPSILON, f32::INFINITY)) else {
        return config.background;
    };

    // Dangling handles absorb
    let Some(material) = scene.material(rec.material) else {
        return Color::ZERO;
    };

    let emission = material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(srec) = material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let material_pdf = match srec.kind {
        ScatterKind::Specular(next) => {
            return emission + srec.attenuation * ray_color(&next, scene, depth - 1, config, rng);
        }
        ScatterKind::Pdf(pdf) => pdf,
    };

    let (direction, density) = if scene.lights.is_empty() {
        let direction = material_pdf.generate(rng);
        (direction, material_pdf.value(direction))
    } else {
        let light_pdf = HittablePdf::new(&scene.lights, rec.p);
        let mixture = MixturePdf::new(&light_pdf, &material_pdf);
        let direction = mixture.generate(rng);
        (direction, mixture.value(direction))
    };

    if config.pdf_guard && !(density.is_finite() && density > 0.0) {
        stats::record(|s| s.guarded_samples += 1);
        return emission;
    }

    let scattered = ray.spawn(rec.p, direction);
    let scattering_pdf = material.scattering_pdf(ray, &rec, &scattered);
    let incoming = ray_color(&scattered, scene, depth - 1, config, rng);

    emission + srec.attenuation * scattering_pdf * incoming / density
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert one linear channel to a display byte. NaN maps to 0.
#[inline]
fn channel_to_byte(linear: f32) -> u8 {
    let linear = if linear.is_nan() { 0.0 } else { linear };
    let intensity = Interval::new(0.0, 0.999);
    (256.0 * intensity.clamp(linear_to_gamma(linear))) as u8
}

/// Convert a color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    [
        channel_to_byte(color.x),
        channel_to_byte(color.y),
        channel_to_byte(color.z),
    ]
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let [r, g, b] = color_to_rgb(color);
    [r, g, b, 255]
}

/// Simple image buffer for storing render output.
///
/// Pixels are linear, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Write the image as an ASCII (P3) pixel map.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?;

        for color in &self.pixels {
            let [r, g, b] = color_to_rgb(*color);
            writeln!(out, "{} {} {}", r, g, b)?;
        }
        out.flush()
    }
}

/// A finished frame and the statistics gathered while tracing it.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub image: ImageBuffer,
    pub stats: RenderStats,
}

/// Seed for the generator of pixel `index` in a render seeded with `seed`.
///
/// SplitMix64 finalizer over both inputs, so neighbouring pixels and
/// neighbouring seeds get unrelated streams.
pub fn pixel_seed(seed: u64, index: u64) -> u64 {
    splitmix64(seed ^ splitmix64(index))
}

#[inline]
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
