//! Textures: spatially varying colors sampled by materials.

use crate::error::TextureError;
use crate::Color;
use lux_math::{Interval, Vec3};
use std::path::Path;
use std::sync::Arc;

/// Returned by [`ImageTexture`] when no image data is available.
pub const MISSING_TEXTURE: Color = Color::new(1.0, 0.0, 1.0);

/// A color lookup by surface coordinates and hit point.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    /// Shared handle, for building materials.
    pub fn shared(albedo: Color) -> Arc<dyn Texture> {
        Arc::new(Self::new(albedo))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// 3D checker pattern, alternating between two textures in cubes of `scale`.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(scale, SolidColor::shared(even), SolidColor::shared(odd))
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let sum = cell.x as i64 + cell.y as i64 + cell.z as i64;

        if sum.rem_euclid(2) == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Image-backed texture with nearest-texel lookup.
///
/// Pixels are stored linear. (0, 0) in UV space is the bottom-left corner.
pub struct ImageTexture {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Build from linear pixel data in row-major order, top row first.
    ///
    /// Falls back to [`ImageTexture::missing`] when `pixels` does not hold
    /// exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        let expected = (width as usize).checked_mul(height as usize);
        if expected != Some(pixels.len()) {
            log::warn!(
                "Texture data has {} pixels, expected {}x{}; using missing texture",
                pixels.len(),
                width,
                height
            );
            return Self::missing();
        }

        Self {
            width,
            height,
            pixels,
        }
    }

    /// A texture with no pixels. Every lookup returns [`MISSING_TEXTURE`].
    pub fn missing() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    /// Load an image, failing on unreadable files.
    pub fn try_open(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyImage(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);
        Ok(Self::from_pixels(width, height, pixels))
    }

    /// Load an image, substituting the magenta sentinel if it cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_open(path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("Could not load texture '{}': {}", path.display(), err);
                Self::missing()
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.width == 0 || self.height == 0 {
            return MISSING_TEXTURE;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v); // Flip V for image coordinates

        let i = ((u * self.width as f32) as u32).min(self.width - 1);
        let j = ((v * self.height as f32) as u32).min(self.height - 1);

        self.pixels[(j * self.width + i) as usize]
    }
}

/// Maps an MTL sharpness map onto a metal fuzz factor.
///
/// Sharpness is clamped to `[min_sharpness, max_sharpness]` and remapped
/// logarithmically so the sharpest value gives zero fuzz. The result is
/// returned in the red channel; glossy materials use the color's length.
pub struct RoughnessFromSharpness {
    sharpness: Arc<dyn Texture>,
    min_sharpness: f32,
    max_sharpness: f32,
}

impl RoughnessFromSharpness {
    pub fn new(sharpness: Arc<dyn Texture>, min_sharpness: f32, max_sharpness: f32) -> Self {
        Self {
            sharpness,
            min_sharpness,
            max_sharpness,
        }
    }
}

impl Texture for RoughnessFromSharpness {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let raw = self.sharpness.value(u, v, p).length();
        let sharpness = Interval::new(self.min_sharpness, self.max_sharpness).clamp(raw);
        let fuzz = 1.0 - sharpness.log10() / self.max_sharpness.log10();
        Color::new(fuzz.clamp(0.0, 1.0), 0.0, 0.0)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_texture() {
        let tex = SolidColor::new(Color::new(1.0, 0.5, 0.0));
        assert_eq!(tex.value(0.3, 0.7, Vec3::ONE), Color::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_checker_alternates() {
        let checker = CheckerTexture::from_colors(1.0, Color::ONE, Color::ZERO);

        assert_eq!(checker.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_image_texture_lookup() {
        // 2x2: top row red, green; bottom row blue, white
        let pixels = vec![
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 1.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
            Color::ONE,
        ];
        let tex = ImageTexture::from_pixels(2, 2, pixels);

        // v = 1 is the top row
        assert_eq!(tex.value(0.1, 0.9, Vec3::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(tex.value(0.9, 0.1, Vec3::ZERO), Color::ONE);

        // Out of range coordinates clamp to the edge
        assert_eq!(tex.value(5.0, -3.0, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_missing_image_falls_back_to_magenta() {
        let tex = ImageTexture::open("definitely/not/a/real/texture.png");
        assert_eq!(tex.width(), 0);
        assert_eq!(tex.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE);

        assert!(ImageTexture::try_open("definitely/not/a/real/texture.png").is_err());
    }

    #[test]
    fn test_mismatched_pixel_data_falls_back_to_magenta() {
        // Three pixels cannot fill a 2x2 image
        let short = ImageTexture::from_pixels(2, 2, vec![Color::ONE; 3]);
        assert_eq!((short.width(), short.height()), (0, 0));
        assert_eq!(short.value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE);

        let long = ImageTexture::from_pixels(1, 1, vec![Color::ONE; 2]);
        assert_eq!(long.value(0.0, 0.0, Vec3::ZERO), MISSING_TEXTURE);

        let exact = ImageTexture::from_pixels(1, 2, vec![Color::ONE; 2]);
        assert_eq!(exact.value(0.0, 0.0, Vec3::ZERO), Color::ONE);
    }

    #[test]
    fn test_roughness_from_sharpness() {
        let sharp = RoughnessFromSharpness::new(
            SolidColor::shared(Color::new(10000.0, 0.0, 0.0)),
            1.0,
            10000.0,
        );
        assert!(sharp.value(0.0, 0.0, Vec3::ZERO).x.abs() < 1e-5);

        let dull = RoughnessFromSharpness::new(SolidColor::shared(Color::ZERO), 1.0, 10000.0);
        assert!((dull.value(0.0, 0.0, Vec3::ZERO).x - 1.0).abs() < 1e-5);

        let mid = RoughnessFromSharpness::new(
            SolidColor::shared(Color::new(100.0, 0.0, 0.0)),
            1.0,
            10000.0,
        );
        assert!((mid.value(0.0, 0.0, Vec3::ZERO).x - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_srgb_to_linear() {
        assert!(srgb_to_linear(0).abs() < 0.001);
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid > 0.1 && mid < 0.5);
    }
}
