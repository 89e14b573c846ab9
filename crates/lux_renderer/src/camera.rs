//! Camera for ray generation.

use crate::bucket::{render_buckets, DEFAULT_BUCKET_SIZE};
use crate::error::RenderResult;
use crate::renderer::{RenderConfig, RenderOutput};
use crate::sampling::{gen_f32, random_in_unit_disk};
use crate::{Color, HittableList, MaterialId, Quad, Ray, Scene};
use lux_math::Vec3;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// User-facing camera and render settings.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// let config: lux_renderer::CameraConfig =
///     serde_json::from_str(r#"{ "image_width": 320, "vfov": 40.0 }"#).unwrap();
/// assert_eq!(config.samples_per_pixel, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Samples per pixel, rounded down to a square for stratification
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub background: Color,

    /// Vertical field of view in degrees
    pub vfov: f32,
    pub look_from: Vec3,
    pub look_at: Vec3,
    pub vup: Vec3,

    /// Variation angle of rays through each pixel
    pub defocus_angle: f32,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f32,

    pub seed: u64,
    /// See [`RenderConfig::pdf_guard`]
    pub pdf_guard: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            vfov: 90.0,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            seed: 0,
            pdf_guard: true,
        }
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,

    // Cached computed values (set by initialize())
    image_width: u32,
    image_height: u32,
    sqrt_spp: u32,
    recip_sqrt_spp: f32,
    pixel_samples_scale: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    viewport_u: Vec3,
    viewport_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::from_config(CameraConfig::default())
    }

    /// Create a camera from settings. Call [`Camera::initialize`] before use.
    pub fn from_config(config: CameraConfig) -> Self {
        Self {
            config,
            image_width: 1,
            image_height: 1,
            sqrt_spp: 1,
            recip_sqrt_spp: 1.0,
            pixel_samples_scale: 1.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            viewport_u: Vec3::ZERO,
            viewport_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution. The aspect ratio follows from it.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.config.image_width = width;
        self.config.aspect_ratio = width as f32 / height.max(1) as f32;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.config.samples_per_pixel = samples;
        self.config.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.config.look_from = look_from;
        self.config.look_at = look_at;
        self.config.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.config.vfov = vfov;
        self.config.defocus_angle = defocus_angle;
        self.config.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.config.background = color;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_pdf_guard(mut self, pdf_guard: bool) -> Self {
        self.config.pdf_guard = pdf_guard;
        self
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Samples actually taken per pixel after rounding down to a square.
    pub fn samples_per_pixel(&self) -> u32 {
        self.sqrt_spp * self.sqrt_spp
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Integrator settings derived from this camera.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            max_depth: self.config.max_depth,
            background: self.config.background,
            pdf_guard: self.config.pdf_guard,
        }
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        if self.config.image_width == 0 {
            log::warn!("image_width is 0, clamping to 1");
            self.config.image_width = 1;
        }
        if self.config.samples_per_pixel == 0 {
            log::warn!("samples_per_pixel is 0, clamping to 1");
            self.config.samples_per_pixel = 1;
        }

        let config = &self.config;
        self.image_width = config.image_width;
        let height = config.image_width as f32 / config.aspect_ratio;
        self.image_height = if height.is_finite() && height >= 1.0 {
            height as u32
        } else {
            1
        };

        self.sqrt_spp = ((config.samples_per_pixel as f32).sqrt() as u32).max(1);
        self.recip_sqrt_spp = 1.0 / self.sqrt_spp as f32;
        self.pixel_samples_scale = 1.0 / (self.sqrt_spp * self.sqrt_spp) as f32;

        self.center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (config.look_from - config.look_at).normalize_or_zero();
        self.u = config.vup.cross(self.w).normalize_or_zero();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        self.viewport_u = viewport_width * self.u;
        self.viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = self.viewport_u / self.image_width as f32;
        self.pixel_delta_v = self.viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left = self.center
            - config.focus_dist * self.w
            - self.viewport_u / 2.0
            - self.viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;
    }

    /// Generate a ray for sub-pixel cell (s_i, s_j) of pixel (i, j).
    ///
    /// The pixel is divided into a `sqrt_spp` x `sqrt_spp` grid and the ray
    /// passes through a random point of the chosen cell.
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Average radiance through pixel (i, j) over the stratified sample grid.
    pub fn render_pixel(
        &self,
        scene: &Scene,
        i: u32,
        j: u32,
        config: &RenderConfig,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut pixel_color = Color::ZERO;

        for s_j in 0..self.sqrt_spp {
            for s_i in 0..self.sqrt_spp {
                let ray = self.get_ray(i, j, s_i, s_j, rng);
                pixel_color += crate::renderer::ray_color(&ray, scene, config.max_depth, config, rng);
            }
        }

        self.pixel_samples_scale * pixel_color
    }

    /// Initialize and render the scene.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<RenderOutput> {
        self.render_with_cancel(scene, &AtomicBool::new(false))
    }

    /// Initialize and render the scene, stopping early once `cancel` is set.
    ///
    /// The flag is checked before each bucket starts, so a cancelled render
    /// finishes the buckets already in flight and then returns
    /// [`crate::RenderError::Cancelled`].
    pub fn render_with_cancel(
        &mut self,
        scene: &Scene,
        cancel: &AtomicBool,
    ) -> RenderResult<RenderOutput> {
        self.initialize();

        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}, seed {}",
            self.image_width,
            self.image_height,
            self.samples_per_pixel(),
            self.config.max_depth,
            self.config.seed
        );
        let start = Instant::now();

        let output = render_buckets(self, scene, DEFAULT_BUCKET_SIZE, cancel)?;

        log::info!("Render finished in {:.2?}", start.elapsed());
        log::info!(
            "Triangles: {} tests, {} hits, {} parallel, {} barycentric, {} beyond; quads: {} hits",
            output.stats.triangle_tests,
            output.stats.triangle_hits,
            output.stats.triangle_parallel,
            output.stats.triangle_barycentric,
            output.stats.triangle_beyond,
            output.stats.quad_hits
        );
        if output.stats.guarded_samples > 0 {
            log::info!("Guarded samples: {}", output.stats.guarded_samples);
        }

        Ok(output)
    }

    /// Attach a large emitter to the camera, facing the scene.
    ///
    /// The quad spans 100 viewports and sits just behind the camera center
    /// (1% of the look distance), so camera rays never hit it while every
    /// surface the camera sees is lit from the viewing direction. The same
    /// quad goes into `world` and `lights`. Requires [`Camera::initialize`].
    pub fn colocate_light(&self, world: &mut HittableList, lights: &mut HittableList, material: MaterialId) {
        let offset = (self.config.look_at - self.config.look_from) * 0.01;
        let span_u = self.viewport_u * 100.0;
        let span_v = self.viewport_v * 100.0;
        let corner = self.center + span_u / 2.0 + span_v / 2.0 - offset;

        world.add(Quad::new(corner, -span_u, -span_v, material));
        lights.add(Quad::new(corner, -span_u, -span_v, material));
    }

    /// Offset within a pixel, uniform within cell (s_i, s_j), in [-0.5, 0.5).
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Vec3 {
        let px = ((s_i as f32 + gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        let py = ((s_j as f32 + gen_f32(rng)) * self.recip_sqrt_spp) - 0.5;
        Vec3::new(px, py, 0.0)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
