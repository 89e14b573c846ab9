//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel using rayon.

use crate::error::{RenderError, RenderResult};
use crate::renderer::{pixel_seed, ImageBuffer, RenderConfig, RenderOutput};
use crate::stats::{self, RenderStats};
use crate::{Camera, Color, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self { x, y, width, height, index }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets for an image, sorted in spiral order from center.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let bucket_size = bucket_size.max(1);
    let mut buckets = Vec::new();
    let mut index = 0;

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    sort_spiral(&mut buckets, width, height);

    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance from image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    let dist = |b: &Bucket| {
        let cx = b.x as f32 + b.width as f32 / 2.0;
        let cy = b.y as f32 + b.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    buckets.sort_by(|a, b| {
        dist(a)
            .partial_cmp(&dist(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Render a single bucket.
///
/// Every pixel draws from its own generator seeded by [`pixel_seed`] with the
/// pixel's row-major index, so the result does not depend on which thread
/// renders the bucket or in what order.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
) -> BucketResult {
    // Discard anything this worker counted outside a bucket
    stats::take();

    let width = camera.image_width() as u64;
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        for local_x in 0..bucket.width {
            let x = bucket.x + local_x;
            let y = bucket.y + local_y;
            let index = y as u64 * width + x as u64;
            let mut rng = StdRng::seed_from_u64(pixel_seed(camera.seed(), index));
            pixels.push(camera.render_pixel(scene, x, y, config, &mut rng));
        }
    }

    BucketResult::new(*bucket, pixels, stats::take())
}

/// Render every bucket of an initialized camera in parallel and stitch the
/// results into one image.
///
/// `cancel` is polled before each bucket starts; once it is set no new bucket
/// begins and the render returns [`RenderError::Cancelled`].
pub fn render_buckets(
    camera: &Camera,
    scene: &Scene,
    bucket_size: u32,
    cancel: &AtomicBool,
) -> RenderResult<RenderOutput> {
    let width = camera.image_width();
    let height = camera.image_height();
    let config = camera.render_config();
    let buckets = generate_buckets(width, height, bucket_size);
    log::debug!("Rendering {} buckets of up to {}px", buckets.len(), bucket_size);

    let results = buckets
        .par_iter()
        .map(|bucket| {
            if cancel.load(Ordering::Relaxed) {
                return Err(RenderError::Cancelled);
            }
            let result = render_bucket(bucket, camera, scene, &config);
            log::debug!(
                "Bucket {} at ({}, {}) done",
                bucket.index,
                bucket.x,
                bucket.y
            );
            Ok(result)
        })
        .collect::<RenderResult<Vec<_>>>()?;

    let mut image = ImageBuffer::new(width, height);
    let mut stats = RenderStats::default();

    for result in results {
        let bucket = result.bucket;
        for (i, color) in result.pixels.into_iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            image.set(bucket.x + local_x, bucket.y + local_y, color);
        }
        stats += result.stats;
    }

    Ok(RenderOutput { image, stats })
}

/// Result of rendering a bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    /// The bucket that was rendered
    pub bucket: Bucket,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
    /// Counters gathered while tracing this bucket
    pub stats: RenderStats,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>, stats: RenderStats) -> Self {
        Self { bucket, pixels, stats }
    }
}
