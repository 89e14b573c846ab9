//! Lux - CPU Monte Carlo path tracer
//!
//! Traces spheres, quads and triangle meshes through a BVH, shades them with
//! a small set of physically based materials and importance-samples the
//! scene's lights through a mixture of PDFs. Buckets are rendered in parallel
//! with rayon, each pixel drawing from its own seeded generator, so a render
//! is reproducible for a given seed.

mod bucket;
mod bvh;
mod camera;
mod error;
mod hittable;
mod material;
mod mesh;
mod mixed;
mod pdf;
mod quad;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
pub mod stats;
pub mod texture;
mod transform;
mod triangle;

pub use bucket::{
    generate_buckets, render_bucket, render_buckets, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraConfig};
pub use error::{MeshError, RenderError, RenderResult, TextureError};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Dielectric, DiffuseLight, Glossy, Isotropic, Lambertian, Material, MaterialId, MaterialTable,
    Metal, ScatterKind, ScatterRecord,
};
pub use mesh::TriangleMesh;
pub use mixed::MixedMaterial;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf, ScatterPdf, SpherePdf};
pub use quad::{make_box, Quad};
pub use renderer::{
    color_to_rgb, color_to_rgba, linear_to_gamma, pixel_seed, ray_color, ImageBuffer,
    RenderConfig, RenderOutput, SHADOW_EPSILON,
};
pub use scene::Scene;
pub use sphere::Sphere;
pub use stats::RenderStats;
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture};
pub use transform::{FlipFace, Rotate, Scale, Translate};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Aabb, Interval, Onb, Ray, Vec2, Vec3};

/// Linear RGB radiance.
pub type Color = Vec3;
