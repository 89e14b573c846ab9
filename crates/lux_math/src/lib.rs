// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod aabb;
mod interval;
mod onb;
mod ray;
pub mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat3Ext;

/// Components below this magnitude count as zero for direction checks.
pub const NEAR_ZERO: f32 = 1e-8;

/// Extra vector queries used by the tracer.
pub trait Vec3Ext {
    /// True if every component is within [`NEAR_ZERO`] of zero.
    ///
    /// Scattered directions that collapse like this are degenerate and get
    /// replaced by the surface normal.
    fn near_zero(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn near_zero(&self) -> bool {
        self.x.abs() < NEAR_ZERO && self.y.abs() < NEAR_ZERO && self.z.abs() < NEAR_ZERO
    }
}
