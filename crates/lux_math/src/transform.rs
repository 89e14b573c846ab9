// Transform utilities for Mat3
//
// Extends glam::Mat3 with the bounding-box and rotation helpers the
// instancing wrappers need.

use crate::Aabb;
use glam::{EulerRot, Mat3, Vec3};

/// Extension trait for Mat3 to provide additional transform utilities
pub trait Mat3Ext {
    /// Rotation about X, then Y, then Z, with angles in degrees.
    fn from_euler_degrees(x: f32, y: f32, z: f32) -> Mat3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn from_euler_degrees(x: f32, y: f32, z: f32) -> Mat3 {
        // Extrinsic X then Y then Z is intrinsic Z-Y-X
        Mat3::from_euler(
            EulerRot::ZYX,
            z.to_radians(),
            y.to_radians(),
            x.to_radians(),
        )
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.x.is_empty() || aabb.y.is_empty() || aabb.z.is_empty() {
            return *aabb;
        }

        let lo = aabb.min();
        let hi = aabb.max();

        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            let transformed = *self * corner;
            result_min = result_min.min(transformed);
            result_max = result_max.max(transformed);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euler_degrees_y() {
        let mat = Mat3::from_euler_degrees(0.0, 90.0, 0.0);
        let rotated = mat * Vec3::X;

        // +X rotates to -Z around +Y
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_euler_degrees_order() {
        // X first: Y -> Z, then Z about Y by 90: Z -> X
        let mat = Mat3::from_euler_degrees(90.0, 90.0, 0.0);
        let rotated = mat * Vec3::Y;
        assert!((rotated - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat3::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 1e-5);
        assert!((transformed.max() - aabb.max()).length() < 1e-5);
    }

    #[test]
    fn test_transform_aabb_rotation() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let transformed = Mat3::from_euler_degrees(0.0, 0.0, 90.0).transform_aabb(&aabb);

        // X extent becomes Y extent
        assert!((transformed.y.size() - 2.0).abs() < 1e-4);
        assert!((transformed.x.min - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_transform_aabb_empty() {
        let transformed = Mat3::IDENTITY.transform_aabb(&Aabb::EMPTY);
        assert_eq!(transformed, Aabb::EMPTY);
    }
}
