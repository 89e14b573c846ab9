//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Uses a binary tree structure for efficient ray-scene intersection testing.
//! Every leaf holds exactly one primitive; nested BVHs (one per mesh) are
//! ordinary primitives of the outer tree.

use crate::{HitRecord, Hittable, HittableList, Ray};
use lux_math::{Aabb, Interval};

/// BVH node - either a branch with two children or a leaf with one primitive.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node wrapping a single primitive.
    Leaf {
        object: Box<dyn Hittable>,
        bbox: Aabb,
    },
    /// Empty node (for edge cases). Never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let count = objects.len();
        let node = Self::build(objects);
        log::debug!(
            "Built BVH: {} primitives, {} nodes, depth {}",
            count,
            node.node_count(),
            node.depth()
        );
        node
    }

    /// Build from the objects of a [`HittableList`].
    pub fn from_list(list: HittableList) -> Self {
        Self::new(list.into_objects())
    }

    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort objects by centroid on the longest
    /// axis of the span's bounding box, split in half, recurse.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let n = objects.len();

        if n == 1 {
            let object = objects.remove(0);
            let bbox = object.bounding_box();
            return BvhNode::Leaf { object, bbox };
        }

        // Compute bounding box of all objects
        let bounds = objects.iter().fold(Aabb::EMPTY, |acc, o| {
            Aabb::surrounding(&acc, &o.bounding_box())
        });
        let axis = bounds.longest_axis();

        // Sort objects by centroid on chosen axis
        objects.sort_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        // Split at midpoint
        let right_objects = objects.split_off(n / 2);
        let left = Self::build(objects);
        let right = Self::build(right_objects);

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox: bounds,
        }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MaterialId, Quad, Sphere};
    use lux_math::Vec3;

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.hit(&Ray::new(Vec3::ZERO, Vec3::Z, 0.0), Interval::UNIVERSE).is_none());
        assert_eq!(bvh.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0));

        let objects: Vec<Box<dyn Hittable>> = vec![Box::new(sphere)];
        let bvh = BvhNode::new(objects);

        // Should create a leaf
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        // Test ray hit
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        assert!(bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_some());
    }

    #[test]
    fn test_bvh_two_leaves() {
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::new(-2.0, 0.0, 0.0), 0.5, MaterialId(0))),
            Box::new(Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5, MaterialId(1))),
        ];
        let bvh = BvhNode::new(objects);

        match &bvh {
            BvhNode::Branch { left, right, .. } => {
                assert!(matches!(**left, BvhNode::Leaf { .. }));
                assert!(matches!(**right, BvhNode::Leaf { .. }));
            }
            _ => panic!("two objects should make a branch"),
        }
        assert_eq!(bvh.node_count(), 3);
        assert_eq!(bvh.depth(), 2);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Box<dyn Hittable>> = (0..10)
            .map(|i| {
                let sphere = Sphere::new(Vec3::new(i as f32, 0.0, -5.0), 0.5, MaterialId(i));
                Box::new(sphere) as Box<dyn Hittable>
            })
            .collect();

        let bvh = BvhNode::new(spheres);
        assert_eq!(bvh.node_count(), 19);

        // Test ray that hits sphere at x=5
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        // Hit point should be near z = -4.5 (sphere at z=-5, radius 0.5)
        assert!((rec.p.z - (-4.5)).abs() < 0.01);
        assert_eq!(rec.material, MaterialId(5));
    }

    #[test]
    fn test_bvh_returns_closest_across_subtrees() {
        // Spheres strung along the ray, so both subtrees overlap it
        let mut list = HittableList::new();
        for (i, z) in [-9.0, -3.0, -12.0, -6.0].into_iter().enumerate() {
            list.add(Sphere::new(Vec3::new(0.0, 0.0, z), 1.0, MaterialId(i as u32)));
        }
        let bvh = BvhNode::from_list(list);

        let ray = Ray::new(Vec3::ZERO, -Vec3::Z, 0.0);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert_eq!(rec.material, MaterialId(1));
        assert!((rec.t - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_bvh_hits_flat_quads_far_from_origin() {
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Quad::new(Vec3::new(0.0, 5000.0, 0.0), Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0), MaterialId(0))),
            Box::new(Quad::new(Vec3::new(20.0, 5000.0, 0.0), Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 10.0), MaterialId(1))),
        ];
        let bvh = BvhNode::new(objects);

        for (x, material) in [(5.0, MaterialId(0)), (25.0, MaterialId(1))] {
            let down = Ray::new(Vec3::new(x, 5010.0, 5.0), -Vec3::Y, 0.0);
            let rec = bvh
                .hit(&down, Interval::new(0.001, f32::INFINITY))
                .expect("flat quad at y=5000 must be hit");
            assert_eq!(rec.material, material);
            assert!((rec.t - 10.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_bvh_build_with_nan_centroid() {
        // Construction must not panic or drop objects when a bound is NaN
        let objects: Vec<Box<dyn Hittable>> = vec![
            Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(0))),
            Box::new(Sphere::new(Vec3::new(f32::NAN, 0.0, -1.0), 0.5, MaterialId(1))),
            Box::new(Sphere::new(Vec3::new(3.0, 0.0, -1.0), 0.5, MaterialId(2))),
        ];
        let bvh = BvhNode::new(objects);
        assert_eq!(bvh.node_count(), 5);
    }
}
