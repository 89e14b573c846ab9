//! BVH traversal against a brute-force scan over the same primitives.

use lux_renderer::{
    BvhNode, Hittable, HittableList, Interval, MaterialId, Quad, Ray, Rotate, Sphere, Translate,
    Triangle, TriangleMesh, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_vec(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Same pseudo-random scene every call for a given seed.
fn random_scene(seed: u64, count: usize) -> HittableList {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = HittableList::new();

    for i in 0..count {
        let material = MaterialId(i as u32);
        let center = random_vec(&mut rng, 20.0);
        match i % 4 {
            0 => list.add(Sphere::new(center, rng.gen_range(0.2..2.0), material)),
            1 => list.add(Quad::new(
                center,
                random_vec(&mut rng, 2.0),
                random_vec(&mut rng, 2.0),
                material,
            )),
            2 => list.add(Triangle::new(
                center,
                center + random_vec(&mut rng, 2.0),
                center + random_vec(&mut rng, 2.0),
                material,
            )),
            _ => {
                let sphere = Sphere::new(Vec3::ZERO, rng.gen_range(0.2..1.0), material);
                let angle = rng.gen_range(0.0..360.0);
                list.add(Translate::new(Rotate::y(sphere, angle), center));
            }
        }
    }

    list
}

#[test]
fn test_bvh_matches_brute_force() {
    let _ = env_logger::builder().is_test(true).try_init();

    for seed in 0..4 {
        let brute = random_scene(seed, 120);
        let bvh = BvhNode::from_list(random_scene(seed, 120));
        let mut rng = StdRng::seed_from_u64(1000 + seed);

        let mut hits = 0;
        for _ in 0..2000 {
            let origin = random_vec(&mut rng, 30.0);
            let target = random_vec(&mut rng, 20.0);
            let ray = Ray::new(origin, target - origin, 0.0);
            let ray_t = Interval::new(0.001, f32::INFINITY);

            let expected = brute.hit(&ray, ray_t);
            let actual = bvh.hit(&ray, ray_t);
            match (expected, actual) {
                (None, None) => {}
                (Some(e), Some(a)) => {
                    hits += 1;
                    assert!((e.t - a.t).abs() < 1e-4, "seed {seed}: t {} vs {}", e.t, a.t);
                    assert_eq!(e.material, a.material);
                }
                (e, a) => panic!("seed {seed}: brute force {:?} vs bvh {:?}", e.map(|r| r.t), a.map(|r| r.t)),
            }
        }
        assert!(hits > 50, "seed {seed}: only {hits} hits");
    }
}

#[test]
fn test_bvh_bounds_contain_every_object() {
    let list = random_scene(9, 64);
    let boxes: Vec<_> = list.iter().map(|o| o.bounding_box()).collect();
    let bvh = BvhNode::from_list(list);
    let root = bvh.bounding_box();

    for b in boxes {
        for axis in 0..3 {
            let outer = root.axis_interval(axis);
            let inner = b.axis_interval(axis);
            assert!(outer.min <= inner.min && inner.max <= outer.max);
        }
    }
}

#[test]
fn test_nested_mesh_bvh() {
    // A grid of triangles under its own BVH, nested in an outer BVH
    let n = 8;
    let mut positions = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            positions.push(Vec3::new(i as f32, j as f32, 0.0));
        }
    }
    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let a = j * (n + 1) + i;
            faces.push([a, a + 1, a + n + 2]);
            faces.push([a, a + n + 2, a + n + 1]);
        }
    }
    let mesh = TriangleMesh::new(positions, faces, MaterialId(1)).build().unwrap();

    let mut outer = HittableList::new();
    outer.add(mesh);
    outer.add(Sphere::new(Vec3::new(4.0, 4.0, 3.0), 1.0, MaterialId(2)));
    let bvh = BvhNode::from_list(outer);

    let ray_t = Interval::new(0.001, f32::INFINITY);
    let through_sphere = Ray::new(Vec3::new(4.0, 4.0, 10.0), -Vec3::Z, 0.0);
    assert_eq!(bvh.hit(&through_sphere, ray_t).unwrap().material, MaterialId(2));

    let onto_mesh = Ray::new(Vec3::new(1.3, 6.7, 10.0), -Vec3::Z, 0.0);
    let rec = bvh.hit(&onto_mesh, ray_t).unwrap();
    assert_eq!(rec.material, MaterialId(1));
    assert!((rec.t - 10.0).abs() < 1e-4);
}
