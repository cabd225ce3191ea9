use graphics_mathlib::core::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_vec3(rng: &mut StdRng, range: std::ops::Range<f32>) -> Vec3 {
    Vec3 {
        x: rng.gen_range(range.clone()),
        y: rng.gen_range(range.clone()),
        z: rng.gen_range(range),
    }
}

fn random_transform(rng: &mut StdRng) -> Mat4x4 {
    let angles = random_vec3(rng, -180.0..180.0);
    let offset = random_vec3(rng, -10.0..10.0);
    let mut m = Mat4x4::make_rotation(angles.x, angles.y, angles.z);
    m.translate(offset.x, offset.y, offset.z).scale(
        rng.gen_range(0.5..2.0),
        rng.gen_range(0.5..2.0),
        -rng.gen_range(0.5..2.0),
    );
    m
}

fn integer_vec3(rng: &mut StdRng, lo: i32, hi: i32) -> Vec3 {
    Vec3 {
        x: rng.gen_range(lo..=hi) as f32,
        y: rng.gen_range(lo..=hi) as f32,
        z: rng.gen_range(lo..=hi) as f32,
    }
}

// ==================== Vector Tests ====================

#[test]
fn normalised_vectors_have_unit_length() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let v = random_vec3(&mut rng, -100.0..100.0);
        if v.len() < 1e-3 {
            continue;
        }
        assert!((v.normed().len() - 1.0).abs() < EPSILON);
    }
    assert_eq!(Vec3::zero().normed(), Vec3::zero());
    assert!((Vec2 { x: 3.0, y: 4.0 }.normed().len() - 1.0).abs() < EPSILON);
}

// ==================== Matrix Tests ====================

#[test]
fn matrix_times_inverse_is_identity() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        let m = random_transform(&mut rng);
        let inverse = m.inverse().unwrap();
        assert!((m * inverse).almost_eq_within(Mat4x4::identity(), 1e-3));
        assert!((inverse * m).almost_eq_within(Mat4x4::identity(), 1e-3));
    }
    assert!(matches!(
        Mat4x4::zero().inverse(),
        Err(GeomError::SingularMatrix)
    ));
}

#[test]
fn known_rotations() {
    let mut m = Mat4x4::identity();
    m.rotate_x(90.0).rotate_z(45.0);
    let v = Vec3 {
        x: 3.0,
        y: -10.0,
        z: 2.0,
    } * m;
    assert!(v.almost_eq_within(
        Vec3 {
            x: 9.19239,
            y: -2.0,
            z: -4.94975,
        },
        1e-4
    ));

    let v = Vec2 { x: 3.0, y: -10.0 } * Mat3x3::rotation(90.0);
    assert!(v.almost_eq_within(Vec2 { x: 10.0, y: 3.0 }, 1e-4));
}

#[test]
fn identity_and_transpose_are_idempotent() {
    let mut rng = StdRng::seed_from_u64(3);
    let m = random_transform(&mut rng);

    let mut twice = m;
    twice.transpose().transpose();
    assert_eq!(twice, m);

    let mut once = m;
    once.load_identity();
    let mut again = once;
    again.load_identity();
    assert_eq!(once, again);
    assert_eq!(once, Mat4x4::identity());
}

// ==================== Quaternion Tests ====================

#[test]
fn quaternion_matrix_round_trip() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..100 {
        let angles = random_vec3(&mut rng, -180.0..180.0);
        for order in EulerOrder::all() {
            let mut m = Mat4x4::identity();
            m.rotate(angles, order);
            let q = Quat::from_rotation_matrix(&m);
            assert!(
                q.to_matrix().almost_eq_within(m, 1e-3),
                "order {order}, angles {angles}"
            );
        }
    }
}

// ==================== Bounding Box Tests ====================

#[test]
fn bounding_boxes_contain_points() {
    let box3 = Aabb3::from_two_points(Vec3::one() * 10.0, -Vec3::one() * 10.0);
    assert!(box3.contains_point(Vec3 {
        x: 2.0,
        y: 3.0,
        z: -6.0,
    }));
    assert!(box3.contains_point(Vec3::one() * 10.0));
    assert!(!box3.contains_point(Vec3::one() * 10.5));

    let box2 = Aabb2::from_two_points(Vec2 { x: -10.0, y: -10.0 }, Vec2 { x: 10.0, y: 10.0 });
    assert!(box2.contains_point(Vec2 { x: 2.0, y: 3.0 }));
    assert!(!box2.contains_point(Vec2 { x: 2.0, y: 30.0 }));

    let points = [
        Vec3::zero(),
        Vec3 {
            x: 1.0,
            y: -2.0,
            z: 3.0,
        },
    ];
    let fitted = Aabb3::from_points(&points).unwrap();
    assert!(points.iter().all(|p| fitted.contains_point(*p)));
}

// ==================== 2D Geometry Tests ====================

#[test]
fn nearest_polygon_edge() {
    let square = [
        Vec2 { x: 0.0, y: 0.0 },
        Vec2 { x: 20.0, y: 0.0 },
        Vec2 { x: 20.0, y: 20.0 },
        Vec2 { x: 0.0, y: 20.0 },
    ];
    let nearest = geom2::point_to_nearest_polygon(Vec2 { x: 15.0, y: 19.0 }, &square).unwrap();
    assert_eq!(nearest.dist, 1.0);
    assert_eq!(nearest.edge_index, 2);
    assert_eq!(nearest.edge.start, Vec2 { x: 20.0, y: 20.0 });
    assert_eq!(nearest.point, Vec2 { x: 15.0, y: 20.0 });

    assert_eq!(
        geom2::distance_point_to_polygon(Vec2 { x: 15.0, y: 15.0 }, &square),
        5.0
    );
    assert_eq!(
        geom2::distance_point_to_polygon(Vec2 { x: 25.0, y: 10.0 }, &square),
        5.0
    );
}

// ==================== 3D Geometry Tests ====================

#[test]
fn slab_test_treats_zero_and_tiny_components_alike() {
    let aabb = Aabb3::from_two_points(-Vec3::one(), Vec3::one());
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let origin = Vec3 {
            x: rng.gen_range(-20.0..-2.0),
            y: rng.gen_range(-0.9..0.9),
            z: rng.gen_range(-0.9..0.9),
        };
        let exact = Ray::new(origin, Vec3::right());
        let tiny = Ray::new(
            origin,
            Vec3 {
                x: 1.0,
                y: 1e-12,
                z: 0.0,
            },
        );
        let lhs = geom3::ray_intersects_box(&exact, &aabb).unwrap();
        let rhs = geom3::ray_intersects_box(&tiny, &aabb).unwrap();
        assert!((lhs.t_min - rhs.t_min).abs() < EPSILON);
        assert!((lhs.t_max - rhs.t_max).abs() < EPSILON);
    }
}

#[test]
fn slab_test_accepts_rays_along_a_face() {
    let aabb = Aabb3::from_two_points(-Vec3::one(), Vec3::one());
    let cases = [
        // min-x face, max-x face, then min-x face with a negative zero.
        (Vec3 { x: -1.0, y: -5.0, z: 0.0 }, 0.0, 1e-12),
        (Vec3 { x: 1.0, y: -5.0, z: 0.0 }, 0.0, -1e-12),
        (Vec3 { x: -1.0, y: -5.0, z: 0.0 }, -0.0, 1e-12),
    ];
    for (origin, zero, tiny) in cases {
        let exact = Ray::new(origin, Vec3 { x: zero, y: 1.0, z: 0.0 });
        let approx = Ray::new(origin, Vec3 { x: tiny, y: 1.0, z: 0.0 });
        let lhs = geom3::ray_intersects_box(&exact, &aabb);
        assert_eq!(lhs, geom3::ray_intersects_box(&approx, &aabb), "{origin}");
        assert_eq!(lhs, Some(SlabInterval { t_min: 4.0, t_max: 6.0 }));
        assert_eq!(aabb.intersects_ray(&exact), lhs);
    }
}

#[test]
fn triangle_box_overlap() {
    let aabb = Aabb3::from_two_points(-Vec3::one(), Vec3::one());
    let enclosed = Triangle::new(
        Vec3::zero(),
        Vec3::right() * 0.5,
        Vec3::up() * 0.5,
    );
    assert!(aabb.intersects_triangle(&enclosed));
    let outside = Triangle::new(
        Vec3::right() * 5.0,
        Vec3::right() * 6.0,
        Vec3::right() * 5.0 + Vec3::up(),
    );
    assert!(!aabb.intersects_triangle(&outside));
}

#[test]
fn triangle_box_overlap_is_translation_invariant() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut hits = 0;
    for _ in 0..300 {
        let triangle = Triangle::new(
            integer_vec3(&mut rng, -4, 4),
            integer_vec3(&mut rng, -4, 4),
            integer_vec3(&mut rng, -4, 4),
        );
        let centre = integer_vec3(&mut rng, -2, 2);
        let half = integer_vec3(&mut rng, 1, 2);
        let offset = integer_vec3(&mut rng, -50, 50);

        let expected = geom3::triangle_intersects_box(&triangle, centre, half);
        let moved = Triangle::new(
            triangle.v1 + offset,
            triangle.v2 + offset,
            triangle.v3 + offset,
        );
        assert_eq!(
            geom3::triangle_intersects_box(&moved, centre + offset, half),
            expected
        );
        if expected {
            hits += 1;
        }
    }
    assert!(hits > 0);
}
