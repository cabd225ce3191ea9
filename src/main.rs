use anyhow::{Context, Result};

use graphics_mathlib::core::prelude::*;
use graphics_mathlib::util::{geom2::point_to_nearest_polygon, log};

fn main() -> Result<()> {
    log::init().context("failed to initialise logging")?;

    check_vectors().context("vector checks")?;
    check_matrices().context("matrix checks")?;
    check_quaternions().context("quaternion checks")?;
    check_bounding_boxes().context("bounding box checks")?;
    check_geometry_2d().context("2D geometry checks")?;
    check_geometry_3d().context("3D geometry checks")?;

    info!("all checks passed");
    Ok(())
}

fn check_vectors() -> Result<()> {
    for v in [
        Vec3 {
            x: 3.0,
            y: -10.0,
            z: 2.0,
        },
        Vec3 {
            x: 1e-3,
            y: 0.0,
            z: 0.0,
        },
        Vec3::one() * 10.0,
    ] {
        let n = v.normed();
        check_lt!((n.len() - 1.0).abs(), EPSILON);
        check_almost_eq!(n * v.len(), v);
    }
    check_eq!(Vec3::zero().normed(), Vec3::zero());
    info!("vectors: ok");
    Ok(())
}

fn check_matrices() -> Result<()> {
    let mut m = Mat4x4::identity();
    m.rotate_x(90.0).rotate_z(45.0);
    let v = Vec3 {
        x: 3.0,
        y: -10.0,
        z: 2.0,
    } * m;
    check!(v.almost_eq_within(
        Vec3 {
            x: 9.19239,
            y: -2.0,
            z: -4.94975
        },
        1e-4
    ));

    let v = Vec2 { x: 3.0, y: -10.0 } * Mat3x3::rotation(90.0);
    check!(v.almost_eq_within(Vec2 { x: 10.0, y: 3.0 }, 1e-4));

    let mut m = Mat4x4::make_rotation(10.0, 20.0, 30.0);
    m.translate(1.0, 2.0, 3.0).scale(2.0, 1.0, 0.5);
    let inverse = m.inverse()?;
    check!((m * inverse).almost_eq(Mat4x4::identity()));
    check!((inverse * m).almost_eq(Mat4x4::identity()));

    let mut twice = m;
    twice.transpose().transpose();
    check_eq!(twice, m);
    let mut once = m;
    once.load_identity();
    let mut again = once;
    again.load_identity();
    check_eq!(once, again);

    check_false!(Mat4x4::zero().is_invertible());
    info!("matrices: ok");
    Ok(())
}

fn check_quaternions() -> Result<()> {
    for order in EulerOrder::all() {
        let mut m = Mat4x4::identity();
        m.rotate(
            Vec3 {
                x: 30.0,
                y: -75.0,
                z: 140.0,
            },
            order,
        );
        let q = Quat::from_rotation_matrix(&m);
        check!(q.to_matrix().almost_eq_within(m, 1e-3));
    }

    let a = Quat::from_axis_angle(Vec3::up(), 0.5);
    let b = Quat::from_axis_angle(Vec3::right(), 1.0);
    check_false!((a * b).almost_eq(b * a));
    check!(Quat::slerp(a, b, 0.0).almost_eq(a));
    check!(Quat::slerp(a, b, 1.0).almost_eq(b));
    check_eq!(Quat::new(0.0, 0.0, 0.0, 0.0).normalize(), Quat::identity());
    info!("quaternions: ok");
    Ok(())
}

fn check_bounding_boxes() -> Result<()> {
    let box3 = Aabb3::from_two_points(
        Vec3 {
            x: -10.0,
            y: -10.0,
            z: -10.0,
        },
        Vec3 {
            x: 10.0,
            y: 10.0,
            z: 10.0,
        },
    );
    check!(box3.contains_point(Vec3 {
        x: 2.0,
        y: 3.0,
        z: -6.0
    }));
    let box2 = Aabb2::from_two_points(Vec2 { x: -10.0, y: -10.0 }, Vec2 { x: 10.0, y: 10.0 });
    check!(box2.contains_point(Vec2 { x: 2.0, y: 3.0 }));
    check!(Aabb3::from_points(&[]).is_err());
    info!("bounding boxes: ok");
    Ok(())
}

fn check_geometry_2d() -> Result<()> {
    let square = [
        Vec2 { x: 0.0, y: 0.0 },
        Vec2 { x: 20.0, y: 0.0 },
        Vec2 { x: 20.0, y: 20.0 },
        Vec2 { x: 0.0, y: 20.0 },
    ];
    let nearest = point_to_nearest_polygon(Vec2 { x: 15.0, y: 19.0 }, &square)
        .context("square has edges")?;
    check_eq!(nearest.dist, 1.0);
    check_eq!(nearest.edge_index, 2);
    check_eq!(nearest.point, Vec2 { x: 15.0, y: 20.0 });
    check_eq!(
        geom2::distance_point_to_polygon(Vec2 { x: 15.0, y: 15.0 }, &square),
        5.0
    );
    check!(geom2::polygon_contains_point(&square, Vec2 { x: 1.0, y: 1.0 }));
    check_eq!(geom2::calc_polygon_area(&square), 400.0);
    info!("2D geometry: ok");
    Ok(())
}

fn check_geometry_3d() -> Result<()> {
    let aabb = Aabb3::from_two_points(-Vec3::one(), Vec3::one());
    let origin = Vec3 {
        x: -5.0,
        y: 0.5,
        z: 0.25,
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
    check_eq!(
        geom3::ray_intersects_box(&exact, &aabb),
        geom3::ray_intersects_box(&tiny, &aabb)
    );
    let along_face = Ray::new(
        Vec3 {
            x: -1.0,
            y: -5.0,
            z: 0.0,
        },
        Vec3::up(),
    );
    check!(geom3::ray_intersects_box(&along_face, &aabb).is_some());

    let enclosed = Triangle::new(
        Vec3::zero(),
        Vec3::right() * 0.5,
        Vec3::up() * 0.5,
    );
    check!(aabb.intersects_triangle(&enclosed));
    let outside = Triangle::new(
        Vec3::right() * 5.0,
        Vec3::right() * 6.0,
        Vec3::right() * 5.0 + Vec3::up(),
    );
    check_false!(aabb.intersects_triangle(&outside));

    let sphere = Sphere::new(Vec3::forward() * 10.0, 2.0);
    let hit = geom3::ray_intersects_sphere(&Ray::new(Vec3::zero(), Vec3::forward()), &sphere)
        .context("ray aimed at sphere")?;
    check_eq!(hit.t, 8.0);
    info!("3D geometry: ok");
    Ok(())
}
