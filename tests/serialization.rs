use graphics_mathlib::core::prelude::*;

fn decode_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

// ==================== Layout Tests ====================

#[test]
fn mat4x4_serialises_row_major() {
    let mut m = Mat4x4::make_rotation(15.0, -40.0, 100.0);
    m.translate(7.0, -8.0, 9.0);
    let bytes = bincode::serialize(&m).unwrap();
    assert_eq!(bytes.len(), 64);
    assert_eq!(decode_f32s(&bytes), m.to_array());
    // Translation lives in the fourth row.
    assert_eq!(decode_f32s(&bytes)[12..15], [m.a4, m.b4, m.c4]);
}

#[test]
fn mat3x3_serialises_row_major() {
    let m = Mat3x3::rotation_about(30.0, 2.0, -1.0);
    let bytes = bincode::serialize(&m).unwrap();
    assert_eq!(bytes.len(), 36);
    assert_eq!(decode_f32s(&bytes), m.to_array());
}

#[test]
fn vectors_and_quaternions_serialise_as_components() {
    let v = Vec3 {
        x: 1.5,
        y: -2.0,
        z: 0.25,
    };
    assert_eq!(decode_f32s(&bincode::serialize(&v).unwrap()), v.to_array());

    let q = Quat::from_axis_angle(Vec3::up(), 1.0);
    assert_eq!(decode_f32s(&bincode::serialize(&q).unwrap()), q.to_array());
}

// ==================== Round Trip Tests ====================

#[test]
fn bincode_round_trip() {
    let aabb = Aabb3::from_two_points(
        Vec3 {
            x: -1.0,
            y: 2.0,
            z: -3.0,
        },
        Vec3 {
            x: 4.0,
            y: -5.0,
            z: 6.0,
        },
    );
    let bytes = bincode::serialize(&aabb).unwrap();
    assert_eq!(bincode::deserialize::<Aabb3>(&bytes).unwrap(), aabb);

    let colour = Colour::from_bytes(10, 20, 30, 255);
    let bytes = bincode::serialize(&colour).unwrap();
    assert_eq!(bincode::deserialize::<Colour>(&bytes).unwrap(), colour);

    let triangle = Triangle::new(Vec3::zero(), Vec3::right(), Vec3::up());
    let bytes = bincode::serialize(&triangle).unwrap();
    assert_eq!(bincode::deserialize::<Triangle>(&bytes).unwrap(), triangle);
}

#[test]
fn truncated_input_is_rejected() {
    let bytes = bincode::serialize(&Mat4x4::identity()).unwrap();
    assert!(bincode::deserialize::<Mat4x4>(&bytes[..60]).is_err());
}
