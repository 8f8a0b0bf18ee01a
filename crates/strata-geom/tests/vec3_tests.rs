use strata_geom::Vec3;

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_constants() {
    assert!(vec3_approx_eq(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::FORWARD, Vec3::new(0.0, 0.0, -1.0), 1e-6));
}

#[test]
fn vec3_add_sub() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
}

#[test]
fn vec3_distance_matches_length_of_difference() {
    let a = Vec3::new(1.0, 2.0, 2.0);
    assert!(approx_eq(Vec3::ZERO.distance(a), 3.0, 1e-6));
    assert!(approx_eq(a.distance(Vec3::ZERO), 3.0, 1e-6));
}

#[test]
fn vec3_floor_rounds_toward_negative_infinity() {
    let v = Vec3::new(-0.5, 1.9, -16.0).floor();
    assert_eq!(v, Vec3::new(-1.0, 1.0, -16.0));
}

#[test]
fn vec3_normalized_zero_is_noop() {
    let n = Vec3::new(3.0, 4.0, 0.0).normalized();
    assert!(vec3_approx_eq(n, Vec3::new(0.6, 0.8, 0.0), 1e-6));
    let z = Vec3::ZERO.normalized();
    assert!(z.x.is_finite() && z.y.is_finite() && z.z.is_finite());
    assert_eq!(z, Vec3::ZERO);
}
