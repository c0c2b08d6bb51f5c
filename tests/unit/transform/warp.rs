use super::*;

fn motors() -> Vec<Motor> {
    vec![
        vec![vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]],
        vec![
            vec![Point::new(2.0, -4.0)],
            vec![Point::new(0.0, -4.0)],
        ],
    ]
}

#[test]
fn center_of_mass_averages_all_points() {
    assert_eq!(com_char(&motors()), Some(Point::new(1.0, -2.0)));
    assert_eq!(com_char(&[]), None);
}

#[test]
fn packed_array_roundtrip() {
    let w = AffineWarp::from_array([1.5, 0.5, 3.0, -2.0]).unwrap();
    assert_eq!(w.scale, Vec2::new(1.5, 0.5));
    assert_eq!(w.translate, Vec2::new(3.0, -2.0));
    assert_eq!(w.to_array(), [1.5, 0.5, 3.0, -2.0]);
    assert!(AffineWarp::from_array([f64::NAN, 1.0, 0.0, 0.0]).is_err());
}

#[test]
fn pure_scaling_keeps_center_of_mass_fixed() {
    let warp = AffineWarp::from_array([2.0, 3.0, 0.0, 0.0]).unwrap();
    let warped = apply_warp(&motors(), warp);
    let com = com_char(&warped).unwrap();
    assert!((com - Point::new(1.0, -2.0)).hypot() < 1e-12);
    // Distances from the center scale per axis.
    assert!((warped[0][0][1] - Point::new(3.0, 4.0)).hypot() < 1e-12);
}

#[test]
fn translation_moves_center_of_mass() {
    let warp = AffineWarp::from_array([1.0, 1.0, 5.0, -1.0]).unwrap();
    let warped = apply_warp(&motors(), warp);
    assert_eq!(com_char(&warped), Some(Point::new(6.0, -3.0)));
}

#[test]
fn identity_warp_is_a_no_op() {
    let m = motors();
    assert_eq!(apply_warp(&m, AffineWarp::identity()), m);
}

#[test]
fn affine_warp_applies_scale_then_translate() {
    let m = vec![vec![Point::new(1.0, 2.0)]];
    let warp = AffineWarp::from_array([2.0, -1.0, 0.5, 0.25]).unwrap();
    assert_eq!(affine_warp(&m, warp), vec![vec![Point::new(2.5, -1.75)]]);
}
