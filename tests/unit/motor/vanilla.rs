use super::*;

fn spline(raw: &[(f64, f64)]) -> Spline {
    Spline::new(raw.iter().map(|&(x, y)| Point::new(x, y)).collect()).unwrap()
}

fn zigzag() -> Vec<Spline> {
    vec![
        spline(&[(0.0, 0.0), (1.0, 2.0), (2.0, 0.5), (3.0, 3.0), (4.0, 1.0)]),
        spline(&[(5.0, 5.0), (4.0, 1.0), (2.0, -2.0), (1.0, 0.0), (0.0, 1.5)]),
        spline(&[(-1.0, 0.0), (0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]),
    ]
}

#[test]
fn first_point_is_first_pos() {
    let first_pos = Point::new(12.5, -40.25);
    let out = vanilla_to_motor(&zigzag(), &[1.0, 2.5, 0.3], first_pos, 50).unwrap();
    assert!((out.motor[0][0] - first_pos).hypot() < 1e-9);
}

#[test]
fn sub_strokes_connect_without_gaps() {
    let out = vanilla_to_motor(&zigzag(), &[3.0, 1.5, 7.0], Point::new(30.0, -30.0), 40).unwrap();
    assert_eq!(out.motor.len(), 3);
    for pair in out.motor.windows(2) {
        let end = *pair[0].last().unwrap();
        let start = pair[1][0];
        assert!((end - start).hypot() < 1e-9);
    }
    for traj in &out.motor {
        assert_eq!(traj.len(), 40);
    }
}

#[test]
fn motor_spline_reproduces_motor() {
    let out = vanilla_to_motor(&zigzag(), &[2.0, 0.5, 1.0], Point::new(1.0, 1.0), 30).unwrap();
    for (traj, sp) in out.motor.iter().zip(&out.motor_spline) {
        let again = sp.trajectory(30).unwrap();
        for (a, b) in traj.iter().zip(&again) {
            assert!((*a - *b).hypot() < 1e-9);
        }
    }
}

#[test]
fn invscale_scales_the_trajectory_extent() {
    let shapes = vec![spline(&[(0.0, 0.0), (10.0, 0.0)])];
    let small = vanilla_to_motor(&shapes, &[1.0], Point::ZERO, 20).unwrap();
    let large = vanilla_to_motor(&shapes, &[3.0], Point::ZERO, 20).unwrap();
    let len = |m: &StrokeMotor| (*m.motor[0].last().unwrap() - m.motor[0][0]).hypot();
    assert!((len(&large) - 3.0 * len(&small)).abs() < 1e-9);
}

#[test]
fn malformed_inputs_are_rejected() {
    let shapes = zigzag();
    assert!(vanilla_to_motor(&[], &[], Point::ZERO, 10).is_err());
    assert!(vanilla_to_motor(&shapes, &[1.0, 1.0], Point::ZERO, 10).is_err());
    assert!(vanilla_to_motor(&shapes, &[1.0, 1.0, 1.0], Point::ZERO, 0).is_err());
    assert!(vanilla_to_motor(&shapes, &[1.0, f64::NAN, 1.0], Point::ZERO, 10).is_err());
    let mixed = vec![
        spline(&[(0.0, 0.0), (1.0, 1.0)]),
        spline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]),
    ];
    assert!(vanilla_to_motor(&mixed, &[1.0, 1.0], Point::ZERO, 10).is_err());
}
