use super::*;
use rand::SeedableRng;

fn params(rows: u32, cols: u32) -> RenderParams {
    RenderParams {
        imsize: ImageSize::new(rows, cols).unwrap(),
        ..RenderParams::default()
    }
}

/// Horizontal model-space line at image row `row`, spanning image columns `c0..c1`.
fn model_line(row: f64, c0: f64, c1: f64, n: usize) -> Trajectory {
    (0..n)
        .map(|i| {
            let t = i as f64 / (n - 1) as f64;
            Point::new(c0 + t * (c1 - c0), -row)
        })
        .collect()
}

#[test]
fn motor_to_image_space_swaps_axes() {
    let img = space_motor_to_img(&[Point::new(3.0, -7.0), Point::new(-1.0, 2.0)]);
    assert_eq!(img, vec![Point::new(7.0, 3.0), Point::new(-2.0, -1.0)]);
}

#[test]
fn single_point_deposits_exactly_nominal_ink() {
    let p = params(20, 20);
    let traj_img = vec![vec![Point::new(5.5, 7.25)]];
    let (grid, off) = rasterize_ink(&traj_img, &p).unwrap();
    assert!(!off);
    assert!((grid.sum() - p.ink_pp).abs() < 1e-12);
}

#[test]
fn in_bounds_stroke_deposits_at_least_nominal_ink() {
    let p = params(30, 30);
    let traj_img: Vec<Trajectory> = vec![
        (0..50).map(|i| Point::new(10.5, 5.0 + 0.3 * i as f64)).collect(),
        (0..5).map(|i| Point::new(20.0 + 0.01 * i as f64, 20.0)).collect(),
    ];
    let (grid, off) = rasterize_ink(&traj_img, &p).unwrap();
    assert!(!off);
    assert!(grid.sum() >= 2.0 * p.ink_pp - 1e-4);
}

#[test]
fn fully_off_page_stroke_sets_flag_and_adds_no_ink() {
    let p = params(20, 20);
    let outside = model_line(40.0, 2.0, 10.0, 30);
    let out = render_image(&[outside], 0.0, 0.0, &p).unwrap();
    assert!(out.ink_off_page());
    assert_eq!(out.grid().sum(), 0.0);
}

#[test]
fn fully_inside_stroke_never_sets_flag() {
    let p = params(20, 20);
    let inside = model_line(10.5, 3.0, 15.0, 30);
    let out = render_image(&[inside], 0.0, 2.0, &p).unwrap();
    assert!(!out.ink_off_page());
    assert!(out.grid().sum() > 0.0);
}

#[test]
fn partially_off_page_stroke_keeps_in_bounds_ink() {
    let p = params(20, 20);
    let crossing = model_line(10.5, 10.0, 30.0, 60);
    let out = render_image(&[crossing], 0.0, 0.0, &p).unwrap();
    assert!(out.ink_off_page());
    assert!(out.grid().sum() > 0.0);
}

#[test]
fn zero_epsilon_leaves_truncated_ink_unmixed() {
    let p = RenderParams {
        ink_ncon: 1,
        ..params(24, 24)
    };
    let traj = vec![model_line(12.5, 4.0, 18.0, 40)];
    let out = render_image(&traj, 0.0, 0.0, &p).unwrap();

    let traj_img: Vec<Trajectory> = traj.iter().map(|t| space_motor_to_img(t)).collect();
    let (raw, _) = rasterize_ink(&traj_img, &p).unwrap();
    let mut expected = imfilter(&raw, &broaden_kernel(p.ink_a, p.ink_b));
    expected.map_in_place(|v| v.clamp(0.0, 1.0));
    assert_eq!(out.grid(), &expected);
}

#[test]
fn half_epsilon_makes_every_pixel_one_half() {
    let traj = vec![model_line(8.5, 2.0, 14.0, 30)];
    let out = render_image(&traj, 0.5, 1.0, &params(16, 16)).unwrap();
    assert!(out.grid().as_slice().iter().all(|&v| (v - 0.5).abs() < 1e-15));
}

#[test]
fn output_is_a_probability_map() {
    let traj = vec![model_line(8.5, 2.0, 14.0, 200), model_line(9.0, 2.0, 14.0, 200)];
    let out = render_image(&traj, 0.01, 1.5, &params(16, 16)).unwrap();
    assert!(out.grid().as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
    assert!(out.grid().max() <= 0.99 + 1e-12);
}

#[test]
fn invalid_noise_arguments_are_rejected() {
    let p = params(8, 8);
    assert!(render_image(&[], -0.1, 0.0, &p).is_err());
    assert!(render_image(&[], 1.5, 0.0, &p).is_err());
    assert!(render_image(&[], 0.1, -1.0, &p).is_err());
    assert!(render_image(&[], 0.1, f64::NAN, &p).is_err());
}

#[test]
fn empty_character_renders_uniform_noise() {
    let out = render_image(&[], 0.2, 0.0, &params(8, 8)).unwrap();
    assert!(!out.ink_off_page());
    assert!(out.grid().as_slice().iter().all(|&v| (v - 0.2).abs() < 1e-15));
}

#[test]
fn log_likelihood_prefers_matching_image() {
    let p = params(16, 16);
    let out = render_image(&[model_line(8.5, 2.0, 14.0, 60)], 0.05, 0.5, &p).unwrap();
    let ink: Vec<bool> = out.grid().as_slice().iter().map(|&v| v > 0.5).collect();
    let blank = vec![false; ink.len()];
    assert!(out.log_likelihood(&ink).unwrap() > out.log_likelihood(&blank).unwrap());
    assert!(out.log_likelihood(&blank[1..]).is_err());
}

#[test]
fn off_page_map_scores_negative_infinity() {
    let out = ProbabilityMap::new(Grid::zeros(ImageSize::new(2, 2).unwrap()), true);
    assert_eq!(out.log_likelihood(&[false; 4]).unwrap(), f64::NEG_INFINITY);
}

#[test]
fn sampled_binary_images_follow_probabilities() {
    let size = ImageSize::new(1, 3).unwrap();
    let out = ProbabilityMap::new(Grid::from_vec(size, vec![0.0, 1.0, 0.5]).unwrap(), false);
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
    let mut on_mid = 0;
    for _ in 0..2_000 {
        let img = out.sample_binary(&mut rng);
        assert!(!img[0]);
        assert!(img[1]);
        on_mid += usize::from(img[2]);
    }
    assert!((800..1200).contains(&on_mid));
}

#[test]
fn gray_image_export_draws_ink_dark() {
    let size = ImageSize::new(2, 3).unwrap();
    let out = ProbabilityMap::new(
        Grid::from_vec(size, vec![0.0, 1.0, 0.5, 0.0, 0.0, 1.0]).unwrap(),
        false,
    );
    let img = out.to_gray_image();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(0, 0).0[0], 255);
    assert_eq!(img.get_pixel(1, 0).0[0], 0);
    assert_eq!(img.get_pixel(2, 1).0[0], 0);
    let mask = binary_from_gray(&img, 128);
    assert_eq!(mask, vec![false, true, false, false, false, true]);
}

#[test]
fn non_finite_points_are_rejected_before_rendering() {
    let p = params(10, 10);
    let traj = vec![vec![
        Point::new(2.0, -2.0),
        Point::new(f64::NAN, -3.0),
        Point::new(4.0, -4.0),
    ]];
    assert!(matches!(
        render_image(&traj, 0.0, 0.0, &p),
        Err(BplError::Validation(_))
    ));

    let traj_img = vec![vec![Point::new(3.0, 3.0), Point::new(4.0, f64::INFINITY)]];
    assert!(matches!(
        rasterize_ink(&traj_img, &p),
        Err(BplError::Validation(_))
    ));
}
