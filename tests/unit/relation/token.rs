use super::*;
use crate::foundation::core::ImageSize;
use crate::foundation::params::{LibraryParams, RelationParams};
use crate::spline::bspline::Spline;
use rand::SeedableRng;

fn prior() -> Vec<StrokeToken> {
    let shape = Spline::new(vec![
        Point::new(0.0, 0.0),
        Point::new(4.0, 2.0),
        Point::new(8.0, 0.0),
        Point::new(12.0, 2.0),
        Point::new(16.0, 0.0),
    ])
    .unwrap();
    vec![StrokeToken::new(vec![shape], vec![1.0], Point::new(20.0, -50.0), 40).unwrap()]
}

fn mid_relation() -> Arc<Relation> {
    Arc::new(Relation::attach_along(0, 0, 4.0, &LibraryParams::default()).unwrap())
}

#[test]
fn token_state_must_match_category() {
    let end = Arc::new(Relation::attach(RelationCategory::End, 0, &RelationParams::default()).unwrap());
    assert!(RelationToken::new(Arc::clone(&end), Some(3.0)).is_err());
    assert!(RelationToken::new(end, None).is_ok());
    assert!(RelationToken::new(mid_relation(), None).is_err());
    assert!(RelationToken::new(mid_relation(), Some(f64::INFINITY)).is_err());
    assert!(RelationToken::new(mid_relation(), Some(3.0)).is_ok());
}

#[test]
fn scoring_out_of_range_eval_spot_is_negative_infinity() {
    let tok = RelationToken::new(mid_relation(), Some(10.0)).unwrap();
    assert_eq!(tok.score().unwrap(), f64::NEG_INFINITY);
}

#[test]
fn set_eval_spot_only_applies_to_mid() {
    let mut tok = RelationToken::new(mid_relation(), Some(3.0)).unwrap();
    tok.set_eval_spot(5.5).unwrap();
    assert_eq!(tok.eval_spot(), Some(5.5));
    let params = tok.optimizable_parameters();
    assert_eq!(params[0].name, "eval_spot_token");
    assert_eq!(params[0].value, vec![5.5]);

    let uni = Arc::new(
        Relation::independent(Point::new(1.0, -1.0), ImageSize::default(), &RelationParams::default())
            .unwrap(),
    );
    let mut tok = RelationToken::new(uni, None).unwrap();
    assert!(tok.set_eval_spot(3.0).is_err());
    assert!(tok.optimizable_parameters().is_empty());
}

#[test]
fn token_attach_point_uses_sampled_eval_spot() {
    let prev = prior();
    let tok = RelationToken::new(mid_relation(), Some(2.0)).unwrap();
    let at_start = tok.get_attach_point(&prev).unwrap();
    assert!((at_start - prev[0].motor()[0][0]).hypot() < 1e-9);

    let tok = RelationToken::new(mid_relation(), Some(6.0)).unwrap();
    let at_end = tok.get_attach_point(&prev).unwrap();
    assert!((at_end - *prev[0].motor()[0].last().unwrap()).hypot() < 1e-9);
}

#[test]
fn location_noise_is_centered_on_attach_point() {
    let prev = prior();
    let start = Arc::new(Relation::attach(RelationCategory::Start, 0, &RelationParams::default()).unwrap());
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
    let tok = start.sample_token(&mut rng).unwrap();
    let base = tok.get_attach_point(&prev).unwrap();

    let n = 5_000;
    let mut mean = kurbo::Vec2::ZERO;
    for _ in 0..n {
        mean += tok.sample_location(&prev, &mut rng).unwrap() - base;
    }
    mean /= n as f64;
    assert!(mean.hypot() < 0.1, "mean offset {mean:?}");

    let at_base = tok.score_location(base, &prev).unwrap();
    let away = tok.score_location(base + kurbo::Vec2::new(3.0, 0.0), &prev).unwrap();
    assert!(at_base.is_finite());
    assert!(at_base > away);
    assert!((at_base - start.loc_dist().log_prob(kurbo::Vec2::ZERO)).abs() < 1e-12);
}

#[test]
fn locations_require_prior_strokes() {
    let tok = RelationToken::new(mid_relation(), Some(3.0)).unwrap();
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
    assert!(tok.sample_location(&[], &mut rng).is_err());
    assert!(tok.score_location(Point::ZERO, &[]).is_err());
}
