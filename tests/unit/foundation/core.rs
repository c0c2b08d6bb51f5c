use super::*;

#[test]
fn image_size_rejects_empty_dimensions() {
    assert!(ImageSize::new(0, 10).is_err());
    assert!(ImageSize::new(10, 0).is_err());
    assert!(ImageSize::new(3, 4).is_ok());
}

#[test]
fn linear_index_is_row_major() {
    let size = ImageSize::new(3, 4).unwrap();
    assert_eq!(size.pixel_count(), 12);
    assert_eq!(size.linear_index(0, 0), 0);
    assert_eq!(size.linear_index(1, 0), 4);
    assert_eq!(size.linear_index(2, 3), 11);
}

#[test]
fn default_matches_omniglot_canvas() {
    let size = ImageSize::default();
    assert_eq!((size.rows(), size.cols()), (105, 105));
}

#[test]
fn bounded_parameter_checks_every_component() {
    let p = BoundedParameter::scalar("eval_spot", 3.0, 2.0, 6.0);
    assert!(p.within_bounds());
    let q = BoundedParameter {
        name: "gpos",
        value: vec![10.0, 5.0],
        lower: vec![0.0, -105.0],
        upper: vec![105.0, 0.0],
    };
    assert!(!q.within_bounds());
}

#[test]
fn deserialization_rejects_empty_dimensions() {
    let size: ImageSize = serde_json::from_str(r#"{ "rows": 28, "cols": 32 }"#).unwrap();
    assert_eq!((size.rows(), size.cols()), (28, 32));
    assert!(serde_json::from_str::<ImageSize>(r#"{ "rows": 0, "cols": 3 }"#).is_err());
}
