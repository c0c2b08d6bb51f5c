use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BplError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BplError::sampling("x")
            .to_string()
            .contains("sampling error:")
    );
    assert!(BplError::render("x").to_string().contains("render error:"));
    assert!(
        BplError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BplError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
