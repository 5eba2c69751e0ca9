use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PressError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        PressError::resource_unavailable("x")
            .to_string()
            .contains("resource unavailable:")
    );
    assert!(
        PressError::rendering("x")
            .to_string()
            .contains("rendering failure:")
    );
    assert!(
        PressError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PressError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn resource_unavailable_is_classified() {
    assert!(PressError::resource_unavailable("gone.png").is_resource_unavailable());
    assert!(!PressError::rendering("bad").is_resource_unavailable());
}
