use super::*;

#[test]
fn parses_parchment_hex_with_and_without_hash() {
    let c = Rgb8::from_hex("#F5EEDD").unwrap();
    assert_eq!(c, Rgb8::new(0xF5, 0xEE, 0xDD));
    assert_eq!(Rgb8::from_hex("f5eedd").unwrap(), c);
    assert_eq!(c.to_hex(), "#F5EEDD");
}

#[test]
fn rejects_malformed_hex() {
    for bad in ["", "#FFF", "#GGGGGG", "#F5EEDD00", "#F5EÉD"] {
        let err = Rgb8::from_hex(bad).unwrap_err();
        assert!(matches!(err, PressError::InvalidInput(_)), "{bad}");
    }
}

#[test]
fn shade_clamps_channels() {
    let base = Rgb8::new(0xF5, 0xEE, 0x08);
    assert_eq!(base.shade(14), Rgb8::new(255, 0xEE + 14, 0x08 + 14));
    assert_eq!(base.shade(-18), Rgb8::new(0xF5 - 18, 0xEE - 18, 0));
}
