use super::*;

#[test]
fn label_is_last_underscore_segment_uppercased() {
    let r = ImageRef::new("out/tmp81xk_character_Luna.png");
    assert_eq!(r.identifier(), "tmp81xk_character_Luna");
    assert_eq!(r.label(), "LUNA");
    assert_eq!(r.file_name(), "tmp81xk_character_Luna.png");
}

#[test]
fn label_without_underscore_is_whole_stem() {
    assert_eq!(ImageRef::new("fox.png").label(), "FOX");
    assert_eq!(ImageRef::new("dir/Old Owl.jpeg").label(), "OLD OWL");
}

#[test]
fn trailing_underscore_gives_empty_label() {
    assert_eq!(ImageRef::new("scene_.png").label(), "");
}

#[test]
fn serializes_as_plain_path_string() {
    let r = ImageRef::new("a/b_c.png");
    assert_eq!(serde_json::to_string(&r).unwrap(), "\"a/b_c.png\"");
    let back: ImageRef = serde_json::from_str("\"a/b_c.png\"").unwrap();
    assert_eq!(back, r);
}

#[test]
fn missing_file_does_not_exist() {
    assert!(!ImageRef::new("definitely/not/here.png").exists());
}
