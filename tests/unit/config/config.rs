use std::collections::HashMap;

use super::*;

#[test]
fn empty_object_is_full_default() {
    let cfg = StorybookConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, StorybookConfig::default());
    assert_eq!(cfg.parchment.base_color, "#F5EEDD");
    assert_eq!(cfg.parchment.cache_capacity, 4);
    assert_eq!(cfg.montage.output_width, 724);
    assert_eq!(cfg.montage.output_height, 1024);
    assert_eq!(cfg.montage.failure_policy, FailurePolicy::Abort);
    assert_eq!(cfg.page.failure_policy, FailurePolicy::Continue);
    assert_eq!(cfg.cache.montage_capacity, 64);
    assert_eq!(cfg.cache.ordering, MontageOrdering::SortedByLabel);
    assert_eq!(cfg.cache.eviction, EvictionPolicy::Keep);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = StorybookConfig::from_json_str(
        r##"{"montage": {"columns": 3, "background": "#102030"}, "page": {"body_size": 12}}"##,
    )
    .unwrap();
    assert_eq!(cfg.montage.columns, Some(3));
    assert_eq!(cfg.montage.background_rgb().unwrap(), Rgb8::new(0x10, 0x20, 0x30));
    assert_eq!(cfg.montage.thumb_width, 420);
    assert_eq!(cfg.page.body_size, 12.0);
    assert_eq!(cfg.page.leading, 18.0);
}

#[test]
fn a5_margins_in_points() {
    let page = PageConfig::default();
    assert!((page.margin() - 28.346).abs() < 1e-3);
    assert!((page.gap() - 17.008).abs() < 1e-3);
    assert!((page.width_pt - 419.53).abs() < 0.01);
    assert!((page.height_pt - 595.28).abs() < 0.01);
}

#[test]
fn texture_pixel_size_follows_dpi_with_floor() {
    let p = ParchmentConfig::default();
    assert_eq!(p.pixel_size(419.53, 595.28), (874, 1240));
    assert_eq!(p.pixel_size(10.0, 10.0), (64, 64));
    assert_eq!(p.pixel_size(f64::NAN, -3.0), (64, 64));
}

#[test]
fn invalid_values_are_rejected() {
    let err = StorybookConfig::from_json_str(r#"{"parchment": {"base_color": "parchment"}}"#)
        .unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));

    let err = StorybookConfig::from_json_str(r#"{"parchment": {"grain_strength": 1.5}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("grain_strength"));

    let err = StorybookConfig::from_json_str(r#"{"page": {"margin_mm": 90}}"#).unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));

    let err = StorybookConfig::from_json_str(r#"{"cache": {"montage_capacity": 0}}"#)
        .unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
}

#[test]
fn unknown_policy_names_fail_to_parse() {
    let err =
        StorybookConfig::from_json_str(r#"{"cache": {"eviction": "shred"}}"#).unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
}

#[test]
fn overrides_apply_from_lookup() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (ENV_OUTPUT_DIR, "/tmp/books"),
        (ENV_TEXTURE_SEED, " 42 "),
        (ENV_MONTAGE_CACHE_CAPACITY, "8"),
    ]);
    let mut cfg = StorybookConfig::default();
    cfg.apply_overrides_from(|k| vars.get(k).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/books"));
    assert_eq!(cfg.parchment.seed, Some(42));
    assert_eq!(cfg.cache.montage_capacity, 8);
}

#[test]
fn blank_overrides_are_ignored_and_bad_ones_fail() {
    let mut cfg = StorybookConfig::default();
    cfg.apply_overrides_from(|_| Some("  ".to_string())).unwrap();
    assert_eq!(cfg, StorybookConfig::default());

    let err = cfg
        .apply_overrides_from(|k| (k == ENV_TEXTURE_SEED).then(|| "abc".to_string()))
        .unwrap_err();
    assert!(err.to_string().contains(ENV_TEXTURE_SEED));

    let err = cfg
        .apply_overrides_from(|k| (k == ENV_MONTAGE_CACHE_CAPACITY).then(|| "0".to_string()))
        .unwrap_err();
    assert!(matches!(err, PressError::InvalidInput(_)));
}
