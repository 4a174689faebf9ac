use super::*;

#[test]
fn defaults_match_documented_values() {
    let s = ExportSettings::default();
    assert_eq!(s.capture_strategy, CaptureStrategyPreference::Auto);
    assert_eq!(s.safe_bound_px, 2200.0);
    assert_eq!(s.jpeg_quality, 92);
    assert_eq!(s.heic_substitute_quality, 98);
    assert_eq!(s.default_quality, QualityTier::Hd);
    assert_eq!(s.default_format, OutputFormat::Jpeg);
    assert!(s.fonts_dir.is_none());
    assert_eq!(s.logging.level, "info");
    s.validate().unwrap();
}

#[test]
fn from_path_fills_missing_fields_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "capture_strategy": "hosted", "default_quality": "ultra", "logging": { "json": true } }"#,
    )
    .unwrap();

    let s = ExportSettings::from_path(&path).unwrap();
    assert_eq!(s.capture_strategy, CaptureStrategyPreference::Hosted);
    assert_eq!(s.default_quality, QualityTier::Ultra);
    assert_eq!(s.jpeg_quality, 92);
    assert!(s.logging.json);
    assert_eq!(s.logging.level, "info");
}

#[test]
fn from_path_reports_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        ExportSettings::from_path(&missing),
        Err(KeepsakeError::Other(_))
    ));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(ExportSettings::from_path(&bad).is_err());

    let out_of_range = dir.path().join("range.json");
    std::fs::write(&out_of_range, r#"{ "jpeg_quality": 0 }"#).unwrap();
    assert!(matches!(
        ExportSettings::from_path(&out_of_range),
        Err(KeepsakeError::Validation(_))
    ));
}

#[test]
fn overrides_apply_by_variable_name() {
    let s = ExportSettings::default()
        .apply_overrides(|key| match key {
            ENV_CAPTURE_STRATEGY => Some("snapshot".to_string()),
            ENV_SAFE_BOUND_PX => Some(" 4096 ".to_string()),
            ENV_FONTS_DIR => Some("/opt/fonts".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(s.capture_strategy, CaptureStrategyPreference::Snapshot);
    assert_eq!(s.safe_bound_px, 4096.0);
    assert_eq!(s.fonts_dir.as_deref(), Some(Path::new("/opt/fonts")));
}

#[test]
fn empty_fonts_override_clears_the_directory() {
    let mut base = ExportSettings::default();
    base.fonts_dir = Some(PathBuf::from("/somewhere"));
    let s = base
        .apply_overrides(|key| (key == ENV_FONTS_DIR).then(String::new))
        .unwrap();
    assert!(s.fonts_dir.is_none());
}

#[test]
fn bad_overrides_are_validation_errors() {
    let strategy = ExportSettings::default()
        .apply_overrides(|key| (key == ENV_CAPTURE_STRATEGY).then(|| "gpu".to_string()));
    assert!(matches!(strategy, Err(KeepsakeError::Validation(_))));

    let bound = ExportSettings::default()
        .apply_overrides(|key| (key == ENV_SAFE_BOUND_PX).then(|| "wide".to_string()));
    assert!(matches!(bound, Err(KeepsakeError::Validation(_))));

    let negative = ExportSettings::default()
        .apply_overrides(|key| (key == ENV_SAFE_BOUND_PX).then(|| "-1".to_string()));
    assert!(matches!(negative, Err(KeepsakeError::Validation(_))));
}

#[test]
fn encoder_carries_configured_qualities() {
    let s = ExportSettings {
        jpeg_quality: 80,
        heic_substitute_quality: 90,
        ..ExportSettings::default()
    };
    let enc = s.encoder();
    assert_eq!(enc.jpeg_quality, 80);
    assert_eq!(enc.heic_substitute_quality, 90);
}
