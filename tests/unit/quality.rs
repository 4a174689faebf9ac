use super::*;

#[test]
fn final_scale_is_monotonic_per_style() {
    for style in ArtifactStyle::ALL {
        let s = QualityResolver::final_scale(QualityTier::Standard, style);
        let h = QualityResolver::final_scale(QualityTier::Hd, style);
        let u = QualityResolver::final_scale(QualityTier::Ultra, style);
        assert!(s < h && h < u, "{style}: {s} {h} {u}");
    }
}

#[test]
fn final_scale_never_drops_below_tier_base() {
    for style in ArtifactStyle::ALL {
        for tier in QualityTier::ALL {
            assert!(QualityResolver::final_scale(tier, style) >= tier.base_scale());
        }
    }
}

#[test]
fn tier_for_adjusted_recovers_tier_or_falls_back() {
    assert_eq!(
        QualityResolver::tier_for_adjusted(QualityTier::Standard, 4.5, 1.5),
        QualityTier::Hd
    );
    assert_eq!(
        QualityResolver::tier_for_adjusted(QualityTier::Ultra, 3.7, 1.0),
        QualityTier::Ultra
    );
    assert_eq!(
        QualityResolver::tier_for_adjusted(QualityTier::Hd, 3.0, 0.0),
        QualityTier::Hd
    );
}

#[test]
fn final_config_output_size_matches_design_times_scale() {
    let cfg = QualityResolver::final_config(
        ArtifactStyle::Envelope,
        QualityTier::Hd,
        OutputFormat::Jpeg,
    );
    assert_eq!(cfg.quality, QualityTier::Hd);
    let px = cfg.output_size().unwrap();
    assert_eq!((px.width, px.height), (1080, 720));

    let cfg = QualityResolver::final_config(
        ArtifactStyle::FilmStrip,
        QualityTier::Standard,
        OutputFormat::Png,
    );
    assert!((cfg.final_scale - 3.0).abs() < 1e-12);
    let px = cfg.output_size().unwrap();
    assert_eq!((px.width, px.height), (480, 1680));
}

#[test]
fn layout_report_flags_oversized_outputs() {
    let cfg = QualityResolver::final_config(
        ArtifactStyle::Receipt,
        QualityTier::Ultra,
        OutputFormat::Jpeg,
    );
    let report = cfg.layout_report(DEFAULT_SAFE_BOUND_PX);
    assert!(report.is_long_format);
    assert!((report.max_dimension_px - 3200.0).abs() < 1e-9);
    assert!(report.needs_shrink);

    let cfg = QualityResolver::final_config(
        ArtifactStyle::Postcard,
        QualityTier::Standard,
        OutputFormat::Jpeg,
    );
    assert!(!cfg.layout_report(DEFAULT_SAFE_BOUND_PX).needs_shrink);
}

#[test]
fn tier_and_format_parse_from_cli_strings() {
    assert_eq!("HD".parse::<QualityTier>().unwrap(), QualityTier::Hd);
    assert!("8k".parse::<QualityTier>().is_err());
    assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
    assert_eq!("heic".parse::<OutputFormat>().unwrap(), OutputFormat::Heic);
    assert!("gif".parse::<OutputFormat>().is_err());
}
