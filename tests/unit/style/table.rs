use super::*;

#[test]
fn tables_are_total_with_positive_dimensions() {
    for style in ArtifactStyle::ALL {
        let spec = style.output_spec();
        assert!(spec.design_width > 0.0, "{style}");
        assert!(spec.design_height > 0.0, "{style}");
        assert!(spec.extra_scale >= 1.0, "{style}");

        let cfg = style.render_config();
        assert!(cfg.width > 0.0 && cfg.height > 0.0, "{style}");
        assert_eq!(cfg.width, spec.design_width);
        assert_eq!(cfg.height, spec.design_height);
    }
}

#[test]
fn long_formats_get_resolution_compensation() {
    let mut long = 0;
    for style in ArtifactStyle::ALL {
        let spec = style.output_spec();
        if spec.is_long_format() {
            long += 1;
            assert!(spec.extra_scale > 1.0, "{style} is long-format");
        }
    }
    assert!(long >= 5);
}

#[test]
fn render_scale_is_derived_from_extra_scale() {
    for style in ArtifactStyle::ALL {
        let cfg = style.render_config();
        let expected = QualityTier::DEFAULT.base_scale() * style.output_spec().extra_scale;
        assert!((cfg.scale - expected).abs() < 1e-12, "{style}");
    }
}

#[test]
fn animation_delays_stay_in_observed_range() {
    for style in ArtifactStyle::ALL {
        let cfg = style.render_config();
        if cfg.is_animated {
            assert!(
                (0.5..=4.5).contains(&cfg.animation_delay_secs),
                "{style}: {}",
                cfg.animation_delay_secs
            );
        } else {
            assert_eq!(cfg.animation_delay_secs, 0.0);
        }
    }
    assert_eq!(ArtifactStyle::Envelope.render_config().animation_delay_secs, 3.0);
}

#[test]
fn special_case_styles_are_the_content_sized_ones() {
    let special: Vec<_> = ArtifactStyle::ALL
        .into_iter()
        .filter(|s| s.render_branch() == RenderBranch::SpecialCase)
        .collect();
    assert_eq!(
        special,
        vec![
            ArtifactStyle::Receipt,
            ArtifactStyle::ThermalTicket,
            ArtifactStyle::Polaroid,
            ArtifactStyle::Bookmark,
            ArtifactStyle::VinylLabel,
        ]
    );
    assert_eq!(ArtifactStyle::Envelope.render_branch(), RenderBranch::Animated);
    assert_eq!(ArtifactStyle::Postcard.render_branch(), RenderBranch::Static);
}

#[test]
fn non_rectangular_silhouettes_request_corner_rounding() {
    assert!(ArtifactStyle::Bookmark.render_config().corner_radius > 0.0);
    let vinyl = ArtifactStyle::VinylLabel.render_config();
    assert_eq!(vinyl.corner_radius * 2.0, vinyl.width);
    assert!(!vinyl.needs_background);
}

#[test]
fn aspect_ratio_and_long_format_boundaries() {
    let spec = OutputSpec {
        design_width: 100.0,
        design_height: 200.0,
        extra_scale: 1.0,
    };
    assert_eq!(spec.aspect_ratio(), 0.5);
    assert!(!spec.is_long_format());

    let spec = OutputSpec {
        design_width: 401.0,
        design_height: 200.0,
        extra_scale: 1.0,
    };
    assert!(spec.is_long_format());
}
