use super::*;
use crate::{
    composition::model::{Node, Shape, Sizing},
    foundation::core::Rect,
    render::backend::strategy_for,
};

fn full_square(size: f64) -> Composition {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(Node::fill(
        Shape::Rect {
            rect: Rect::new(0.0, 0.0, size, size),
            radius: 0.0,
        },
        Color::rgb(10, 20, 30),
    ));
    c
}

struct WrongSize;

impl CaptureStrategy for WrongSize {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Snapshot
    }

    fn capture(
        &self,
        _: &Composition,
        _: Size,
        _: f64,
        _: Option<Color>,
    ) -> KeepsakeResult<Bitmap> {
        Ok(Bitmap {
            width: 1,
            height: 1,
            data: vec![0; 4],
        })
    }
}

#[test]
fn both_strategies_agree_on_dimensions() {
    for kind in [StrategyKind::Snapshot, StrategyKind::Hosted] {
        let renderer = OffscreenRenderer::new(strategy_for(kind, FontBook::system()));
        let bitmap = renderer
            .capture(
                &full_square(10.0),
                Size::new(360.0, 240.0),
                3.0,
                CaptureOptions::default(),
            )
            .unwrap();
        assert_eq!((bitmap.width, bitmap.height), (1080, 720), "{kind}");
    }
}

#[test]
fn corner_radius_is_scaled() {
    let renderer = OffscreenRenderer::new(strategy_for(StrategyKind::Hosted, FontBook::system()));
    let bitmap = renderer
        .capture(
            &full_square(20.0),
            Size::new(20.0, 20.0),
            2.0,
            CaptureOptions {
                background: None,
                corner_radius: 4.0,
            },
        )
        .unwrap();
    assert_eq!(bitmap.pixel(1, 1).map(|p| p[3]), Some(0));
    assert_eq!(bitmap.pixel(20, 20).map(|p| p[3]), Some(255));
}

#[test]
fn strategy_dimension_mismatch_is_rejected() {
    let renderer = OffscreenRenderer::new(Arc::new(WrongSize));
    let err = renderer
        .capture(
            &full_square(1.0),
            Size::new(4.0, 4.0),
            1.0,
            CaptureOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, KeepsakeError::Render(_)));
}

#[test]
fn invalid_composition_fails_before_capture() {
    let renderer = OffscreenRenderer::new(Arc::new(WrongSize));
    let mut bad = full_square(1.0);
    bad.nodes[0].opacity = f64::NAN;
    assert!(matches!(
        renderer.capture(&bad, Size::new(4.0, 4.0), 1.0, CaptureOptions::default()),
        Err(KeepsakeError::Validation(_))
    ));
}

#[test]
fn unusable_surface_size_is_a_render_error() {
    for kind in [StrategyKind::Snapshot, StrategyKind::Hosted] {
        let renderer = OffscreenRenderer::new(strategy_for(kind, FontBook::system()));
        for scale in [0.0, f64::NAN, 1e12] {
            let err = renderer
                .capture(
                    &full_square(1.0),
                    Size::new(4.0, 4.0),
                    scale,
                    CaptureOptions::default(),
                )
                .unwrap_err();
            assert!(matches!(err, KeepsakeError::Render(_)), "{kind} x{scale}: {err}");
            assert_eq!(err.user_message(), "Could not render the artifact");
        }
    }
}

#[test]
fn detect_picks_the_preferred_strategy() {
    let renderer =
        OffscreenRenderer::detect(CaptureStrategyPreference::Hosted, FontBook::system()).unwrap();
    assert_eq!(renderer.strategy_kind(), StrategyKind::Hosted);
}
