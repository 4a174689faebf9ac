use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::*;
use crate::{
    composition::model::{Composition, Node, Shape, Sizing},
    foundation::{
        clock::ManualClock,
        core::{Color, PixelSize, Rect},
    },
    quality::{OutputFormat, QualityResolver, QualityTier},
    render::backend::{StrategyKind, strategy_for},
    style::catalog::ArtifactStyle,
};

/// One row per ten characters, so long entries outgrow the design height.
fn rows_factory(calls: Arc<AtomicUsize>) -> impl CompositionFactory {
    move |record: &JournalRecord, style: ArtifactStyle| {
        calls.fetch_add(1, Ordering::SeqCst);
        let width = style.output_spec().design_width;
        let sizing = if style.descriptor().content_sized {
            Sizing::ContentHeight { padding: 8.0 }
        } else {
            Sizing::Flexible
        };
        let mut c = Composition::new(sizing);
        for i in 0..(record.content.chars().count() / 10).max(1) {
            let top = 8.0 + i as f64 * 12.0;
            c.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(8.0, top, width - 8.0, top + 8.0),
                    radius: 0.0,
                },
                Color::rgb(30, 30, 30),
            ));
        }
        c
    }
}

fn render(
    style: ArtifactStyle,
    content: &str,
    clock: &ManualClock,
) -> KeepsakeResult<RenderedArtifact> {
    let factory = rows_factory(Arc::new(AtomicUsize::new(0)));
    let renderer = OffscreenRenderer::new(strategy_for(StrategyKind::Hosted, FontBook::system()));
    let record = JournalRecord::new("render", style, content, "calm");
    let config = QualityResolver::final_config(style, QualityTier::Standard, OutputFormat::Png);
    render_artifact(
        &factory,
        &renderer,
        &FontBook::system(),
        clock,
        &record,
        &config,
    )
}

#[test]
fn animated_style_waits_out_its_delay_on_the_clock() {
    let clock = ManualClock::new();
    let rendered = render(ArtifactStyle::Envelope, "Dear you.", &clock).unwrap();
    assert_eq!(rendered.branch, RenderBranch::Animated);
    assert!(rendered.captured_at >= Duration::from_secs(3), "{:?}", rendered.captured_at);
    assert_eq!(
        rendered.bitmap.size(),
        PixelSize {
            width: 720,
            height: 480
        }
    );
}

#[test]
fn static_style_captures_without_waiting() {
    let clock = ManualClock::new();
    let rendered = render(ArtifactStyle::IndexCard, "Note to self.", &clock).unwrap();
    assert_eq!(rendered.branch, RenderBranch::Static);
    assert_eq!(rendered.captured_at, Duration::ZERO);
    assert!(!rendered.bitmap.is_blank());
}

#[test]
fn special_case_output_ignores_content_length() {
    let clock = ManualClock::new();
    let short = render(ArtifactStyle::Receipt, "Coffee x2", &clock).unwrap();
    let long_text: String = "Coffee, croissant. ".chars().cycle().take(10_000).collect();
    let long = render(ArtifactStyle::Receipt, &long_text, &clock).unwrap();

    assert_eq!(short.branch, RenderBranch::SpecialCase);
    assert_eq!(short.bitmap.size(), long.bitmap.size());
    assert_eq!(
        long.bitmap.size(),
        PixelSize {
            width: 700,
            height: 1600
        }
    );
}

#[test]
fn unusable_output_size_fails_the_render_before_composing() {
    let calls = Arc::new(AtomicUsize::new(0));
    let factory = rows_factory(calls.clone());
    let renderer = OffscreenRenderer::new(strategy_for(StrategyKind::Hosted, FontBook::system()));
    let style = ArtifactStyle::IndexCard;
    let mut config = QualityResolver::final_config(style, QualityTier::Hd, OutputFormat::Jpeg);
    config.final_scale = f64::NAN;

    let err = render_artifact(
        &factory,
        &renderer,
        &FontBook::system(),
        &ManualClock::new(),
        &JournalRecord::new("nan", style, "x", "calm"),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, KeepsakeError::Render(_)), "{err}");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
