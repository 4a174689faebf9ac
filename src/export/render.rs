//! Render stage of an export: composition, frame, settle wait and capture.

use std::time::Duration;

use crate::{
    composition::factory::CompositionFactory,
    foundation::{
        clock::Clock,
        error::{KeepsakeError, KeepsakeResult},
    },
    quality::FinalOutputConfig,
    record::JournalRecord,
    render::{
        backend::{Bitmap, FontBook},
        container::FixedFrame,
        gate::AnimationGate,
        offscreen::{CaptureOptions, OffscreenRenderer},
    },
    style::table::RenderBranch,
};

/// Output of [`render_artifact`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedArtifact {
    /// Premultiplied capture of `config.output_size()`.
    pub bitmap: Bitmap,
    /// Path the style took through the render stage.
    pub branch: RenderBranch,
    /// Clock reading right after the capture.
    pub captured_at: Duration,
}

/// Build the artifact for `record` and capture it at `config`.
///
/// Special-case styles are clamped by a [`FixedFrame`] at the design size. Animated styles
/// attach to an [`AnimationGate`] and wait out their delay on `clock`, so a [`ManualClock`]
/// accounts for the wait without blocking.
///
/// [`ManualClock`]: crate::ManualClock
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(record = %record.id, style = %record.style, scale = config.final_scale)
)]
pub fn render_artifact(
    factory: &dyn CompositionFactory,
    renderer: &OffscreenRenderer,
    fonts: &FontBook,
    clock: &dyn Clock,
    record: &JournalRecord,
    config: &FinalOutputConfig,
) -> KeepsakeResult<RenderedArtifact> {
    let style = record.style;
    let render = style.render_config();
    let branch = style.render_branch();
    let expected = config
        .output_size()
        .map_err(|e| KeepsakeError::render(format!("output size: {e}")))?;
    let proposal = config.spec.design_size();

    let mut composition = factory.make(record, style);
    if branch == RenderBranch::SpecialCase {
        composition = FixedFrame::new(proposal).wrap(composition);
    }
    if render.is_animated {
        let mut gate = AnimationGate::new(
            Duration::from_secs_f64(render.animation_delay_secs),
            fonts.clone(),
        );
        gate.attach(composition, proposal, clock)?;
        gate.wait(clock)?;
        composition = gate.into_settled()?;
    }

    let options = CaptureOptions {
        background: render.needs_background.then_some(render.background_color),
        corner_radius: render.corner_radius,
    };
    let bitmap = renderer.capture(&composition, proposal, config.final_scale, options)?;
    if bitmap.size() != expected {
        return Err(KeepsakeError::render(format!(
            "captured {}, expected {expected}",
            bitmap.size()
        )));
    }

    Ok(RenderedArtifact {
        bitmap,
        branch,
        captured_at: clock.now(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/render.rs"]
mod tests;
