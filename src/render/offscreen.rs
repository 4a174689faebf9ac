use std::sync::Arc;

use crate::{
    composition::model::Composition,
    foundation::{
        core::{Color, Size},
        error::{KeepsakeError, KeepsakeResult},
    },
    render::{
        backend::{
            Bitmap, CaptureStrategy, CaptureStrategyPreference, FontBook, StrategyKind,
            select_strategy, surface_dims,
        },
        mask,
    },
};

/// Per-capture options.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CaptureOptions {
    /// Fill painted under the composition.
    pub background: Option<Color>,
    /// Rounded-corner radius in design points (`0.0` = square corners).
    pub corner_radius: f64,
}

/// Turns a composition into a bitmap through the capture strategy chosen at construction.
#[derive(Clone)]
pub struct OffscreenRenderer {
    strategy: Arc<dyn CaptureStrategy>,
}

impl std::fmt::Debug for OffscreenRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OffscreenRenderer")
            .field("strategy", &self.strategy.kind())
            .finish()
    }
}

impl OffscreenRenderer {
    /// Renderer over an explicit strategy.
    pub fn new(strategy: Arc<dyn CaptureStrategy>) -> Self {
        Self { strategy }
    }

    /// Probe capabilities once and pick the strategy for `preference`.
    pub fn detect(preference: CaptureStrategyPreference, fonts: FontBook) -> KeepsakeResult<Self> {
        Ok(Self::new(select_strategy(preference, fonts)?))
    }

    /// Strategy in use.
    pub fn strategy_kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Measure `composition` against `proposal` and rasterize it at `scale`.
    ///
    /// The bitmap is `pixel_dims(measured, scale)` regardless of strategy.
    #[tracing::instrument(
        level = "debug",
        skip(self, composition, options),
        fields(strategy = %self.strategy.kind())
    )]
    pub fn capture(
        &self,
        composition: &Composition,
        proposal: Size,
        scale: f64,
        options: CaptureOptions,
    ) -> KeepsakeResult<Bitmap> {
        composition.validate()?;
        let measured = composition.measure(proposal);
        let expected = surface_dims(measured, scale)?;

        let mut bitmap = self
            .strategy
            .capture(composition, measured, scale, options.background)?;
        if bitmap.size() != expected {
            return Err(KeepsakeError::render(format!(
                "{} capture returned {}, expected {expected}",
                self.strategy.kind(),
                bitmap.size()
            )));
        }
        if bitmap.data.is_empty() {
            return Err(KeepsakeError::render("capture produced no pixel data"));
        }

        if options.corner_radius > 0.0 {
            mask::round_corners(&mut bitmap, options.corner_radius * scale);
        }
        tracing::debug!(size = %expected, "captured");
        Ok(bitmap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/offscreen.rs"]
mod tests;
