use crate::{
    composition::model::{Composition, Sizing},
    foundation::core::Size,
};

/// Fixed-height frame for compositions whose natural size depends on their content.
///
/// The frame pins the measured size to the style's design rectangle; content beyond it is clipped
/// by the capture surface, so output dimensions never depend on text length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedFrame {
    size: Size,
}

impl FixedFrame {
    /// Frame of `size` design points.
    pub fn new(size: Size) -> Self {
        Self { size }
    }

    /// Frame size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Points by which the natural height of `composition` exceeds the frame (`0.0` if it fits).
    pub fn overflow(&self, composition: &Composition) -> f64 {
        let natural = composition.measure(self.size);
        (natural.height - self.size.height).max(0.0)
    }

    /// Wrap `composition` so it measures exactly the frame size.
    pub fn wrap(&self, mut composition: Composition) -> Composition {
        let overflow = self.overflow(&composition);
        if overflow > 0.0 {
            tracing::debug!(overflow, "content clipped by fixed frame");
        }
        composition.sizing = Sizing::Fixed(self.size);
        composition
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/container.rs"]
mod tests;
