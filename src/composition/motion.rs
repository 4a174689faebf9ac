use crate::foundation::{
    core::Vec2,
    error::{KeepsakeError, KeepsakeResult},
};

/// Easing curve applied to a normalized `[0, 1]` progress value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    OutQuad,
    InOutQuad,
    OutCubic,
    InOutCubic,
    /// Overshoots slightly past 1.0 before settling (envelope flap, ticket stamp).
    OutBack,
}

impl Ease {
    /// Map `t` (clamped to `[0, 1]`) through the curve. Endpoints are exact.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutBack => {
                const C1: f64 = 1.701_58;
                const C3: f64 = C1 + 1.0;
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// Entrance animation of a node: it starts displaced and faded, then eases into place.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Motion {
    /// Offset at the start of the motion; `Vec2::ZERO` at the end.
    pub from_offset: Vec2,
    /// Opacity multiplier at the start of the motion; `1.0` at the end.
    pub from_opacity: f64,
    /// Delay before the motion starts, in seconds from attach.
    pub start_secs: f64,
    /// Motion length in seconds.
    pub duration_secs: f64,
    /// Progress curve.
    pub ease: Ease,
}

impl Motion {
    /// Slide in from `from_offset` over `duration_secs`.
    pub fn slide(from_offset: Vec2, duration_secs: f64, ease: Ease) -> Self {
        Self {
            from_offset,
            from_opacity: 1.0,
            start_secs: 0.0,
            duration_secs,
            ease,
        }
    }

    /// Fade in from `from_opacity` over `duration_secs`.
    pub fn fade(from_opacity: f64, duration_secs: f64) -> Self {
        Self {
            from_offset: Vec2::ZERO,
            from_opacity,
            start_secs: 0.0,
            duration_secs,
            ease: Ease::Linear,
        }
    }

    /// Delay the start of the motion.
    pub fn delayed(self, start_secs: f64) -> Self {
        Self { start_secs, ..self }
    }

    /// Time at which the node is fully settled.
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }

    /// Eased progress at `t` seconds after attach.
    pub fn progress(&self, t: f64) -> f64 {
        if self.duration_secs <= 0.0 {
            return if t >= self.start_secs { 1.0 } else { 0.0 };
        }
        self.ease
            .apply((t - self.start_secs) / self.duration_secs)
    }

    /// `(offset, opacity multiplier)` at `t` seconds after attach.
    pub fn sample(&self, t: f64) -> (Vec2, f64) {
        let p = self.progress(t);
        let offset = self.from_offset * (1.0 - p);
        let opacity = self.from_opacity + (1.0 - self.from_opacity) * p;
        (offset, opacity.clamp(0.0, 1.0))
    }

    /// Reject negative or non-finite timing.
    pub fn validate(&self) -> KeepsakeResult<()> {
        let finite = self.start_secs.is_finite()
            && self.duration_secs.is_finite()
            && self.from_opacity.is_finite()
            && self.from_offset.x.is_finite()
            && self.from_offset.y.is_finite();
        if !finite {
            return Err(KeepsakeError::validation("motion values must be finite"));
        }
        if self.start_secs < 0.0 || self.duration_secs < 0.0 {
            return Err(KeepsakeError::validation(
                "motion start and duration must be >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/motion.rs"]
mod tests;
