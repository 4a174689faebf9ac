//! Export resolution: quality tiers, final scale resolution, and the derived output config.

use crate::{
    foundation::core::{PixelSize, pixel_dims},
    foundation::error::{KeepsakeError, KeepsakeResult},
    style::catalog::ArtifactStyle,
    style::table::OutputSpec,
};

/// Default safe on-screen bound, in pixels, for the longest output side.
pub const DEFAULT_SAFE_BOUND_PX: f64 = 2200.0;

const SCALE_EPSILON: f64 = 1e-9;

/// User-facing export resolution preset.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum QualityTier {
    /// 2x.
    Standard,
    /// 3x.
    Hd,
    /// 4x.
    Ultra,
}

impl QualityTier {
    /// All tiers from lowest to highest.
    pub const ALL: [QualityTier; 3] = [Self::Standard, Self::Hd, Self::Ultra];

    /// Tier used when a caller does not choose one.
    pub const DEFAULT: QualityTier = Self::Hd;

    /// Base scale multiplier of the tier.
    pub const fn base_scale(self) -> f64 {
        match self {
            Self::Standard => 2.0,
            Self::Hd => 3.0,
            Self::Ultra => 4.0,
        }
    }

    /// Tier whose base scale equals `scale`, if any.
    pub fn matching(scale: f64) -> Option<QualityTier> {
        Self::ALL
            .into_iter()
            .find(|tier| (tier.base_scale() - scale).abs() < SCALE_EPSILON)
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Hd => "hd",
            Self::Ultra => "ultra",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for QualityTier {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> KeepsakeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "hd" => Ok(Self::Hd),
            "ultra" => Ok(Self::Ultra),
            other => Err(KeepsakeError::validation(format!(
                "unknown quality tier '{other}'"
            ))),
        }
    }
}

/// Encoded output format requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Baseline JPEG.
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
    /// HEIC request; currently satisfied with high-quality JPEG bytes.
    Heic,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Heic => "heic",
        }
    }

    /// MIME type.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Heic => "image/heic",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Heic => "heic",
        })
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> KeepsakeResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "heic" | "heif" => Ok(Self::Heic),
            other => Err(KeepsakeError::validation(format!(
                "unknown output format '{other}'"
            ))),
        }
    }
}

/// Size diagnostics for one style at one final scale.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct LayoutReport {
    /// `design_width / design_height`.
    pub aspect_ratio: f64,
    /// `aspect_ratio < 0.5 || aspect_ratio > 2.0`.
    pub is_long_format: bool,
    /// Longest output side in pixels.
    pub max_dimension_px: f64,
    /// `max_dimension_px` exceeds the safe bound. Informational only: nothing resizes on it.
    pub needs_shrink: bool,
}

/// Everything needed to size one export.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FinalOutputConfig {
    /// Base layout of the style.
    pub spec: OutputSpec,
    /// Tier vocabulary for the export (see [`QualityResolver::tier_for_adjusted`]).
    pub quality: QualityTier,
    /// Requested encoding.
    pub format: OutputFormat,
    /// `quality.base_scale() * spec.extra_scale` of the requested tier.
    pub final_scale: f64,
}

impl FinalOutputConfig {
    /// Output bitmap size.
    pub fn output_size(&self) -> KeepsakeResult<PixelSize> {
        pixel_dims(self.spec.design_size(), self.final_scale)
    }

    /// Aspect/long-format/shrink diagnostics against `safe_bound_px`.
    pub fn layout_report(&self, safe_bound_px: f64) -> LayoutReport {
        let max_dimension_px =
            self.spec.design_width.max(self.spec.design_height) * self.final_scale;
        LayoutReport {
            aspect_ratio: self.spec.aspect_ratio(),
            is_long_format: self.spec.is_long_format(),
            max_dimension_px,
            needs_shrink: max_dimension_px > safe_bound_px,
        }
    }
}

/// Combines quality tiers with per-style resolution compensation.
#[derive(Clone, Copy, Debug, Default)]
pub struct QualityResolver;

impl QualityResolver {
    /// `tier.base_scale() * style.extra_scale`.
    pub fn final_scale(tier: QualityTier, style: ArtifactStyle) -> f64 {
        tier.base_scale() * style.output_spec().extra_scale
    }

    /// Recover a tier from a scale that already has `extra_scale` multiplied in.
    ///
    /// Falls back to `requested` when no tier matches after dividing the extra scale out.
    pub fn tier_for_adjusted(
        requested: QualityTier,
        adjusted_scale: f64,
        extra_scale: f64,
    ) -> QualityTier {
        if !extra_scale.is_finite() || extra_scale <= 0.0 {
            return requested;
        }
        QualityTier::matching(adjusted_scale / extra_scale).unwrap_or(requested)
    }

    /// Derive the output config for one export request.
    pub fn final_config(
        style: ArtifactStyle,
        tier: QualityTier,
        format: OutputFormat,
    ) -> FinalOutputConfig {
        let spec = style.output_spec();
        let final_scale = tier.base_scale() * spec.extra_scale;
        FinalOutputConfig {
            spec,
            quality: Self::tier_for_adjusted(tier, final_scale, spec.extra_scale),
            format,
            final_scale,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/quality.rs"]
mod tests;
