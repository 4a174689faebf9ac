//! Export settings: defaults, JSON file, environment overrides.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    encode::codec::{DEFAULT_HEIC_SUBSTITUTE_QUALITY, DEFAULT_JPEG_QUALITY, Encoder},
    foundation::error::{KeepsakeError, KeepsakeResult},
    logging::LoggingConfig,
    quality::{DEFAULT_SAFE_BOUND_PX, OutputFormat, QualityTier},
    render::backend::CaptureStrategyPreference,
};

/// Environment variable overriding [`ExportSettings::capture_strategy`].
pub const ENV_CAPTURE_STRATEGY: &str = "KEEPSAKE_CAPTURE_STRATEGY";
/// Environment variable overriding [`ExportSettings::safe_bound_px`].
pub const ENV_SAFE_BOUND_PX: &str = "KEEPSAKE_SAFE_BOUND_PX";
/// Environment variable overriding [`ExportSettings::fonts_dir`].
pub const ENV_FONTS_DIR: &str = "KEEPSAKE_FONTS_DIR";

/// Settings shared by every export of one orchestrator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Capture strategy preference, resolved once at startup.
    pub capture_strategy: CaptureStrategyPreference,

    /// Longest output side above which `needs_shrink` is reported.
    pub safe_bound_px: f64,

    /// JPEG quality (1..=100).
    pub jpeg_quality: u8,

    /// JPEG quality used when HEIC is requested (1..=100).
    pub heic_substitute_quality: u8,

    /// Tier used when a request does not name one.
    pub default_quality: QualityTier,

    /// Format used when a request does not name one.
    pub default_format: OutputFormat,

    /// Extra font directory loaded next to the system fonts.
    pub fonts_dir: Option<PathBuf>,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            capture_strategy: CaptureStrategyPreference::Auto,
            safe_bound_px: DEFAULT_SAFE_BOUND_PX,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            heic_substitute_quality: DEFAULT_HEIC_SUBSTITUTE_QUALITY,
            default_quality: QualityTier::DEFAULT,
            default_format: OutputFormat::Jpeg,
            fonts_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ExportSettings {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> KeepsakeResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse settings '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `KEEPSAKE_*` overrides from the process environment.
    pub fn apply_env(self) -> KeepsakeResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `KEEPSAKE_*` variable names.
    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> KeepsakeResult<Self> {
        if let Some(v) = lookup(ENV_CAPTURE_STRATEGY) {
            self.capture_strategy = v.parse()?;
        }
        if let Some(v) = lookup(ENV_SAFE_BOUND_PX) {
            self.safe_bound_px = v.trim().parse().map_err(|_| {
                KeepsakeError::validation(format!("{ENV_SAFE_BOUND_PX} is not a number: '{v}'"))
            })?;
        }
        if let Some(v) = lookup(ENV_FONTS_DIR) {
            self.fonts_dir = (!v.trim().is_empty()).then(|| PathBuf::from(v));
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges.
    pub fn validate(&self) -> KeepsakeResult<()> {
        if !self.safe_bound_px.is_finite() || self.safe_bound_px <= 0.0 {
            return Err(KeepsakeError::validation(format!(
                "safe_bound_px must be finite and > 0, got {}",
                self.safe_bound_px
            )));
        }
        for (name, q) in [
            ("jpeg_quality", self.jpeg_quality),
            ("heic_substitute_quality", self.heic_substitute_quality),
        ] {
            if !(1..=100).contains(&q) {
                return Err(KeepsakeError::validation(format!(
                    "{name} must be in 1..=100, got {q}"
                )));
            }
        }
        Ok(())
    }

    /// Encoder configured with these qualities.
    pub fn encoder(&self) -> Encoder {
        Encoder {
            jpeg_quality: self.jpeg_quality,
            heic_substitute_quality: self.heic_substitute_quality,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/settings.rs"]
mod tests;
