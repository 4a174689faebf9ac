use std::time::Duration;

use crate::{
    foundation::core::PixelSize,
    library::gateway::SaveReceipt,
    quality::{LayoutReport, OutputFormat, QualityTier},
    record::JournalRecord,
    style::table::RenderBranch,
};

/// Where an export is delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// The injected photo library gateway.
    #[default]
    PhotoLibrary,
}

/// One export request.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    /// Entry to render; its `style` picks the artifact.
    pub record: JournalRecord,
    /// Resolution tier.
    pub quality: QualityTier,
    /// Requested encoding.
    pub format: OutputFormat,
    /// Delivery target.
    pub destination: Destination,
}

impl ExportRequest {
    /// Photo-library export of `record`.
    pub fn new(record: JournalRecord, quality: QualityTier, format: OutputFormat) -> Self {
        Self {
            record,
            quality,
            format,
            destination: Destination::PhotoLibrary,
        }
    }
}

/// Stage of the export state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case", tag = "stage", content = "branch")]
pub enum ExportStage {
    /// No export in flight.
    #[default]
    Idle,
    /// Querying or requesting library access.
    CheckingPermission,
    /// Deriving the output config.
    ResolvingConfig,
    /// Building and capturing the composition.
    Rendering(RenderBranch),
    /// Encoding the bitmap.
    Encoding,
    /// Writing to the library.
    Persisting,
    /// Finished successfully.
    Succeeded,
    /// Finished with an error.
    Failed,
}

impl ExportStage {
    /// Whether the stage ends an export.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::CheckingPermission => f.write_str("checking-permission"),
            Self::ResolvingConfig => f.write_str("resolving-config"),
            Self::Rendering(branch) => write!(f, "rendering ({branch})"),
            Self::Encoding => f.write_str("encoding"),
            Self::Persisting => f.write_str("persisting"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Observable progress of the orchestrator.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExportProgress {
    /// Current stage.
    pub stage: ExportStage,
    /// Status line for the stage.
    pub message: String,
}

/// Stage timestamps, on the orchestrator's clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExportTimeline {
    /// When the request arrived.
    pub requested_at: Duration,
    /// When the bitmap was captured, if rendering finished.
    pub captured_at: Option<Duration>,
    /// When the result was produced.
    pub finished_at: Duration,
}

impl ExportTimeline {
    /// Time from request to capture.
    pub fn capture_delay(&self) -> Option<Duration> {
        self.captured_at
            .map(|at| at.saturating_sub(self.requested_at))
    }

    /// Time from request to result.
    pub fn total(&self) -> Duration {
        self.finished_at.saturating_sub(self.requested_at)
    }
}

/// Terminal outcome of one export.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DownloadResult {
    /// Whether the image was saved.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Pixel size of the saved image.
    pub output_size: Option<PixelSize>,
    /// Format the caller asked for.
    pub requested_format: OutputFormat,
    /// Format actually written (JPEG for HEIC requests).
    pub format_used: Option<OutputFormat>,
    /// Render path taken, once config was resolved.
    pub branch: Option<RenderBranch>,
    /// Size diagnostics, once config was resolved.
    pub layout: Option<LayoutReport>,
    /// Library receipt on success.
    pub receipt: Option<SaveReceipt>,
    /// Stage timestamps.
    pub timeline: ExportTimeline,
}

impl DownloadResult {
    pub(crate) fn failure(
        message: impl Into<String>,
        requested_format: OutputFormat,
        timeline: ExportTimeline,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            output_size: None,
            requested_format,
            format_used: None,
            branch: None,
            layout: None,
            receipt: None,
            timeline,
        }
    }
}
