//! keepsake turns journal entries into decorative artifact images and saves them to a photo store.
//!
//! Each entry carries an [`ArtifactStyle`] (envelope, boarding pass, polaroid, vinyl label, ...).
//! An export walks a fixed pipeline:
//!
//! 1. **Permission**: the [`PhotoLibraryGateway`] must allow writes (asking once if undetermined).
//! 2. **Config**: the style's [`OutputSpec`] and the requested [`QualityTier`] give the final
//!    scale and the output size ([`QualityResolver`]).
//! 3. **Render**: a [`CompositionFactory`] builds the artifact's [`Composition`]; content-sized
//!    styles are clamped by a [`FixedFrame`], animated styles wait in an [`AnimationGate`], and the
//!    [`OffscreenRenderer`] rasterizes the result.
//! 4. **Encode**: JPEG or PNG through [`Encoder`]; HEIC requests are written as high-quality JPEG.
//! 5. **Persist**: the gateway's `save` result is the final signal, reported as a
//!    [`DownloadResult`].
//!
//! [`DownloadOrchestrator`] drives the stages for one export at a time.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** between capture and encode.
//! - **Same size from every strategy**: both capture paths size their surface with
//!   [`pixel_dims`].
#![forbid(unsafe_code)]

mod composition;
mod encode;
mod export;
mod foundation;
mod library;
mod logging;
mod quality;
mod record;
mod render;
mod style;

pub use composition::artifact::ArtifactFactory;
pub use composition::factory::CompositionFactory;
pub use composition::model::{
    Composition, Node, NodeKind, PhotoNode, PreparedImage, Shape, ShapeNode, Sizing, StrokeStyle,
    TextAlign, TextNode,
};
pub use composition::motion::{Ease, Motion};
pub use composition::text::{FontFace, estimate_width, truncate_lines, wrap_text};
pub use encode::codec::{
    DEFAULT_HEIC_SUBSTITUTE_QUALITY, DEFAULT_JPEG_QUALITY, EncodedImage, Encoder,
};
pub use export::orchestrator::DownloadOrchestrator;
pub use export::render::{RenderedArtifact, render_artifact};
pub use export::result::{
    Destination, DownloadResult, ExportProgress, ExportRequest, ExportStage, ExportTimeline,
};
pub use export::settings::{ENV_CAPTURE_STRATEGY, ENV_FONTS_DIR, ENV_SAFE_BOUND_PX, ExportSettings};
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::core::{
    Affine, BezPath, Color, PixelSize, Point, Rect, Size, Vec2, pixel_dims,
};
pub use foundation::error::{KeepsakeError, KeepsakeResult};
pub use library::directory::DirectoryLibrary;
pub use library::gateway::{PermissionStatus, PhotoLibraryGateway, SaveReceipt};
pub use library::memory::InMemoryLibrary;
pub use logging::{LoggingConfig, init_logging};
pub use quality::{
    DEFAULT_SAFE_BOUND_PX, FinalOutputConfig, LayoutReport, OutputFormat, QualityResolver,
    QualityTier,
};
pub use record::{JournalRecord, Photo, Weather};
pub use render::backend::{
    Bitmap, Capabilities, CaptureStrategy, CaptureStrategyPreference, FontBook, StrategyKind,
    select_strategy, strategy_for,
};
pub use render::container::FixedFrame;
pub use render::gate::{AnimationGate, GateState};
pub use render::hosted::{HostSurface, HostedStrategy, NEAR_INVISIBLE_OPACITY};
pub use render::mask::round_corners;
pub use render::offscreen::{CaptureOptions, OffscreenRenderer};
pub use render::snapshot::SnapshotStrategy;
pub use style::catalog::{ArtifactStyle, Collection};
pub use style::table::{OutputSpec, RenderBranch, RenderConfig, StyleDescriptor};
