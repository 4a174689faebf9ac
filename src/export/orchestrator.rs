use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::Context;

use crate::{
    composition::factory::CompositionFactory,
    encode::codec::{EncodedImage, Encoder},
    export::{
        render::render_artifact,
        result::{DownloadResult, ExportProgress, ExportRequest, ExportStage, ExportTimeline},
        settings::ExportSettings,
    },
    foundation::{
        clock::Clock,
        error::{KeepsakeError, KeepsakeResult},
    },
    library::gateway::{PermissionStatus, PhotoLibraryGateway, SaveReceipt},
    quality::{DEFAULT_SAFE_BOUND_PX, LayoutReport, QualityResolver},
    render::{backend::FontBook, offscreen::OffscreenRenderer},
    style::table::RenderBranch,
};

#[derive(Debug, Default)]
struct Flight {
    in_flight: bool,
    progress: ExportProgress,
}

/// Exclusive right to run one export. Dropping it frees the orchestrator.
struct FlightTicket {
    flight: Arc<Mutex<Flight>>,
}

impl FlightTicket {
    fn acquire(flight: &Arc<Mutex<Flight>>) -> Option<Self> {
        let mut state = flight.lock().unwrap_or_else(|e| e.into_inner());
        if state.in_flight {
            return None;
        }
        state.in_flight = true;
        state.progress = ExportProgress::default();
        Some(Self {
            flight: flight.clone(),
        })
    }

    fn set_stage(&self, stage: ExportStage, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%stage, %message, "export stage");
        let mut state = self.flight.lock().unwrap_or_else(|e| e.into_inner());
        state.progress = ExportProgress { stage, message };
    }
}

impl Drop for FlightTicket {
    fn drop(&mut self) {
        let mut state = self.flight.lock().unwrap_or_else(|e| e.into_inner());
        state.in_flight = false;
        state.progress = ExportProgress::default();
    }
}

/// Successful run of the stages, before it is folded into a [`DownloadResult`].
struct Completed {
    branch: RenderBranch,
    layout: LayoutReport,
    encoded: EncodedImage,
    receipt: SaveReceipt,
    captured_at: Duration,
}

/// Partial progress carried by a failed run.
#[derive(Default)]
struct Reached {
    branch: Option<RenderBranch>,
    layout: Option<LayoutReport>,
    captured_at: Option<Duration>,
}

/// Runs exports end to end: permission, config, render, encode, persist.
///
/// One export at a time. A request that arrives while another is in flight gets a busy failure
/// result straight away; nothing queues.
pub struct DownloadOrchestrator {
    factory: Arc<dyn CompositionFactory>,
    library: Arc<dyn PhotoLibraryGateway>,
    clock: Arc<dyn Clock>,
    renderer: OffscreenRenderer,
    fonts: FontBook,
    encoder: Encoder,
    safe_bound_px: f64,
    flight: Arc<Mutex<Flight>>,
}

impl std::fmt::Debug for DownloadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadOrchestrator")
            .field("renderer", &self.renderer)
            .field("encoder", &self.encoder)
            .field("safe_bound_px", &self.safe_bound_px)
            .field("progress", &self.progress())
            .finish()
    }
}

impl DownloadOrchestrator {
    /// Orchestrator with default encoder settings, system fonts and the default safe bound.
    pub fn new(
        factory: Arc<dyn CompositionFactory>,
        library: Arc<dyn PhotoLibraryGateway>,
        renderer: OffscreenRenderer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            factory,
            library,
            clock,
            renderer,
            fonts: FontBook::system(),
            encoder: Encoder::default(),
            safe_bound_px: DEFAULT_SAFE_BOUND_PX,
            flight: Arc::new(Mutex::new(Flight::default())),
        }
    }

    /// Build from settings: loads fonts and picks the capture strategy once.
    pub fn from_settings(
        settings: &ExportSettings,
        factory: Arc<dyn CompositionFactory>,
        library: Arc<dyn PhotoLibraryGateway>,
        clock: Arc<dyn Clock>,
    ) -> KeepsakeResult<Self> {
        settings.validate()?;
        let fonts = FontBook::with_dir(settings.fonts_dir.as_deref());
        let renderer = OffscreenRenderer::detect(settings.capture_strategy, fonts.clone())?;
        tracing::info!(
            strategy = %renderer.strategy_kind(),
            faces = fonts.face_count(),
            "orchestrator ready"
        );
        Ok(Self::new(factory, library, renderer, clock)
            .with_fonts(fonts)
            .with_encoder(settings.encoder())
            .with_safe_bound(settings.safe_bound_px))
    }

    /// Use `fonts` for the animation host.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    /// Use `encoder` for the encoding stage.
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Report `needs_shrink` above `safe_bound_px`.
    pub fn with_safe_bound(mut self, safe_bound_px: f64) -> Self {
        self.safe_bound_px = safe_bound_px;
        self
    }

    /// Renderer in use.
    pub fn renderer(&self) -> &OffscreenRenderer {
        &self.renderer
    }

    /// Current stage of the in-flight export (`Idle` when none).
    pub fn progress(&self) -> ExportProgress {
        self.flight
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .progress
            .clone()
    }

    /// Whether an export currently holds the orchestrator.
    pub fn is_busy(&self) -> bool {
        self.flight.lock().unwrap_or_else(|e| e.into_inner()).in_flight
    }

    /// Run one export on the calling thread and return its terminal result.
    pub fn export(&self, request: ExportRequest) -> DownloadResult {
        let requested_at = self.clock.now();
        match FlightTicket::acquire(&self.flight) {
            Some(ticket) => self.run(&ticket, &request, requested_at),
            None => self.busy(&request, requested_at),
        }
    }

    /// Run one export on a worker thread and hand the result to `completion`.
    ///
    /// The single-flight check happens here, on the calling thread; a busy rejection is still
    /// delivered through `completion`. Errors only when the thread cannot be spawned, in which
    /// case `completion` is never called.
    pub fn spawn_export<F>(
        self: &Arc<Self>,
        request: ExportRequest,
        completion: F,
    ) -> KeepsakeResult<std::thread::JoinHandle<()>>
    where
        F: FnOnce(DownloadResult) + Send + 'static,
    {
        let requested_at = self.clock.now();
        let ticket = FlightTicket::acquire(&self.flight);
        let this = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("keepsake-export".to_string())
            .spawn(move || {
                let result = match ticket {
                    Some(ticket) => this.run(&ticket, &request, requested_at),
                    None => this.busy(&request, requested_at),
                };
                completion(result);
            })
            .context("spawn export thread")?;
        Ok(handle)
    }

    fn busy(&self, request: &ExportRequest, requested_at: Duration) -> DownloadResult {
        let err = KeepsakeError::busy(format!("export of '{}' rejected", request.record.id));
        tracing::warn!(error = %err, "export rejected");
        DownloadResult::failure(
            err.user_message(),
            request.format,
            ExportTimeline {
                requested_at,
                captured_at: None,
                finished_at: self.clock.now(),
            },
        )
    }

    #[tracing::instrument(
        name = "export",
        skip_all,
        fields(
            record = %request.record.id,
            style = %request.record.style,
            quality = %request.quality,
            format = %request.format,
        )
    )]
    fn run(
        &self,
        ticket: &FlightTicket,
        request: &ExportRequest,
        requested_at: Duration,
    ) -> DownloadResult {
        let mut reached = Reached::default();
        let outcome = self.stages(ticket, request, &mut reached);
        let finished_at = self.clock.now();

        match outcome {
            Ok(done) => {
                let size = done.encoded.size();
                let message = if done.encoded.is_substitute() {
                    format!(
                        "Saved {size} {} ({} requested)",
                        done.encoded.format, done.encoded.requested
                    )
                } else {
                    format!("Saved {size} {}", done.encoded.format)
                };
                ticket.set_stage(ExportStage::Succeeded, message.clone());
                tracing::info!(size = %size, receipt = %done.receipt.id, "export succeeded");
                DownloadResult {
                    success: true,
                    message,
                    output_size: Some(size),
                    requested_format: request.format,
                    format_used: Some(done.encoded.format),
                    branch: Some(done.branch),
                    layout: Some(done.layout),
                    receipt: Some(done.receipt),
                    timeline: ExportTimeline {
                        requested_at,
                        captured_at: Some(done.captured_at),
                        finished_at,
                    },
                }
            }
            Err(err) => {
                let message = err.user_message();
                ticket.set_stage(ExportStage::Failed, message.clone());
                tracing::warn!(error = %err, "export failed");
                DownloadResult {
                    branch: reached.branch,
                    layout: reached.layout,
                    ..DownloadResult::failure(
                        message,
                        request.format,
                        ExportTimeline {
                            requested_at,
                            captured_at: reached.captured_at,
                            finished_at,
                        },
                    )
                }
            }
        }
    }

    fn stages(
        &self,
        ticket: &FlightTicket,
        request: &ExportRequest,
        reached: &mut Reached,
    ) -> KeepsakeResult<Completed> {
        let style = request.record.style;

        ticket.set_stage(ExportStage::CheckingPermission, "checking photo library access");
        self.ensure_permission()?;

        ticket.set_stage(ExportStage::ResolvingConfig, "resolving output size");
        let config = QualityResolver::final_config(style, request.quality, request.format);
        let layout = config.layout_report(self.safe_bound_px);
        let render = style.render_config();
        let branch = style.render_branch();
        reached.branch = Some(branch);
        reached.layout = Some(layout);
        tracing::debug!(
            final_scale = config.final_scale,
            aspect_ratio = layout.aspect_ratio,
            long_format = layout.is_long_format,
            max_dimension_px = layout.max_dimension_px,
            "output config"
        );
        if layout.needs_shrink {
            tracing::warn!(
                max_dimension_px = layout.max_dimension_px,
                safe_bound_px = self.safe_bound_px,
                "output exceeds safe bound"
            );
        }

        ticket.set_stage(ExportStage::Rendering(branch), format!("rendering {style}"));
        let rendered = render_artifact(
            self.factory.as_ref(),
            &self.renderer,
            &self.fonts,
            self.clock.as_ref(),
            &request.record,
            &config,
        )?;
        reached.captured_at = Some(rendered.captured_at);

        ticket.set_stage(ExportStage::Encoding, format!("encoding {}", request.format));
        let encoded = self
            .encoder
            .encode(&rendered.bitmap, request.format, render.background_color)?;

        ticket.set_stage(ExportStage::Persisting, "saving to photo library");
        let receipt = self.library.save(&encoded)?;

        Ok(Completed {
            branch,
            layout,
            encoded,
            receipt,
            captured_at: rendered.captured_at,
        })
    }

    fn ensure_permission(&self) -> KeepsakeResult<()> {
        let mut status = self.library.permission_status();
        if status == PermissionStatus::NotDetermined {
            status = self.library.request_permission();
            tracing::debug!(%status, "permission requested");
        }
        if status.allows_save() {
            Ok(())
        } else {
            Err(KeepsakeError::permission_denied(format!(
                "photo library access is {status}"
            )))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/orchestrator.rs"]
mod tests;
