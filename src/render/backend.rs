use std::{
    path::{Path, PathBuf},
    sync::{Arc, OnceLock},
};

use crate::{
    composition::model::Composition,
    foundation::{
        core::{Color, PixelSize, Size, pixel_dims},
        error::{KeepsakeError, KeepsakeResult},
    },
};

/// A captured artifact as RGBA8 pixels.
///
/// Captures are **premultiplied alpha**; encoders flatten or unpremultiply as their format needs.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, premultiplied.
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Pixel dimensions.
    pub fn size(&self) -> PixelSize {
        PixelSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied RGBA of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// `true` when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Capture strategy implementations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Draw the composition straight into a `vello_cpu` context.
    Snapshot,
    /// Attach to a [`HostSurface`](crate::HostSurface), lay out, then rasterize the host.
    Hosted,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Snapshot => "snapshot",
            Self::Hosted => "hosted",
        })
    }
}

/// [`pixel_dims`] of a capture surface. A size that cannot back a surface fails the render.
pub(crate) fn surface_dims(size: Size, scale: f64) -> KeepsakeResult<PixelSize> {
    pixel_dims(size, scale).map_err(|e| KeepsakeError::render(format!("capture surface: {e}")))
}

/// Rasterizes a measured composition.
///
/// Implementations must size their output with
/// [`pixel_dims`](crate::foundation::core::pixel_dims)`(size, scale)` so every strategy agrees on
/// dimensions.
pub trait CaptureStrategy: Send + Sync {
    /// Which implementation this is.
    fn kind(&self) -> StrategyKind;

    /// Rasterize `composition` at `size` (already measured) and `scale`, painting `background`
    /// under it when set.
    fn capture(
        &self,
        composition: &Composition,
        size: Size,
        scale: f64,
        background: Option<Color>,
    ) -> KeepsakeResult<Bitmap>;
}

/// Which strategy the caller wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStrategyPreference {
    /// Snapshot when available, hosted otherwise.
    #[default]
    Auto,
    /// Snapshot, falling back to hosted when the probe fails.
    Snapshot,
    /// Always hosted.
    Hosted,
}

impl std::str::FromStr for CaptureStrategyPreference {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "snapshot" => Ok(Self::Snapshot),
            "hosted" => Ok(Self::Hosted),
            other => Err(KeepsakeError::validation(format!(
                "unknown capture strategy '{other}' (expected auto, snapshot or hosted)"
            ))),
        }
    }
}

/// Result of probing the raster backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// A 1x1 `vello_cpu` render produced coverage.
    pub snapshot: bool,
    /// A `tiny_skia` pixmap could be allocated and filled.
    pub hosted: bool,
}

impl Capabilities {
    /// Probe both backends with a one-pixel render.
    pub fn detect() -> Self {
        Self {
            snapshot: probe_snapshot(),
            hosted: probe_hosted(),
        }
    }

    /// Resolve `preference` against what is available.
    pub fn select(self, preference: CaptureStrategyPreference) -> KeepsakeResult<StrategyKind> {
        let kind = match preference {
            CaptureStrategyPreference::Auto | CaptureStrategyPreference::Snapshot
                if self.snapshot =>
            {
                StrategyKind::Snapshot
            }
            CaptureStrategyPreference::Snapshot if self.hosted => {
                tracing::warn!("snapshot capture unavailable, falling back to hosted");
                StrategyKind::Hosted
            }
            CaptureStrategyPreference::Auto | CaptureStrategyPreference::Hosted
                if self.hosted =>
            {
                StrategyKind::Hosted
            }
            _ => {
                return Err(KeepsakeError::render(format!(
                    "no capture strategy available for preference {preference:?}"
                )));
            }
        };
        Ok(kind)
    }
}

fn probe_snapshot() -> bool {
    let mut ctx = vello_cpu::RenderContext::new(1, 1);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, 1.0, 1.0));
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(1, 1);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().get(3).is_some_and(|&a| a > 0)
}

fn probe_hosted() -> bool {
    let Some(mut pixmap) = resvg::tiny_skia::Pixmap::new(1, 1) else {
        return false;
    };
    pixmap.fill(resvg::tiny_skia::Color::BLACK);
    pixmap.data().get(3).is_some_and(|&a| a > 0)
}

/// Build the capture strategy for `preference`, once.
pub fn select_strategy(
    preference: CaptureStrategyPreference,
    fonts: FontBook,
) -> KeepsakeResult<Arc<dyn CaptureStrategy>> {
    let caps = Capabilities::detect();
    let kind = caps.select(preference)?;
    tracing::debug!(?caps, ?preference, %kind, "capture strategy selected");
    Ok(strategy_for(kind, fonts))
}

/// Construct a specific strategy without probing.
pub fn strategy_for(kind: StrategyKind, fonts: FontBook) -> Arc<dyn CaptureStrategy> {
    match kind {
        StrategyKind::Snapshot => Arc::new(crate::render::snapshot::SnapshotStrategy::new(fonts)),
        StrategyKind::Hosted => Arc::new(crate::render::hosted::HostedStrategy::new(fonts)),
    }
}

/// Font database shared by every SVG text rasterization.
#[derive(Clone)]
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::system()
    }
}

impl FontBook {
    /// System fonts; loaded once per process.
    pub fn system() -> Self {
        static SYSTEM: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
        let db = SYSTEM.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "system fonts loaded");
            Arc::new(db)
        });
        Self { db: db.clone() }
    }

    /// System fonts plus every `ttf`/`otf`/`ttc` file in `dir`.
    pub fn with_dir(dir: Option<&Path>) -> Self {
        let system = Self::system();
        let Some(dir) = dir else {
            return system;
        };
        let mut db = (*system.db).clone();
        let before = db.len();
        for path in font_files(dir) {
            if let Err(err) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable font");
            }
        }
        tracing::debug!(dir = %dir.display(), faces = db.len() - before, "extra fonts loaded");
        Self { db: Arc::new(db) }
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Parse options for SVG documents rendered with these fonts.
    pub fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: font_resolver(),
            ..Default::default()
        }
    }
}

/// Extensions picked up from a fonts directory, compared case-insensitively.
const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Font files directly inside `dir`, sorted so faces load in a stable order.
fn font_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "fonts directory is not readable");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_font_file(path))
        .collect();
    files.sort();
    files
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn db_family(family: &usvg::FontFamily) -> usvg::fontdb::Family<'_> {
    use usvg::fontdb::Family;

    match family {
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Named(name) => Family::Name(name),
    }
}

fn db_style(style: usvg::FontStyle) -> usvg::fontdb::Style {
    match style {
        usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
        usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
        usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
    }
}

/// Requested families first, then sans and serif, then any loaded face.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families: Vec<Family<'_>> = font.families().iter().map(db_family).collect();
            for generic in [Family::SansSerif, Family::Serif] {
                if !families.contains(&generic) {
                    families.push(generic);
                }
            }
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style: db_style(font.style()),
            };
            db.query(&query).or_else(|| db.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
