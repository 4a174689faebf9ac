use crate::{
    composition::model::{Composition, NodeKind},
    foundation::{
        core::{Color, Rect, Size},
        error::{KeepsakeError, KeepsakeResult},
    },
    render::{
        backend::{Bitmap, CaptureStrategy, FontBook, StrategyKind, surface_dims},
        svg,
    },
};

/// Opacity a surface is presented at while it only exists to be captured.
pub const NEAR_INVISIBLE_OPACITY: f64 = 0.01;

/// One laid-out layer of a hosted composition, in paint order.
enum HostLayer {
    /// Consecutive shape/text nodes (and the composition paper) as one vector tree.
    Vector(usvg::Tree),
    /// A photo node.
    Photo {
        rect: Rect,
        opacity: f32,
        pixmap: resvg::tiny_skia::Pixmap,
    },
}

/// Surface a composition is attached to before it can be captured.
///
/// Attaching only records the composition; [`HostSurface::layout`] turns it into layers (parsed
/// vector trees and photo pixmaps) and [`HostSurface::rasterize`] paints those layers. The
/// presentation opacity is how visible the surface is while attached; captures always render the
/// content at full strength.
pub struct HostSurface {
    fonts: FontBook,
    attached: Option<(Composition, Size)>,
    presentation_opacity: f64,
    layers: Option<Vec<HostLayer>>,
}

impl std::fmt::Debug for HostSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostSurface")
            .field("attached", &self.attached.as_ref().map(|(_, size)| *size))
            .field("presentation_opacity", &self.presentation_opacity)
            .field("laid_out", &self.layers.is_some())
            .finish()
    }
}

impl HostSurface {
    /// Empty surface.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            attached: None,
            presentation_opacity: 1.0,
            layers: None,
        }
    }

    /// Attach `composition` at `size`, replacing anything attached before.
    pub fn attach(&mut self, composition: Composition, size: Size) -> KeepsakeResult<()> {
        if !size.is_valid() {
            return Err(KeepsakeError::validation(format!(
                "host size must be finite and > 0, got {}x{}",
                size.width, size.height
            )));
        }
        self.attached = Some((composition, size));
        self.layers = None;
        Ok(())
    }

    /// Detach and return the composition.
    pub fn detach(&mut self) -> Option<Composition> {
        self.layers = None;
        self.attached.take().map(|(c, _)| c)
    }

    /// Attached composition, if any.
    pub fn composition(&self) -> Option<&Composition> {
        self.attached.as_ref().map(|(c, _)| c)
    }

    /// Set how visible the surface is while attached.
    pub fn set_presentation_opacity(&mut self, opacity: f64) {
        self.presentation_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Current presentation opacity.
    pub fn presentation_opacity(&self) -> f64 {
        self.presentation_opacity
    }

    /// Synchronous layout pass: split the attached composition into paint-ordered layers.
    pub fn layout(&mut self) -> KeepsakeResult<()> {
        let (composition, size) = self
            .attached
            .as_ref()
            .ok_or_else(|| KeepsakeError::render("layout requested with nothing attached"))?;
        let view = size.to_rect();

        let mut layers = Vec::new();
        let mut body = String::new();
        if let Some(paper) = composition.background {
            svg::background_markup(&mut body, *size, paper);
        }
        for node in &composition.nodes {
            let NodeKind::Photo(photo) = &node.kind else {
                svg::node_markup(&mut body, node);
                continue;
            };
            if node.opacity <= 0.0 {
                continue;
            }
            if !body.is_empty() {
                let tree = svg::parse(&svg::document(view, &body), &self.fonts)?;
                layers.push(HostLayer::Vector(tree));
                body.clear();
            }
            let img = &photo.image;
            let pixmap = resvg::tiny_skia::IntSize::from_wh(img.width, img.height)
                .and_then(|sz| {
                    resvg::tiny_skia::Pixmap::from_vec(img.rgba8_premul.as_ref().clone(), sz)
                })
                .ok_or_else(|| KeepsakeError::render("photo layer has invalid dimensions"))?;
            layers.push(HostLayer::Photo {
                rect: photo.rect + node.offset,
                opacity: node.opacity as f32,
                pixmap,
            });
        }
        if !body.is_empty() {
            let tree = svg::parse(&svg::document(view, &body), &self.fonts)?;
            layers.push(HostLayer::Vector(tree));
        }

        self.layers = Some(layers);
        Ok(())
    }

    /// Rasterize the laid-out host at `scale`, pre-filling `background` when set.
    pub fn rasterize(&self, scale: f64, background: Option<Color>) -> KeepsakeResult<Bitmap> {
        let (_, size) = self
            .attached
            .as_ref()
            .ok_or_else(|| KeepsakeError::render("rasterize requested with nothing attached"))?;
        let layers = self
            .layers
            .as_ref()
            .ok_or_else(|| KeepsakeError::render("rasterize requested before layout"))?;

        let px = surface_dims(*size, scale)?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(px.width, px.height).ok_or_else(|| {
            KeepsakeError::render(format!("failed to allocate {px} host pixmap"))
        })?;
        if let Some(bg) = background {
            pixmap.fill(resvg::tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        }

        let s = scale as f32;
        let root = resvg::tiny_skia::Transform::from_scale(s, s);
        for layer in layers {
            match layer {
                HostLayer::Vector(tree) => resvg::render(tree, root, &mut pixmap.as_mut()),
                HostLayer::Photo {
                    rect,
                    opacity,
                    pixmap: photo,
                } => {
                    let sx = (rect.width() / f64::from(photo.width())) as f32;
                    let sy = (rect.height() / f64::from(photo.height())) as f32;
                    let xf = root
                        .pre_translate(rect.x0 as f32, rect.y0 as f32)
                        .pre_scale(sx, sy);
                    let paint = resvg::tiny_skia::PixmapPaint {
                        opacity: *opacity,
                        quality: resvg::tiny_skia::FilterQuality::Bilinear,
                        ..Default::default()
                    };
                    pixmap.draw_pixmap(0, 0, photo.as_ref(), &paint, xf, None);
                }
            }
        }

        Ok(Bitmap {
            width: px.width,
            height: px.height,
            data: pixmap.take(),
        })
    }
}

/// Capture by attaching the composition to a fresh [`HostSurface`].
#[derive(Clone, Debug)]
pub struct HostedStrategy {
    fonts: FontBook,
}

impl HostedStrategy {
    /// Create a hosted strategy using `fonts` for text.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }
}

impl CaptureStrategy for HostedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Hosted
    }

    fn capture(
        &self,
        composition: &Composition,
        size: Size,
        scale: f64,
        background: Option<Color>,
    ) -> KeepsakeResult<Bitmap> {
        let mut host = HostSurface::new(self.fonts.clone());
        host.attach(composition.clone(), size)?;
        host.set_presentation_opacity(NEAR_INVISIBLE_OPACITY);
        host.layout()?;
        host.rasterize(scale, background)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/hosted.rs"]
mod tests;
