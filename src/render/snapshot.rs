use std::sync::Arc;

use crate::{
    composition::model::{Composition, Node, NodeKind, PhotoNode, ShapeNode, TextNode},
    foundation::{
        core::{Affine, BezPath, Color, Size},
        error::{KeepsakeError, KeepsakeResult},
    },
    render::{
        backend::{Bitmap, CaptureStrategy, FontBook, StrategyKind, surface_dims},
        svg,
    },
};

/// Flattening tolerance for stroke outlines, in design points.
const STROKE_TOLERANCE: f64 = 0.01;

/// Renders a composition directly into a `vello_cpu` context.
///
/// Shapes and photos are native fills; each text block is rasterized through `resvg` at the
/// capture scale and painted as an image so glyphs come from the same font database as the
/// hosted path.
#[derive(Clone, Debug)]
pub struct SnapshotStrategy {
    fonts: FontBook,
}

impl SnapshotStrategy {
    /// Create a snapshot strategy using `fonts` for text.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }
}

impl CaptureStrategy for SnapshotStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Snapshot
    }

    fn capture(
        &self,
        composition: &Composition,
        size: Size,
        scale: f64,
        background: Option<Color>,
    ) -> KeepsakeResult<Bitmap> {
        let px = surface_dims(size, scale)?;
        let width: u16 = px
            .width
            .try_into()
            .map_err(|_| KeepsakeError::render(format!("snapshot width {} exceeds u16", px.width)))?;
        let height: u16 = px.height.try_into().map_err(|_| {
            KeepsakeError::render(format!("snapshot height {} exceeds u16", px.height))
        })?;

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let root = Affine::scale(scale);
        let canvas = vello_cpu::kurbo::Rect::new(0.0, 0.0, size.width, size.height);

        for fill in [background, composition.background].into_iter().flatten() {
            ctx.set_transform(affine_to_cpu(root));
            ctx.set_paint(cpu_color(fill));
            ctx.fill_rect(&canvas);
        }

        for node in &composition.nodes {
            if node.opacity <= 0.0 {
                continue;
            }
            let layered = node.opacity < 1.0;
            if layered {
                ctx.push_opacity_layer(node.opacity as f32);
            }
            let xf = root * Affine::translate(node.offset);
            match &node.kind {
                NodeKind::Shape(shape) => draw_shape(&mut ctx, shape, xf),
                NodeKind::Photo(photo) => draw_photo(&mut ctx, photo, xf)?,
                NodeKind::Text(text) => self.draw_text(&mut ctx, node, text, scale)?,
            }
            if layered {
                ctx.pop_layer();
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let data = pixmap.data_as_u8_slice().to_vec();
        if data.len() != px.width as usize * px.height as usize * 4 {
            return Err(KeepsakeError::render("snapshot produced no pixel data"));
        }
        Ok(Bitmap {
            width: px.width,
            height: px.height,
            data,
        })
    }
}

impl SnapshotStrategy {
    fn draw_text(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        node: &Node,
        text: &TextNode,
        scale: f64,
    ) -> KeepsakeResult<()> {
        if text.lines.iter().all(String::is_empty) {
            return Ok(());
        }
        // Room for glyph overhang past the nominal block (italics, descenders, end anchors).
        let pad = text.size;
        let bounds = node.bounds().inflate(pad, pad);
        let pw = (bounds.width() * scale).ceil().max(1.0) as u32;
        let ph = (bounds.height() * scale).ceil().max(1.0) as u32;

        let mut body = String::new();
        let plain = Node {
            opacity: 1.0,
            ..node.clone()
        };
        svg::node_markup(&mut body, &plain);
        let tree = svg::parse(&svg::document(bounds, &body), &self.fonts)?;
        let raster = svg::rasterize(&tree, pw, ph, scale)?;

        let image = premul_to_image(raster.data(), pw, ph)?;
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            bounds.x0 * scale,
            bounds.y0 * scale,
        )));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(image);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(pw), f64::from(ph)));
        Ok(())
    }
}

fn cpu_color(c: Color) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn draw_shape(ctx: &mut vello_cpu::RenderContext, shape: &ShapeNode, xf: Affine) {
    ctx.set_transform(affine_to_cpu(xf));
    let outline = shape.shape.to_path();
    if let Some(fill) = shape.fill {
        ctx.set_paint(cpu_color(fill));
        ctx.fill_path(&bezpath_to_cpu(&outline));
    }
    if let Some(st) = shape.stroke {
        let mut style = kurbo::Stroke::new(st.width);
        if let Some(dash) = st.dash {
            style = style.with_dashes(0.0, [dash, dash]);
        }
        let stroked = kurbo::stroke(
            outline.iter(),
            &style,
            &kurbo::StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        ctx.set_paint(cpu_color(st.color));
        ctx.fill_path(&bezpath_to_cpu(&stroked));
    }
}

fn draw_photo(
    ctx: &mut vello_cpu::RenderContext,
    photo: &PhotoNode,
    xf: Affine,
) -> KeepsakeResult<()> {
    let img = &photo.image;
    let paint = premul_to_image(&img.rgba8_premul, img.width, img.height)?;
    let (iw, ih) = (f64::from(img.width), f64::from(img.height));
    let place = Affine::translate(photo.rect.origin().to_vec2())
        * Affine::scale_non_uniform(photo.rect.width() / iw, photo.rect.height() / ih);

    ctx.set_transform(affine_to_cpu(xf * place));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(())
}

fn premul_to_image(rgba8_premul: &[u8], width: u32, height: u32) -> KeepsakeResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KeepsakeError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KeepsakeError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(KeepsakeError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let point = |p: kurbo::Point| vello_cpu::kurbo::Point::new(p.x, p.y);
    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point(p)),
            PathEl::LineTo(p) => out.line_to(point(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point(p1), point(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(point(p1), point(p2), point(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/snapshot.rs"]
mod tests;
