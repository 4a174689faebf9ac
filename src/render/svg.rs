//! SVG markup for composition nodes.
//!
//! Shapes and text are expressed as SVG so `usvg`/`resvg` handle font selection, shaping and
//! dashing. Photos never go through markup; both strategies paint them as bitmaps.

use std::fmt::Write as _;

use crate::{
    composition::model::{Node, NodeKind, Shape, ShapeNode, StrokeStyle, TextAlign, TextNode},
    foundation::{
        core::{Color, Rect, Size},
        error::{KeepsakeError, KeepsakeResult},
    },
    render::backend::FontBook,
};

/// Escape text content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn fmt_num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == r.trunc() {
        format!("{}", r as i64)
    } else {
        format!("{r}")
    }
}

fn paint_attrs(out: &mut String, prefix: &str, color: Color) {
    let _ = write!(out, r#" {prefix}="{}""#, color.to_svg_hex());
    if color.a != 255 {
        let _ = write!(out, r#" {prefix}-opacity="{}""#, fmt_num(color.opacity()));
    }
}

fn stroke_attrs(out: &mut String, stroke: Option<StrokeStyle>) {
    match stroke {
        Some(st) => {
            paint_attrs(out, "stroke", st.color);
            let _ = write!(out, r#" stroke-width="{}""#, fmt_num(st.width));
            if let Some(dash) = st.dash {
                let _ = write!(out, r#" stroke-dasharray="{0} {0}""#, fmt_num(dash));
            }
        }
        None => out.push_str(r#" stroke="none""#),
    }
}

fn shape_markup(out: &mut String, node: &ShapeNode) {
    match &node.shape {
        Shape::Rect { rect, radius } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt_num(rect.x0),
                fmt_num(rect.y0),
                fmt_num(rect.width()),
                fmt_num(rect.height())
            );
            if *radius > 0.0 {
                let _ = write!(out, r#" rx="{0}" ry="{0}""#, fmt_num(*radius));
            }
        }
        Shape::Ellipse(rect) => {
            let c = rect.center();
            let _ = write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                fmt_num(c.x),
                fmt_num(c.y),
                fmt_num(rect.width() / 2.0),
                fmt_num(rect.height() / 2.0)
            );
        }
        Shape::Path(path) => {
            let _ = write!(out, r#"<path d="{}""#, path.to_svg());
        }
    }
    match node.fill {
        Some(fill) => paint_attrs(out, "fill", fill),
        None => out.push_str(r#" fill="none""#),
    }
    stroke_attrs(out, node.stroke);
    out.push_str("/>");
}

fn text_markup(out: &mut String, text: &TextNode) {
    let anchor = match text.align {
        TextAlign::Start => "start",
        TextAlign::Middle => "middle",
        TextAlign::End => "end",
    };
    let _ = write!(
        out,
        r#"<text font-family="{}" font-size="{}" font-weight="{}" text-anchor="{anchor}""#,
        escape_xml(text.face.css_family()),
        fmt_num(text.size),
        if text.bold { "bold" } else { "normal" },
    );
    paint_attrs(out, "fill", text.color);
    out.push_str(r#" xml:space="preserve">"#);
    let x = fmt_num(text.anchor_x());
    for (i, line) in text.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            r#"<tspan x="{x}" y="{}">{}</tspan>"#,
            fmt_num(text.origin.y + text.baseline(i)),
            escape_xml(line)
        );
    }
    out.push_str("</text>");
}

/// Append markup for a shape or text node, wrapped in a group carrying its offset and opacity.
///
/// Photo nodes produce nothing.
pub fn node_markup(out: &mut String, node: &Node) {
    if matches!(node.kind, NodeKind::Photo(_)) || node.opacity <= 0.0 {
        return;
    }
    out.push_str("<g");
    if node.offset.x != 0.0 || node.offset.y != 0.0 {
        let _ = write!(
            out,
            r#" transform="translate({} {})""#,
            fmt_num(node.offset.x),
            fmt_num(node.offset.y)
        );
    }
    if node.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, fmt_num(node.opacity));
    }
    out.push('>');
    match &node.kind {
        NodeKind::Shape(shape) => shape_markup(out, shape),
        NodeKind::Text(text) => text_markup(out, text),
        NodeKind::Photo(_) => {}
    }
    out.push_str("</g>");
}

/// Wrap `body` into a standalone document whose user space covers `view`.
pub fn document(view: Rect, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">{body}</svg>"#,
        x = fmt_num(view.x0),
        y = fmt_num(view.y0),
        w = fmt_num(view.width()),
        h = fmt_num(view.height()),
    )
}

/// Full-canvas background rectangle.
pub fn background_markup(out: &mut String, size: Size, color: Color) {
    let _ = write!(
        out,
        r#"<rect x="0" y="0" width="{}" height="{}""#,
        fmt_num(size.width),
        fmt_num(size.height)
    );
    paint_attrs(out, "fill", color);
    out.push_str("/>");
}

/// Parse markup with the shared fonts.
pub fn parse(markup: &str, fonts: &FontBook) -> KeepsakeResult<usvg::Tree> {
    let opts = fonts.svg_options();
    usvg::Tree::from_str(markup, &opts)
        .map_err(|e| KeepsakeError::render(format!("parse composition svg: {e}")))
}

/// Rasterize `tree` into a new premultiplied pixmap of `width x height` at `scale`.
pub fn rasterize(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
    scale: f64,
) -> KeepsakeResult<resvg::tiny_skia::Pixmap> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        KeepsakeError::render(format!("failed to allocate {width}x{height} svg pixmap"))
    })?;
    let s = scale as f32;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(s, s),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
