use super::*;
use crate::{
    composition::{model::StrokeStyle as Stroke, text::FontFace},
    foundation::core::{Point, Vec2},
};

fn text_node(line: &str) -> Node {
    Node::text(TextNode {
        origin: Point::new(10.0, 20.0),
        width: 100.0,
        lines: vec![line.to_string(), String::new()],
        face: FontFace::Serif,
        size: 10.0,
        bold: true,
        line_height: 14.0,
        color: Color::rgba(0, 0, 0, 128),
        align: TextAlign::Middle,
    })
}

#[test]
fn escapes_markup_characters() {
    assert_eq!(
        escape_xml(r#"<a href="x">&'"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&apos;"
    );
    assert_eq!(escape_xml("tab\there"), "tabhere");
}

#[test]
fn text_markup_positions_lines() {
    let mut out = String::new();
    node_markup(&mut out, &text_node("Fish & chips"));
    assert!(out.contains("Fish &amp; chips"));
    assert!(out.contains(r#"text-anchor="middle""#));
    assert!(out.contains(r#"x="60""#));
    assert!(out.contains(r#"font-weight="bold""#));
    assert!(out.contains(r#"fill-opacity="#));
    assert_eq!(out.matches("<tspan").count(), 1);
}

#[test]
fn group_carries_offset_and_opacity() {
    let mut node = Node::fill(
        Shape::Rect {
            rect: Rect::new(0.0, 0.0, 4.0, 4.0),
            radius: 1.5,
        },
        Color::rgb(255, 0, 0),
    )
    .with_opacity(0.5);
    node.offset = Vec2::new(3.0, -2.0);

    let mut out = String::new();
    node_markup(&mut out, &node);
    assert!(out.starts_with(r#"<g transform="translate(3 -2)" opacity="0.5">"#));
    assert!(out.contains(r#"rx="1.5""#));
    assert!(out.contains(r##"fill="#ff0000""##));
    assert!(out.contains(r#"stroke="none""#));
}

#[test]
fn dashed_strokes_emit_dasharray() {
    let node = Node::stroke(
        Shape::Ellipse(Rect::new(0.0, 0.0, 10.0, 6.0)),
        Stroke {
            color: Color::BLACK,
            width: 1.0,
            dash: Some(4.0),
        },
    );
    let mut out = String::new();
    node_markup(&mut out, &node);
    assert!(out.contains(r#"<ellipse cx="5" cy="3" rx="5" ry="3""#));
    assert!(out.contains(r#"stroke-dasharray="4 4""#));
    assert!(out.contains(r#"fill="none""#));
}

#[test]
fn invisible_nodes_emit_nothing() {
    let mut out = String::new();
    node_markup(&mut out, &text_node("x").with_opacity(0.0));
    assert!(out.is_empty());
}

#[test]
fn documents_parse_and_rasterize() {
    let mut body = String::new();
    background_markup(&mut body, Size::new(8.0, 4.0), Color::rgb(0, 0, 255));
    let doc = document(Rect::new(0.0, 0.0, 8.0, 4.0), &body);
    let tree = parse(&doc, &FontBook::system()).unwrap();
    let pixmap = rasterize(&tree, 16, 8, 2.0).unwrap();
    let px = &pixmap.data()[(4 * 16 + 12) * 4..(4 * 16 + 12) * 4 + 4];
    assert_eq!(px, &[0, 0, 255, 255]);
}

#[test]
fn malformed_markup_is_a_render_error() {
    for markup in ["<svg", "not markup at all"] {
        let err = parse(markup, &FontBook::system()).unwrap_err();
        assert!(matches!(err, KeepsakeError::Render(_)), "{markup}: {err}");
    }
}
