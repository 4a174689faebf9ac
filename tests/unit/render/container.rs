use super::*;
use crate::{
    composition::{
        model::{Node, TextAlign, TextNode},
        text::FontFace,
    },
    foundation::core::{Color, Point},
};

fn tall(lines: usize) -> Composition {
    let mut c = Composition::new(Sizing::ContentHeight { padding: 10.0 });
    c.push(Node::text(TextNode {
        origin: Point::new(0.0, 0.0),
        width: 100.0,
        lines: vec!["line".to_string(); lines],
        face: FontFace::Mono,
        size: 10.0,
        bold: false,
        line_height: 10.0,
        color: Color::BLACK,
        align: TextAlign::Start,
    }));
    c
}

#[test]
fn wrapped_compositions_measure_the_frame() {
    let frame = FixedFrame::new(Size::new(100.0, 200.0));
    for lines in [1, 10_000] {
        let wrapped = frame.wrap(tall(lines));
        assert_eq!(wrapped.measure(Size::new(1.0, 1.0)), frame.size());
    }
}

#[test]
fn overflow_reports_clipped_height() {
    let frame = FixedFrame::new(Size::new(100.0, 200.0));
    assert_eq!(frame.overflow(&tall(5)), 0.0);
    assert_eq!(frame.overflow(&tall(50)), 310.0);
}
