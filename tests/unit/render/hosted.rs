use super::*;
use std::sync::Arc;

use crate::composition::model::{Node, PreparedImage, Shape, Sizing};

fn red_square() -> Composition {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(Node::fill(
        Shape::Rect {
            rect: Rect::new(0.0, 0.0, 5.0, 5.0),
            radius: 0.0,
        },
        Color::rgb(255, 0, 0),
    ));
    c
}

#[test]
fn capture_matches_pixel_dims() {
    let strategy = HostedStrategy::new(FontBook::system());
    let bitmap = strategy
        .capture(&red_square(), Size::new(10.0, 7.5), 2.0, None)
        .unwrap();
    assert_eq!((bitmap.width, bitmap.height), (20, 15));
    assert_eq!(bitmap.pixel(4, 4), Some([255, 0, 0, 255]));
    assert_eq!(bitmap.pixel(15, 12), Some([0, 0, 0, 0]));
}

#[test]
fn background_and_paper_are_painted() {
    let mut c = red_square();
    c.background = Some(Color::rgb(0, 255, 0));
    let strategy = HostedStrategy::new(FontBook::system());
    let bitmap = strategy
        .capture(&c, Size::new(10.0, 10.0), 1.0, Some(Color::rgb(0, 0, 255)))
        .unwrap();
    assert_eq!(bitmap.pixel(8, 8), Some([0, 255, 0, 255]));
}

#[test]
fn photos_become_their_own_layers() {
    let mut c = red_square();
    let image = PreparedImage {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![0, 0, 255, 255]),
    };
    c.push(Node::photo(Rect::new(6.0, 0.0, 10.0, 4.0), Arc::new(image)));
    c.push(Node::fill(
        Shape::Rect {
            rect: Rect::new(8.0, 0.0, 10.0, 2.0),
            radius: 0.0,
        },
        Color::rgb(0, 255, 0),
    ));

    let mut host = HostSurface::new(FontBook::system());
    host.attach(c, Size::new(10.0, 10.0)).unwrap();
    host.layout().unwrap();
    assert_eq!(host.layers.as_ref().map(Vec::len), Some(3));

    let bitmap = host.rasterize(1.0, None).unwrap();
    assert_eq!(bitmap.pixel(7, 2), Some([0, 0, 255, 255]));
    assert_eq!(bitmap.pixel(9, 1), Some([0, 255, 0, 255]));
}

#[test]
fn lifecycle_is_enforced() {
    let mut host = HostSurface::new(FontBook::system());
    assert!(host.layout().is_err());
    host.attach(red_square(), Size::new(4.0, 4.0)).unwrap();
    assert!(host.rasterize(1.0, None).is_err());
    host.layout().unwrap();
    assert!(host.rasterize(1.0, None).is_ok());

    assert!(host.attach(red_square(), Size::new(0.0, 4.0)).is_err());
    assert!(host.detach().is_some());
    assert!(host.composition().is_none());
}

#[test]
fn presentation_opacity_is_clamped() {
    let mut host = HostSurface::new(FontBook::system());
    assert_eq!(host.presentation_opacity(), 1.0);
    host.set_presentation_opacity(NEAR_INVISIBLE_OPACITY);
    assert_eq!(host.presentation_opacity(), 0.01);
    host.set_presentation_opacity(3.0);
    assert_eq!(host.presentation_opacity(), 1.0);
}
