use super::*;
use crate::composition::motion::Ease;
use kurbo::Shape as _;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 128])
        }
    });
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn label(y: f64, lines: usize) -> Node {
    Node::text(TextNode {
        origin: Point::new(10.0, y),
        width: 100.0,
        lines: vec!["x".to_string(); lines],
        face: FontFace::Sans,
        size: 10.0,
        bold: false,
        line_height: 14.0,
        color: Color::BLACK,
        align: TextAlign::Start,
    })
}

#[test]
fn decode_crops_to_slot_aspect() {
    let img = PreparedImage::decode_cropped(&png_bytes(40, 10), 1.0).unwrap();
    assert_eq!((img.width, img.height), (10, 10));
    assert_eq!(img.rgba8_premul.len(), 10 * 10 * 4);

    let tall = PreparedImage::decode_cropped(&png_bytes(10, 40), 2.0).unwrap();
    assert_eq!((tall.width, tall.height), (10, 5));
}

#[test]
fn decode_premultiplies_alpha() {
    let img = PreparedImage::decode_cropped(&png_bytes(4, 1), 4.0).unwrap();
    let last = &img.rgba8_premul[12..16];
    assert_eq!(last[3], 128);
    assert_eq!(last[2], 128);
}

#[test]
fn decode_rejects_garbage() {
    assert!(PreparedImage::decode_cropped(b"not an image", 1.0).is_err());
}

#[test]
fn flexible_takes_the_proposal() {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(label(500.0, 3));
    assert_eq!(c.measure(Size::new(200.0, 100.0)), Size::new(200.0, 100.0));
}

#[test]
fn content_height_follows_nodes() {
    let mut short = Composition::new(Sizing::ContentHeight { padding: 20.0 });
    short.push(label(10.0, 1));
    let mut long = short.clone();
    long.push(label(24.0, 100));

    assert_eq!(short.measure(Size::new(280.0, 640.0)), Size::new(280.0, 44.0));
    assert_eq!(
        long.measure(Size::new(280.0, 640.0)),
        Size::new(280.0, 24.0 + 1400.0 + 20.0)
    );
}

#[test]
fn node_bounds_include_offset_and_stroke() {
    let mut node = Node::stroke(
        Shape::Rect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            radius: 0.0,
        },
        StrokeStyle {
            color: Color::BLACK,
            width: 2.0,
            dash: None,
        },
    );
    node.offset = Vec2::new(5.0, 0.0);
    assert_eq!(node.bounds(), Rect::new(4.0, -1.0, 16.0, 11.0));
}

#[test]
fn sample_resolves_motions() {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(label(0.0, 1));
    c.push(label(0.0, 1).with_motion(Motion::slide(Vec2::new(0.0, 40.0), 2.0, Ease::Linear)));
    c.push(label(0.0, 1).with_motion(Motion::fade(0.0, 1.0).delayed(0.5)));

    assert!(c.is_animated());
    assert_eq!(c.settle_secs(), 2.0);

    let start = c.sample(0.0);
    assert_eq!(start.nodes[1].offset, Vec2::new(0.0, 40.0));
    assert_eq!(start.nodes[2].opacity, 0.0);
    assert!(!start.is_animated());

    let settled = c.settled();
    assert_eq!(settled.nodes[1].offset, Vec2::ZERO);
    assert_eq!(settled.nodes[2].opacity, 1.0);
}

#[test]
fn validate_catches_bad_nodes() {
    let mut c = Composition::new(Sizing::Flexible);
    c.push(label(0.0, 1));
    assert!(c.validate().is_ok());

    c.push(label(0.0, 1).with_opacity(1.5));
    assert!(c.validate().is_err());

    let fixed = Composition::new(Sizing::Fixed(Size::new(0.0, 10.0)));
    assert!(fixed.validate().is_err());
}

#[test]
fn shapes_convert_to_paths() {
    let rounded = Shape::Rect {
        rect: Rect::new(0.0, 0.0, 20.0, 10.0),
        radius: 4.0,
    };
    let bb = rounded.to_path().bounding_box();
    assert!((bb.width() - 20.0).abs() < 1e-6);
    let ellipse = Shape::Ellipse(Rect::new(0.0, 0.0, 8.0, 8.0));
    assert!((ellipse.to_path().bounding_box().height() - 8.0).abs() < 1e-6);
}
