//! Default composition factory.
//!
//! Every style shares one card layout (header, date, photo slot, wrapped body, mood/weather
//! footer) painted over a small set of style motifs. Colors come from the style's background row
//! and its collection; ink flips to a light tone on dark paper.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use crate::{
    composition::{
        factory::CompositionFactory,
        model::{Composition, Node, PreparedImage, Shape, Sizing, StrokeStyle, TextAlign, TextNode},
        motion::{Ease, Motion},
        text::{FontFace, truncate_lines, wrap_text},
    },
    foundation::core::{BezPath, Color, Point, Rect, Vec2},
    record::JournalRecord,
    style::catalog::{ArtifactStyle, Collection},
};

/// Bottom padding of content-sized compositions.
const CONTENT_PADDING: f64 = 24.0;

/// Share of the settle delay the entrance motion may use.
const MOTION_SHARE: f64 = 0.8;

#[derive(Clone, Copy, Debug)]
struct Palette {
    paper: Color,
    ink: Color,
    accent: Color,
    muted: Color,
}

impl Palette {
    fn for_style(style: ArtifactStyle) -> Self {
        let collection = style.collection();
        let paper = style.descriptor().background.unwrap_or(match collection {
            Collection::Correspondence => Color::rgb(0xf4, 0xef, 0xe6),
            Collection::Tickets => Color::rgb(0xfa, 0xfa, 0xf7),
            Collection::Keepsakes => Color::rgb(0xf6, 0xf1, 0xe4),
            Collection::Music => Color::rgb(0xf2, 0xe8, 0xd5),
            Collection::Desk => Color::rgb(0xff, 0xff, 0xff),
        });
        let accent = match collection {
            Collection::Correspondence => Color::rgb(0x8b, 0x3a, 0x2b),
            Collection::Tickets => Color::rgb(0x1f, 0x4e, 0x79),
            Collection::Keepsakes => Color::rgb(0x6b, 0x4f, 0x2a),
            Collection::Music => Color::rgb(0xc0, 0x39, 0x2b),
            Collection::Desk => Color::rgb(0x2f, 0x5d, 0x50),
        };
        let dark = luminance(paper) < 0.45;
        let ink = if dark {
            Color::rgb(0xf5, 0xf1, 0xe8)
        } else {
            Color::rgb(0x2a, 0x26, 0x22)
        };
        Self {
            paper,
            ink,
            accent: if dark { Color::rgb(0xf2, 0xc1, 0x4e) } else { accent },
            muted: ink.with_alpha(0x80),
        }
    }
}

fn luminance(c: Color) -> f64 {
    (0.2126 * f64::from(c.r) + 0.7152 * f64::from(c.g) + 0.0722 * f64::from(c.b)) / 255.0
}

fn body_face(style: ArtifactStyle) -> FontFace {
    use ArtifactStyle as S;
    match style {
        S::WaxSealLetter | S::StickyNote | S::Polaroid | S::PressedFlower => FontFace::Script,
        S::Receipt | S::ThermalTicket | S::Telegram | S::Typewriter | S::LibraryCard => {
            FontFace::Mono
        }
        S::BoardingPass
        | S::TrainTicket
        | S::MovieTicket
        | S::ConcertTicket
        | S::FilmStrip
        | S::Cassette
        | S::Matchbook
        | S::Calendar => FontFace::Sans,
        _ => FontFace::Serif,
    }
}

/// splitmix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn hash_id(id: &str) -> u64 {
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn stroke(color: Color, width: f64) -> StrokeStyle {
    StrokeStyle {
        color,
        width,
        dash: None,
    }
}

fn dashed(color: Color, width: f64, dash: f64) -> StrokeStyle {
    StrokeStyle {
        color,
        width,
        dash: Some(dash),
    }
}

fn line(from: Point, to: Point) -> Shape {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    Shape::Path(path)
}

fn circle(center: Point, r: f64) -> Shape {
    Shape::Ellipse(Rect::new(center.x - r, center.y - r, center.x + r, center.y + r))
}

/// Vertical cursor over the content column.
struct Column {
    left: f64,
    width: f64,
    y: f64,
    bottom: f64,
}

impl Column {
    fn remaining(&self) -> f64 {
        (self.bottom - self.y).max(0.0)
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        lines: Vec<String>,
        face: FontFace,
        size: f64,
        bold: bool,
        color: Color,
        align: TextAlign,
        gap: f64,
    ) -> Option<Node> {
        if lines.is_empty() {
            return None;
        }
        let node = TextNode {
            origin: Point::new(self.left, self.y),
            width: self.width,
            lines,
            face,
            size,
            bold,
            line_height: (size * 1.35).round(),
            color,
            align,
        };
        self.y = node.bounds().y1 + gap;
        Some(Node::text(node))
    }
}

/// Card-style [`CompositionFactory`] covering every [`ArtifactStyle`].
#[derive(Debug, Default)]
pub struct ArtifactFactory {
    nonce: AtomicU64,
}

impl ArtifactFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Six-digit decorative serial; differs between calls for the same record.
    fn serial(&self, record: &JournalRecord) -> String {
        let n = self.nonce.fetch_add(1, Ordering::Relaxed);
        format!("{:06}", mix(hash_id(&record.id) ^ n) % 1_000_000)
    }

    fn photo(record: &JournalRecord, slot: Rect) -> Option<Node> {
        let photo = record.photos.first()?;
        match PreparedImage::decode_cropped(photo.bytes(), slot.width() / slot.height()) {
            Ok(img) => Some(Node::photo(slot, Arc::new(img))),
            Err(err) => {
                tracing::warn!(record = %record.id, error = %err, "skipping undecodable photo");
                None
            }
        }
    }
}

impl CompositionFactory for ArtifactFactory {
    #[tracing::instrument(level = "debug", skip(self, record), fields(record = %record.id))]
    fn make(&self, record: &JournalRecord, style: ArtifactStyle) -> Composition {
        let desc = style.descriptor();
        let (w, h) = (desc.design_width, desc.design_height);
        let palette = Palette::for_style(style);
        let face = body_face(style);

        let mut comp = Composition::new(if desc.content_sized {
            Sizing::ContentHeight {
                padding: CONTENT_PADDING,
            }
        } else {
            Sizing::Flexible
        });
        if desc.background.is_some() {
            comp.background = Some(palette.paper);
        }

        let margin = (w.min(h) * 0.08).clamp(12.0, 28.0);
        let mut col = Column {
            left: margin,
            width: w - 2.0 * margin,
            y: margin,
            bottom: h - margin,
        };
        motif(style, &mut comp, &mut col, &palette, &self.serial(record));
        let first_content = comp.nodes.len();

        // Header.
        let title = vec![style.display_name().to_uppercase()];
        comp.nodes.extend(col.text(
            title,
            FontFace::Sans,
            11.0,
            true,
            palette.accent,
            TextAlign::Start,
            2.0,
        ));
        if let Some(date) = &record.date {
            comp.nodes.extend(col.text(
                vec![date.clone()],
                FontFace::Sans,
                9.0,
                false,
                palette.muted,
                TextAlign::Start,
                6.0,
            ));
        }

        // Photo slot.
        if !record.photos.is_empty() {
            let side = if style == ArtifactStyle::Polaroid {
                col.width
            } else {
                (col.remaining() * 0.45).min(col.width * 0.75)
            };
            if side >= 8.0 {
                let slot_w = if style == ArtifactStyle::Polaroid {
                    side
                } else {
                    col.width
                };
                let slot = Rect::new(col.left, col.y, col.left + slot_w, col.y + side);
                if let Some(node) = Self::photo(record, slot) {
                    comp.push(node);
                    col.y = slot.y1 + 8.0;
                }
            }
        }

        // Body.
        let size = if face == FontFace::Script { 15.0 } else { 12.0 };
        let mut lines = wrap_text(&record.content, face, size, col.width);
        if !desc.content_sized {
            let footer = 22.0;
            let line_height = (size * 1.35).round();
            let fit = ((col.remaining() - footer) / line_height).floor().max(0.0) as usize;
            lines = truncate_lines(lines, fit);
        }
        let align = if matches!(style, ArtifactStyle::VinylLabel | ArtifactStyle::FortuneCookie) {
            TextAlign::Middle
        } else {
            TextAlign::Start
        };
        comp.nodes
            .extend(col.text(lines, face, size, false, palette.ink, align, 8.0));

        // Footer: mood chip and weather.
        let footer_y = if desc.content_sized {
            col.y
        } else {
            col.bottom - 16.0
        };
        if !record.mood.trim().is_empty() {
            let mood = record.mood.trim().to_lowercase();
            let chip_w = (mood.chars().count() as f64 * 9.0 * 0.55 + 16.0).min(col.width);
            let chip = Rect::new(col.left, footer_y, col.left + chip_w, footer_y + 16.0);
            comp.push(Node::stroke(
                Shape::Rect {
                    rect: chip,
                    radius: 8.0,
                },
                stroke(palette.accent, 1.0),
            ));
            comp.push(Node::text(TextNode {
                origin: Point::new(chip.x0, chip.y0 + 1.0),
                width: chip.width(),
                lines: vec![mood],
                face: FontFace::Sans,
                size: 9.0,
                bold: false,
                line_height: 14.0,
                color: palette.accent,
                align: TextAlign::Middle,
            }));
        }
        if let Some(weather) = record.weather {
            comp.push(Node::text(TextNode {
                origin: Point::new(col.left, footer_y + 1.0),
                width: col.width,
                lines: vec![weather.label().to_string()],
                face: FontFace::Sans,
                size: 9.0,
                bold: false,
                line_height: 14.0,
                color: palette.muted,
                align: TextAlign::End,
            }));
        }

        // Entrance motion for animated styles, finished before the capture delay elapses.
        if let Some(delay) = desc.settle_secs {
            let motion = entrance(style, h, delay * MOTION_SHARE);
            for node in &mut comp.nodes[first_content..] {
                node.motion = Some(motion);
            }
        }
        comp
    }
}

fn entrance(style: ArtifactStyle, h: f64, duration: f64) -> Motion {
    match style {
        ArtifactStyle::Envelope | ArtifactStyle::WaxSealLetter => {
            Motion::slide(Vec2::new(0.0, h * 0.25), duration, Ease::OutCubic)
        }
        ArtifactStyle::Polaroid | ArtifactStyle::PressedFlower | ArtifactStyle::Typewriter => {
            Motion::fade(0.0, duration)
        }
        _ => Motion::slide(Vec2::new(0.0, -12.0), duration, Ease::OutBack),
    }
}

/// Style decorations drawn under the content; may narrow the content column.
fn motif(
    style: ArtifactStyle,
    comp: &mut Composition,
    col: &mut Column,
    p: &Palette,
    serial: &str,
) {
    use ArtifactStyle as S;
    let desc = style.descriptor();
    let (w, h) = (desc.design_width, desc.design_height);

    match style {
        S::Envelope | S::WaxSealLetter => {
            let mut flap = BezPath::new();
            flap.move_to((0.0, 0.0));
            flap.line_to((w / 2.0, h * 0.32));
            flap.line_to((w, 0.0));
            comp.push(Node::stroke(Shape::Path(flap), stroke(p.muted, 1.0)));
            if style == S::WaxSealLetter {
                comp.push(Node::fill(
                    circle(Point::new(w / 2.0, h * 0.32), 18.0),
                    Color::rgb(0xa3, 0x1f, 0x2b),
                ));
            }
            col.y = h * 0.32 + 24.0;
        }
        S::Postcard => {
            let stamp = Rect::new(w - col.left - 44.0, col.y, w - col.left, col.y + 52.0);
            comp.push(Node::stroke(
                Shape::Rect {
                    rect: stamp,
                    radius: 0.0,
                },
                dashed(p.accent, 1.0, 3.0),
            ));
            col.width -= 52.0;
        }
        S::Telegram => {
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(0.0, 0.0, w, 36.0),
                    radius: 0.0,
                },
                p.accent,
            ));
            col.y = 48.0;
        }
        S::Receipt | S::ThermalTicket => {
            comp.push(Node::text(TextNode {
                origin: Point::new(col.left, col.y),
                width: col.width,
                lines: vec![format!("ORDER #{serial}")],
                face: FontFace::Mono,
                size: 9.0,
                bold: false,
                line_height: 12.0,
                color: p.muted,
                align: TextAlign::End,
            }));
            comp.push(Node::stroke(
                line(
                    Point::new(col.left, col.y + 40.0),
                    Point::new(w - col.left, col.y + 40.0),
                ),
                dashed(p.muted, 1.0, 4.0),
            ));
        }
        S::MovieTicket | S::ConcertTicket | S::BoardingPass | S::TrainTicket => {
            let stub_x = (w * 0.72).round();
            comp.push(Node::stroke(
                line(Point::new(stub_x, 6.0), Point::new(stub_x, h - 6.0)),
                dashed(p.muted, 1.0, 5.0),
            ));
            let label = match style {
                S::BoardingPass => format!("FLIGHT {serial}"),
                S::TrainTicket => format!("CAR {serial}"),
                _ => format!("ADMIT ONE\n{serial}"),
            };
            comp.push(Node::text(TextNode {
                origin: Point::new(stub_x + 10.0, col.y),
                width: w - stub_x - 10.0 - col.left,
                lines: label.lines().map(str::to_string).collect(),
                face: FontFace::Mono,
                size: 10.0,
                bold: true,
                line_height: 14.0,
                color: p.accent,
                align: TextAlign::Start,
            }));
            col.width = stub_x - 2.0 * col.left;
        }
        S::Polaroid => {}
        S::FilmStrip => {
            let mut y = 8.0;
            while y + 10.0 < h {
                for x in [6.0, w - 18.0] {
                    comp.push(Node::fill(
                        Shape::Rect {
                            rect: Rect::new(x, y, x + 12.0, y + 9.0),
                            radius: 2.0,
                        },
                        Color::rgb(0xee, 0xee, 0xee),
                    ));
                }
                y += 18.0;
            }
            col.left = 26.0;
            col.width = w - 52.0;
        }
        S::Bookmark => {
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(0.0, 0.0, w, h),
                    radius: desc.corner_radius,
                },
                p.paper,
            ));
            comp.push(Node::stroke(
                circle(Point::new(w / 2.0, 22.0), 7.0),
                stroke(p.muted, 1.5),
            ));
            col.y = 40.0;
        }
        S::PressedFlower => {
            let center = Point::new(w - col.left - 30.0, h - col.left - 60.0);
            for (dx, dy) in [(0.0, -14.0), (14.0, 0.0), (0.0, 14.0), (-14.0, 0.0)] {
                comp.push(Node::fill(
                    circle(center + Vec2::new(dx, dy), 10.0),
                    Color::rgba(0xc8, 0x7a, 0x8a, 0xb0),
                ));
            }
            comp.push(Node::fill(circle(center, 6.0), Color::rgb(0xe0, 0xb0, 0x40)));
            comp.push(Node::stroke(
                line(center + Vec2::new(0.0, 14.0), center + Vec2::new(-6.0, 56.0)),
                stroke(Color::rgb(0x5a, 0x7a, 0x3a), 2.0),
            ));
            col.bottom -= 10.0;
        }
        S::Stamp => {
            let mut x = 0.0;
            while x <= w {
                comp.push(Node::fill(circle(Point::new(x, 0.0), 6.0), p.paper));
                comp.push(Node::fill(circle(Point::new(x, h), 6.0), p.paper));
                x += 16.0;
            }
            let mut y = 0.0;
            while y <= h {
                comp.push(Node::fill(circle(Point::new(0.0, y), 6.0), p.paper));
                comp.push(Node::fill(circle(Point::new(w, y), 6.0), p.paper));
                y += 16.0;
            }
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(6.0, 6.0, w - 6.0, h - 6.0),
                    radius: 0.0,
                },
                p.paper,
            ));
            comp.push(Node::stroke(
                Shape::Rect {
                    rect: Rect::new(14.0, 14.0, w - 14.0, h - 14.0),
                    radius: 0.0,
                },
                stroke(p.accent, 1.0),
            ));
            col.left = 24.0;
            col.width = w - 48.0;
            col.y = 24.0;
            col.bottom = h - 24.0;
        }
        S::Matchbook => {
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(0.0, h - 34.0, w, h),
                    radius: 0.0,
                },
                Color::rgb(0x3a, 0x2a, 0x22),
            ));
            col.bottom = h - 42.0;
        }
        S::VinylLabel => {
            let c = Point::new(w / 2.0, h / 2.0);
            comp.push(Node::fill(circle(c, w / 2.0), p.paper));
            comp.push(Node::stroke(circle(c, w / 2.0 - 10.0), stroke(p.accent, 2.0)));
            comp.push(Node::fill(circle(c, 8.0), Color::rgb(0x11, 0x11, 0x11)));
            col.left = w * 0.2;
            col.width = w * 0.6;
            col.y = h * 0.18;
            col.bottom = h * 0.5 - 14.0;
        }
        S::Cassette => {
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(22.0, 20.0, w - 22.0, h * 0.55),
                    radius: 6.0,
                },
                Color::rgb(0xf3, 0xe9, 0xd2),
            ));
            for x in [w * 0.33, w * 0.67] {
                comp.push(Node::stroke(
                    circle(Point::new(x, h * 0.72), 22.0),
                    stroke(Color::rgb(0xcc, 0xcc, 0xcc), 3.0),
                ));
            }
            // Label text sits on the light label strip.
            col.left = 32.0;
            col.width = w - 64.0;
            col.y = 28.0;
            col.bottom = h * 0.55 - 4.0;
        }
        S::StickyNote => {
            let mut fold = BezPath::new();
            fold.move_to((w - 28.0, h));
            fold.line_to((w, h - 28.0));
            fold.line_to((w - 28.0, h - 28.0));
            fold.close_path();
            comp.push(Node::fill(Shape::Path(fold), Color::rgba(0, 0, 0, 0x22)));
        }
        S::IndexCard | S::Notebook => {
            let top = if style == S::IndexCard { 44.0 } else { 36.0 };
            let rule = Color::rgba(0x5b, 0x8d, 0xd6, 0x70);
            let mut y = top + 22.0;
            while y < h - 8.0 {
                comp.push(Node::stroke(line(Point::new(0.0, y), Point::new(w, y)), stroke(rule, 0.75)));
                y += 22.0;
            }
            let margin_x = if style == S::IndexCard { 0.0 } else { 40.0 };
            if margin_x > 0.0 {
                comp.push(Node::stroke(
                    line(Point::new(margin_x, 0.0), Point::new(margin_x, h)),
                    stroke(Color::rgba(0xd6, 0x4b, 0x4b, 0x90), 1.0),
                ));
                col.left = margin_x + 10.0;
                col.width = w - col.left - 16.0;
            }
        }
        S::Typewriter => {
            comp.push(Node::stroke(
                Shape::Rect {
                    rect: Rect::new(8.0, 8.0, w - 8.0, h - 8.0),
                    radius: 0.0,
                },
                stroke(p.muted, 0.5),
            ));
        }
        S::LibraryCard => {
            comp.push(Node::text(TextNode {
                origin: Point::new(col.left, h - 40.0),
                width: col.width,
                lines: vec![format!("DATE DUE  {serial}")],
                face: FontFace::Mono,
                size: 9.0,
                bold: false,
                line_height: 12.0,
                color: Color::rgb(0xa3, 0x1f, 0x2b),
                align: TextAlign::Start,
            }));
            comp.push(Node::stroke(
                line(Point::new(col.left, h - 46.0), Point::new(w - col.left, h - 46.0)),
                stroke(p.muted, 0.75),
            ));
            col.bottom = h - 50.0;
        }
        S::Calendar => {
            comp.push(Node::fill(
                Shape::Rect {
                    rect: Rect::new(0.0, 0.0, w, 44.0),
                    radius: 0.0,
                },
                p.accent,
            ));
            col.y = 56.0;
        }
        S::FortuneCookie => {
            comp.push(Node::text(TextNode {
                origin: Point::new(col.left, h - 24.0),
                width: col.width,
                lines: vec![format!("LUCKY NUMBERS {serial}")],
                face: FontFace::Mono,
                size: 8.0,
                bold: false,
                line_height: 10.0,
                color: Color::rgb(0xa3, 0x1f, 0x2b),
                align: TextAlign::Middle,
            }));
            col.bottom = h - 26.0;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/artifact.rs"]
mod tests;
