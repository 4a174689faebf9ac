use std::sync::Arc;

use anyhow::Context;
use kurbo::Shape as _;

use crate::{
    composition::{motion::Motion, text::FontFace},
    foundation::core::{BezPath, Color, Point, Rect, Size, Vec2, premultiply_rgba8_in_place},
    foundation::error::{KeepsakeError, KeepsakeResult},
};

/// Decoded photo pixels, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Decode encoded bytes and center-crop them to `aspect` (width / height).
    ///
    /// Cropping at prepare time lets renderers stretch the image into its slot without
    /// distortion.
    pub fn decode_cropped(bytes: &[u8], aspect: f64) -> KeepsakeResult<Self> {
        let img = image::load_from_memory(bytes).context("decode photo from memory")?;
        let (w, h) = (img.width(), img.height());
        if w == 0 || h == 0 {
            return Err(KeepsakeError::validation("photo has zero size"));
        }

        let img = if aspect.is_finite() && aspect > 0.0 {
            let src_aspect = f64::from(w) / f64::from(h);
            if src_aspect > aspect {
                let cw = ((f64::from(h) * aspect).round() as u32).clamp(1, w);
                img.crop_imm((w - cw) / 2, 0, cw, h)
            } else {
                let ch = ((f64::from(w) / aspect).round() as u32).clamp(1, h);
                img.crop_imm(0, (h - ch) / 2, w, ch)
            }
        } else {
            img
        };

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }
}

/// Outline of a shape node, in design points.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle with optional corner radius.
    Rect { rect: Rect, radius: f64 },
    /// Ellipse inscribed in `rect`.
    Ellipse(Rect),
    /// Arbitrary outline.
    Path(BezPath),
}

impl Shape {
    /// Outline as a Bézier path.
    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Rect { rect, radius } if *radius > 0.0 => {
                kurbo::RoundedRect::from_rect(*rect, *radius).to_path(0.1)
            }
            Self::Rect { rect, .. } => rect.to_path(0.1),
            Self::Ellipse(rect) => kurbo::Ellipse::from_rect(*rect).to_path(0.1),
            Self::Path(path) => path.clone(),
        }
    }

    /// Bounding box (stroke width not included).
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect { rect, .. } | Self::Ellipse(rect) => *rect,
            Self::Path(path) => path.bounding_box(),
        }
    }
}

/// Outline paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in points.
    pub width: f64,
    /// Dash length (gap equals dash), `None` for a solid line.
    pub dash: Option<f64>,
}

/// Filled and/or stroked outline.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeNode {
    /// Outline.
    pub shape: Shape,
    /// Fill color.
    pub fill: Option<Color>,
    /// Outline paint.
    pub stroke: Option<StrokeStyle>,
}

/// Horizontal alignment of text lines inside their block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

/// Block of pre-wrapped text lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    /// Top-left corner of the block.
    pub origin: Point,
    /// Block width; alignment is relative to it.
    pub width: f64,
    /// Lines, already wrapped to `width`.
    pub lines: Vec<String>,
    /// Font face.
    pub face: FontFace,
    /// Font size in points.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Distance between baselines.
    pub line_height: f64,
    /// Fill color.
    pub color: Color,
    /// Line alignment.
    pub align: TextAlign,
}

impl TextNode {
    /// Block bounds (`lines * line_height` tall).
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.line_height * self.lines.len() as f64,
        )
    }

    /// Baseline of line `i`, measured from the block top.
    pub fn baseline(&self, i: usize) -> f64 {
        let leading = (self.line_height - self.size).max(0.0) / 2.0;
        self.line_height * i as f64 + leading + self.size * 0.8
    }

    /// Anchor x coordinate for the configured alignment.
    pub fn anchor_x(&self) -> f64 {
        match self.align {
            TextAlign::Start => self.origin.x,
            TextAlign::Middle => self.origin.x + self.width / 2.0,
            TextAlign::End => self.origin.x + self.width,
        }
    }
}

/// Photo stretched into `rect` (already cropped to the slot aspect).
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoNode {
    /// Destination rectangle.
    pub rect: Rect,
    /// Decoded pixels.
    pub image: Arc<PreparedImage>,
}

/// Visual content of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Shape(ShapeNode),
    Text(TextNode),
    Photo(PhotoNode),
}

/// One drawable element with its presentation properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// What to draw.
    pub kind: NodeKind,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Translation applied on top of the node geometry.
    pub offset: Vec2,
    /// Entrance animation, resolved by [`Composition::sample`].
    pub motion: Option<Motion>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            opacity: 1.0,
            offset: Vec2::ZERO,
            motion: None,
        }
    }

    /// Filled shape.
    pub fn fill(shape: Shape, color: Color) -> Self {
        Self::new(NodeKind::Shape(ShapeNode {
            shape,
            fill: Some(color),
            stroke: None,
        }))
    }

    /// Stroked shape.
    pub fn stroke(shape: Shape, stroke: StrokeStyle) -> Self {
        Self::new(NodeKind::Shape(ShapeNode {
            shape,
            fill: None,
            stroke: Some(stroke),
        }))
    }

    /// Filled and stroked shape.
    pub fn fill_and_stroke(shape: Shape, fill: Color, stroke: StrokeStyle) -> Self {
        Self::new(NodeKind::Shape(ShapeNode {
            shape,
            fill: Some(fill),
            stroke: Some(stroke),
        }))
    }

    /// Text block.
    pub fn text(text: TextNode) -> Self {
        Self::new(NodeKind::Text(text))
    }

    /// Photo.
    pub fn photo(rect: Rect, image: Arc<PreparedImage>) -> Self {
        Self::new(NodeKind::Photo(PhotoNode { rect, image }))
    }

    /// Set the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Attach an entrance motion.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Bounds including the node offset.
    pub fn bounds(&self) -> Rect {
        let base = match &self.kind {
            NodeKind::Shape(s) => {
                let b = s.shape.bounds();
                match s.stroke {
                    Some(st) => b.inflate(st.width / 2.0, st.width / 2.0),
                    None => b,
                }
            }
            NodeKind::Text(t) => t.bounds(),
            NodeKind::Photo(p) => p.rect,
        };
        base + self.offset
    }
}

/// How a composition answers a size proposal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sizing {
    /// Takes the proposed size (designs laid out in design coordinates).
    Flexible,
    /// Takes the proposed width; height follows the content plus bottom padding.
    ContentHeight { padding: f64 },
    /// Always this size, content outside is clipped.
    Fixed(Size),
}

/// Declarative visual structure produced for one record + style.
#[derive(Clone, Debug, PartialEq)]
pub struct Composition {
    /// Sizing behaviour.
    pub sizing: Sizing,
    /// Fill painted under all nodes (the composition's own paper).
    pub background: Option<Color>,
    /// Nodes in paint order.
    pub nodes: Vec<Node>,
}

impl Composition {
    /// Empty composition.
    pub fn new(sizing: Sizing) -> Self {
        Self {
            sizing,
            background: None,
            nodes: Vec::new(),
        }
    }

    /// Append a node (painted above existing ones).
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Bottom edge of the lowest node, `0.0` when empty.
    pub fn content_bottom(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.bounds().y1)
            .fold(0.0, f64::max)
    }

    /// Size the composition takes when offered `proposal`.
    pub fn measure(&self, proposal: Size) -> Size {
        match self.sizing {
            Sizing::Flexible => proposal,
            Sizing::ContentHeight { padding } => {
                Size::new(proposal.width, (self.content_bottom() + padding).max(1.0))
            }
            Sizing::Fixed(size) => size,
        }
    }

    /// Whether any node carries a motion.
    pub fn is_animated(&self) -> bool {
        self.nodes.iter().any(|n| n.motion.is_some())
    }

    /// Time at which every motion has finished.
    pub fn settle_secs(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|n| n.motion.as_ref())
            .map(Motion::end_secs)
            .fold(0.0, f64::max)
    }

    /// Static snapshot of the composition `t` seconds after it was attached.
    pub fn sample(&self, t: f64) -> Composition {
        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if let Some(motion) = node.motion.take() {
                    let (offset, opacity) = motion.sample(t);
                    node.offset += offset;
                    node.opacity *= opacity;
                }
                node
            })
            .collect();
        Composition {
            sizing: self.sizing,
            background: self.background,
            nodes,
        }
    }

    /// Snapshot with every motion finished.
    pub fn settled(&self) -> Composition {
        self.sample(self.settle_secs())
    }

    /// Check node values renderers rely on.
    pub fn validate(&self) -> KeepsakeResult<()> {
        if let Sizing::Fixed(size) = self.sizing
            && !size.is_valid()
        {
            return Err(KeepsakeError::validation("fixed composition size must be > 0"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.opacity.is_finite() || !(0.0..=1.0).contains(&node.opacity) {
                return Err(KeepsakeError::validation(format!(
                    "node {i} opacity must be within [0, 1]"
                )));
            }
            if let Some(m) = &node.motion {
                m.validate()?;
            }
            match &node.kind {
                NodeKind::Text(t) if !(t.size > 0.0 && t.line_height > 0.0) => {
                    return Err(KeepsakeError::validation(format!(
                        "node {i} text size and line height must be > 0"
                    )));
                }
                NodeKind::Shape(ShapeNode {
                    stroke: Some(st), ..
                }) if !(st.width > 0.0) => {
                    return Err(KeepsakeError::validation(format!(
                        "node {i} stroke width must be > 0"
                    )));
                }
                NodeKind::Photo(p) => {
                    let expected = p.image.width as usize * p.image.height as usize * 4;
                    if p.image.rgba8_premul.len() != expected {
                        return Err(KeepsakeError::validation(format!(
                            "node {i} photo byte length mismatch"
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
