use kurbo::Shape;

use crate::assets::decode::BackgroundImage;
use crate::foundation::core::{BezPath, LogicalSize, Point, Rect, Rgba8};

/// Flattening tolerance used when converting shapes to paths, in logical units.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

/// Fill style for [`DrawOp::FillPath`].
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Rgba8),
    /// Linear gradient between two logical points.
    Linear {
        /// Offset 0 position.
        start: Point,
        /// Offset 1 position.
        end: Point,
        /// `(offset, color)` stops, offsets ascending in `[0, 1]`.
        stops: Vec<(f32, Rgba8)>,
    },
    /// Radial gradient from `center` out to `radius`.
    Radial {
        /// Gradient centre.
        center: Point,
        /// Radius of offset 1.
        radius: f64,
        /// `(offset, color)` stops, offsets ascending in `[0, 1]`.
        stops: Vec<(f32, Rgba8)>,
    },
}

/// Horizontal alignment of a text anchor. Text is always vertically centred on the anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    /// Anchor is the left edge.
    Left,
    /// Anchor is the horizontal centre.
    Center,
    /// Anchor is the right edge.
    Right,
}

/// One drawing instruction in logical units.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill a path.
    FillPath {
        /// Outline.
        path: BezPath,
        /// Fill.
        paint: Paint,
    },
    /// Stroke a path with a solid color.
    StrokePath {
        /// Outline.
        path: BezPath,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in logical units.
        width: f64,
    },
    /// Single line of text.
    Text {
        /// Text as given, no localization applied.
        text: String,
        /// Anchor point.
        anchor: Point,
        /// Font size in logical pixels.
        size_px: f64,
        /// Horizontal alignment relative to `anchor`.
        align: TextAlign,
        /// Fill color.
        color: Rgba8,
        /// Shaped text wider than this is scaled down about its anchor.
        max_width: Option<f64>,
    },
    /// Image stretched into `rect`.
    Image {
        /// Premultiplied pixels.
        image: BackgroundImage,
        /// Destination rectangle.
        rect: Rect,
        /// Opacity in `[0, 1]`.
        opacity: f64,
    },
    /// Group composited with additive ("lighter") blending.
    Additive(Vec<DrawOp>),
}

/// Record of one axis/zone node drawn in a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeMark {
    /// Axis or zone position, `0..AXIS_COUNT`.
    pub index: usize,
    /// Axis id or zone key.
    pub key: String,
    /// Label text as drawn.
    pub label: String,
    /// Score the node represents.
    pub score: u8,
    /// Node centre in logical units.
    pub center: Point,
    /// Label anchor in logical units.
    pub label_anchor: Point,
    /// Label background box, when the chart draws one.
    pub label_box: Option<Rect>,
}

/// Everything one chart draws in one frame.
#[derive(Clone, Debug)]
pub struct FramePlan {
    size: LogicalSize,
    ops: Vec<DrawOp>,
    nodes: Vec<NodeMark>,
}

impl FramePlan {
    /// Empty plan for a surface of `size`.
    pub fn new(size: LogicalSize) -> Self {
        Self {
            size,
            ops: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Logical size the plan was laid out for.
    pub fn size(&self) -> LogicalSize {
        self.size
    }

    /// Ops in paint order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Nodes in axis/zone order.
    pub fn nodes(&self) -> &[NodeMark] {
        &self.nodes
    }

    /// Append an op.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// Record a drawn node.
    pub fn mark(&mut self, node: NodeMark) {
        self.nodes.push(node);
    }

    /// Every text op's string, depth-first.
    pub fn texts(&self) -> Vec<&str> {
        fn walk<'a>(ops: &'a [DrawOp], out: &mut Vec<&'a str>) {
            for op in ops {
                match op {
                    DrawOp::Text { text, .. } => out.push(text),
                    DrawOp::Additive(inner) => walk(inner, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.ops, &mut out);
        out
    }
}

pub(crate) fn circle_path(center: Point, radius: f64) -> BezPath {
    kurbo::Circle::new(center, radius.max(0.0)).to_path(PATH_TOLERANCE)
}

pub(crate) fn rounded_rect_path(rect: Rect, radius: f64) -> BezPath {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    kurbo::RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
}

pub(crate) fn line_path(a: Point, b: Point) -> BezPath {
    let mut p = BezPath::new();
    p.move_to(a);
    p.line_to(b);
    p
}

pub(crate) fn polygon_path(points: &[Point]) -> BezPath {
    let mut p = BezPath::new();
    let mut it = points.iter();
    if let Some(&first) = it.next() {
        p.move_to(first);
        for &pt in it {
            p.line_to(pt);
        }
        p.close_path();
    }
    p
}

/// Advance-width estimate used for layout decisions made before rasterization.
///
/// East Asian wide characters count as one em, everything else as `0.56` em.
pub fn estimate_text_width(text: &str, size_px: f64) -> f64 {
    text.chars()
        .map(|c| if is_wide(c) { 1.0 } else { 0.56 })
        .sum::<f64>()
        * size_px
}

fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1F64F
            | 0x20000..=0x3FFFD
    )
}
