//! Scene node definitions for the whiteboard.

mod circle;
mod freehand;
mod line;
mod rect;
mod text;

pub use circle::CircleShape;
pub use freehand::FreehandShape;
pub use line::{LINE_HIT_TOLERANCE, LineEnd, LineShape};
pub use rect::RectShape;
pub use text::TextShape;

use crate::paint::Painter;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene nodes.
pub type NodeId = String;

/// Generate a fresh node id with a readable kind prefix.
pub fn new_node_id(prefix: &str) -> NodeId {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// One of the 8 symbolic positions on a bounding box.
///
/// Used both as resize handles and as line-binding snap targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl Anchor {
    pub const ALL: [Anchor; 8] = [
        Anchor::Nw,
        Anchor::N,
        Anchor::Ne,
        Anchor::E,
        Anchor::Se,
        Anchor::S,
        Anchor::Sw,
        Anchor::W,
    ];

    /// Resolve against a frame built as `(x, y, x + width, y + height)`.
    ///
    /// The frame is used as-is, so negative extents resolve the same way the
    /// raw x/y/width/height would.
    pub fn point_in(self, frame: Rect) -> Point {
        let mid_x = (frame.x0 + frame.x1) / 2.0;
        let mid_y = (frame.y0 + frame.y1) / 2.0;
        match self {
            Anchor::Nw => Point::new(frame.x0, frame.y0),
            Anchor::N => Point::new(mid_x, frame.y0),
            Anchor::Ne => Point::new(frame.x1, frame.y0),
            Anchor::E => Point::new(frame.x1, mid_y),
            Anchor::Se => Point::new(frame.x1, frame.y1),
            Anchor::S => Point::new(mid_x, frame.y1),
            Anchor::Sw => Point::new(frame.x0, frame.y1),
            Anchor::W => Point::new(frame.x0, mid_y),
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, Anchor::Nw | Anchor::W | Anchor::Sw)
    }

    /// Whether dragging this handle moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(self, Anchor::Ne | Anchor::E | Anchor::Se)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, Anchor::Nw | Anchor::N | Anchor::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(self, Anchor::Sw | Anchor::S | Anchor::Se)
    }
}

/// Persistent reference from a line endpoint to an anchor of another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineBinding {
    pub node_id: NodeId,
    pub handle: Anchor,
}

impl LineBinding {
    pub fn new(node_id: impl Into<NodeId>, handle: Anchor) -> Self {
        Self {
            node_id: node_id.into(),
            handle,
        }
    }
}

/// Short centered caption on shapes and lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    pub color: String,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 14.0,
            color: "#000000".to_string(),
        }
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Discriminant of a node's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Rect,
    Circle,
    Text,
    Line,
    Freehand,
}

impl NodeType {
    /// Tag string used in the scene JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Rect => "rect",
            NodeType::Circle => "circle",
            NodeType::Text => "text",
            NodeType::Line => "line",
            NodeType::Freehand => "freehand",
        }
    }

    /// Look up a tag string; `None` for kinds this build does not know.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "rect" => Some(NodeType::Rect),
            "circle" => Some(NodeType::Circle),
            "text" => Some(NodeType::Text),
            "line" => Some(NodeType::Line),
            "freehand" => Some(NodeType::Freehand),
            _ => None,
        }
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    Rect(RectShape),
    Circle(CircleShape),
    Text(TextShape),
    Line(LineShape),
    Freehand(FreehandShape),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Rect(_) => NodeType::Rect,
            NodeKind::Circle(_) => NodeType::Circle,
            NodeKind::Text(_) => NodeType::Text,
            NodeKind::Line(_) => NodeType::Line,
            NodeKind::Freehand(_) => NodeType::Freehand,
        }
    }
}

/// A drawable entity in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Grouping parent. A lookup key, never an owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    /// Transient UI flag, never persisted.
    #[serde(skip)]
    pub selected: bool,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl SceneNode {
    /// Create a node with a freshly generated id.
    pub fn new(kind: NodeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        let id = new_node_id(kind.node_type().as_str());
        Self::with_id(id, kind, x, y, width, height)
    }

    /// Create a node with a specific id.
    pub fn with_id(id: impl Into<NodeId>, kind: NodeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            parent_id: None,
            selected: false,
            kind,
        }
    }

    /// Rectangle with default style.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(NodeKind::Rect(RectShape::default()), x, y, width, height)
    }

    /// Ellipse with default style inscribed in the given box.
    pub fn circle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(NodeKind::Circle(CircleShape::default()), x, y, width, height)
    }

    /// Text node; its size is estimated until the first render measures it.
    pub fn text(x: f64, y: f64, content: impl Into<String>) -> Self {
        let shape = TextShape::new(content);
        let size = shape.approximate_size();
        Self::new(NodeKind::Text(shape), x, y, size.width, size.height)
    }

    /// Line from `start` to `end`.
    pub fn line(start: Point, end: Point) -> Self {
        Self::new(
            NodeKind::Line(LineShape::default()),
            start.x,
            start.y,
            end.x - start.x,
            end.y - start.y,
        )
    }

    /// Freehand stroke through the given absolute points.
    pub fn freehand(points: &[Point], stroke: impl Into<String>, stroke_width: f64) -> Self {
        let shape = FreehandShape {
            points: Vec::new(),
            stroke: stroke.into(),
            stroke_width,
        };
        let mut node = Self::new(NodeKind::Freehand(shape), 0.0, 0.0, 0.0, 0.0);
        node.set_freehand_points(points);
        node
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn is_line(&self) -> bool {
        matches!(self.kind, NodeKind::Line(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Frame as stored: `(x, y, x + width, y + height)`, not normalized.
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Axis-aligned bounding box with non-negative extent.
    pub fn bounds(&self) -> Rect {
        self.frame().abs()
    }

    /// Live position of one of the 8 anchors.
    pub fn anchor(&self, anchor: Anchor) -> Point {
        anchor.point_in(self.frame())
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Move by a world-space delta. Relative geometry follows automatically.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Hit test in world coordinates.
    pub fn hit_test(&self, point: Point) -> bool {
        match &self.kind {
            NodeKind::Rect(_) | NodeKind::Circle(_) | NodeKind::Text(_) => {
                rect_contains(self.bounds(), point)
            }
            NodeKind::Line(_) => line::hit_test(self.line_start(), self.line_end(), point),
            NodeKind::Freehand(shape) => shape.hit_test(self.position(), self.bounds(), point),
        }
    }

    /// Paint the node. Text nodes update their size from measured metrics.
    pub fn paint(&mut self, painter: &mut dyn Painter) {
        let frame = self.frame();
        let selected = self.selected;
        match &self.kind {
            NodeKind::Rect(shape) => shape.paint(frame, selected, painter),
            NodeKind::Circle(shape) => shape.paint(frame, selected, painter),
            NodeKind::Text(shape) => {
                let size = shape.paint(self.position(), selected, painter);
                self.width = size.width;
                self.height = size.height;
            }
            NodeKind::Line(shape) => {
                shape.paint(self.line_start(), self.line_end(), selected, painter)
            }
            NodeKind::Freehand(shape) => shape.paint(self.position(), selected, painter),
        }
    }

    /// Start point of a line (the node origin).
    pub fn line_start(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End point of a line: origin plus extent.
    pub fn line_end(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Move a line's start, keeping its end in place.
    pub fn set_line_start(&mut self, point: Point) {
        let end = self.line_end();
        self.x = point.x;
        self.y = point.y;
        self.width = end.x - point.x;
        self.height = end.y - point.y;
    }

    /// Move a line's end, keeping its start in place.
    pub fn set_line_end(&mut self, point: Point) {
        self.width = point.x - self.x;
        self.height = point.y - self.y;
    }

    /// Replace a freehand node's points (absolute) and refit its bounds.
    ///
    /// No-op for other kinds.
    pub fn set_freehand_points(&mut self, points: &[Point]) {
        let NodeKind::Freehand(shape) = &mut self.kind else {
            return;
        };
        let Some(bounds) = freehand::bounds_of(points) else {
            shape.points.clear();
            self.width = 0.0;
            self.height = 0.0;
            return;
        };
        self.x = bounds.x0;
        self.y = bounds.y0;
        self.width = bounds.width();
        self.height = bounds.height();
        shape.points = points
            .iter()
            .map(|p| Point::new(p.x - bounds.x0, p.y - bounds.y0))
            .collect();
    }

    /// Absolute points of a freehand node.
    pub fn freehand_points(&self) -> Vec<Point> {
        match &self.kind {
            NodeKind::Freehand(shape) => shape
                .points
                .iter()
                .map(|p| Point::new(p.x + self.x, p.y + self.y))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Caption of a rect, circle or line.
    pub fn label(&self) -> Option<&Label> {
        match &self.kind {
            NodeKind::Rect(shape) => shape.label.as_ref(),
            NodeKind::Circle(shape) => shape.label.as_ref(),
            NodeKind::Line(shape) => shape.label.as_ref(),
            NodeKind::Text(_) | NodeKind::Freehand(_) => None,
        }
    }

    /// Set or clear the caption. Returns `false` for kinds without labels.
    pub fn set_label(&mut self, text: Option<String>) -> bool {
        let slot = match &mut self.kind {
            NodeKind::Rect(shape) => &mut shape.label,
            NodeKind::Circle(shape) => &mut shape.label,
            NodeKind::Line(shape) => &mut shape.label,
            NodeKind::Text(_) | NodeKind::Freehand(_) => return false,
        };
        match text {
            Some(text) => match slot {
                Some(label) => label.text = text,
                None => *slot = Some(Label::new(text)),
            },
            None => *slot = None,
        }
        true
    }

    pub fn as_line(&self) -> Option<&LineShape> {
        match &self.kind {
            NodeKind::Line(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_line_mut(&mut self) -> Option<&mut LineShape> {
        match &mut self.kind {
            NodeKind::Line(shape) => Some(shape),
            _ => None,
        }
    }
}

/// Inclusive point-in-rectangle test.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Whether two rectangles overlap (edges touching counts).
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Whether `inner` lies completely inside `outer`.
pub fn rect_contains_rect(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

/// Distance from a point to a line segment.
///
/// A zero-length segment degrades to the point distance.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}
