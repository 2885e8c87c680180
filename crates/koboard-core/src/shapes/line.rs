//! Line / connector shape.

use super::{Label, LineBinding, point_to_segment_dist};
use crate::paint::{Painter, SELECTION_COLOR, fill_centered_lines, measure_lines, parse_color};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Maximum distance in world units for a point to hit a line.
pub const LINE_HIT_TOLERANCE: f64 = 6.0;

const ARROW_LENGTH: f64 = 12.0;
const ARROW_HALF_WIDTH: f64 = 5.0;

/// Which end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnd {
    Start,
    End,
}

/// Style and connectivity of a line node.
///
/// The line runs from the node origin to `(x + width, y + height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineShape {
    pub stroke: String,
    pub line_width: f64,
    pub start_arrow: bool,
    pub end_arrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_binding: Option<LineBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_binding: Option<LineBinding>,
}

impl Default for LineShape {
    fn default() -> Self {
        Self {
            stroke: "#000000".to_string(),
            line_width: 2.0,
            start_arrow: false,
            end_arrow: false,
            label: None,
            start_binding: None,
            end_binding: None,
        }
    }
}

impl LineShape {
    pub fn binding(&self, end: LineEnd) -> Option<&LineBinding> {
        match end {
            LineEnd::Start => self.start_binding.as_ref(),
            LineEnd::End => self.end_binding.as_ref(),
        }
    }

    pub fn set_binding(&mut self, end: LineEnd, binding: Option<LineBinding>) {
        match end {
            LineEnd::Start => self.start_binding = binding,
            LineEnd::End => self.end_binding = binding,
        }
    }

    pub(crate) fn paint(&self, start: Point, end: Point, selected: bool, painter: &mut dyn Painter) {
        let color = if selected {
            SELECTION_COLOR
        } else {
            parse_color(&self.stroke)
        };

        let mut path = BezPath::new();
        path.move_to(start);
        path.line_to(end);
        painter.stroke_path(&path, color, self.line_width);

        if self.end_arrow {
            if let Some(head) = arrow_head(start, end) {
                painter.fill_path(&head, color);
            }
        }
        if self.start_arrow {
            if let Some(head) = arrow_head(end, start) {
                painter.fill_path(&head, color);
            }
        }

        if let Some(label) = &self.label {
            if !label.text.is_empty() {
                let mid = start.midpoint(end);
                let size = measure_lines(painter, &label.text, label.font_size);
                let backdrop = Rect::from_center_size(mid, size).inflate(4.0, 2.0);
                painter.fill_path(&backdrop.to_path(0.1), parse_color("#ffffff"));
                fill_centered_lines(painter, &label.text, mid, label.font_size, parse_color(&label.color));
            }
        }
    }
}

/// Hit test against the segment with a fixed tolerance.
pub(crate) fn hit_test(start: Point, end: Point, point: Point) -> bool {
    point_to_segment_dist(point, start, end) <= LINE_HIT_TOLERANCE
}

/// Filled triangle pointing at `tip`, coming from `from`.
fn arrow_head(from: Point, tip: Point) -> Option<BezPath> {
    let dir = tip - from;
    let len = dir.hypot();
    if len < f64::EPSILON {
        return None;
    }
    let unit = dir / len;
    let normal = Vec2::new(-unit.y, unit.x);
    let base = tip - unit * ARROW_LENGTH;

    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal * ARROW_HALF_WIDTH);
    path.line_to(base - normal * ARROW_HALF_WIDTH);
    path.close_path();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::testing::{PaintOp, RecordingPainter};
    use crate::shapes::Anchor;

    #[test]
    fn test_hit_within_tolerance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(hit_test(a, b, Point::new(50.0, 6.0)));
        assert!(!hit_test(a, b, Point::new(50.0, 6.5)));
        assert!(!hit_test(a, b, Point::new(110.0, 0.0)));
    }

    #[test]
    fn test_degenerate_line_hit() {
        let a = Point::new(10.0, 10.0);
        assert!(hit_test(a, a, Point::new(13.0, 14.0)));
        assert!(!hit_test(a, a, Point::new(20.0, 20.0)));
    }

    #[test]
    fn test_bindings() {
        let mut shape = LineShape::default();
        shape.set_binding(LineEnd::End, Some(LineBinding::new("r1", Anchor::E)));
        assert_eq!(shape.binding(LineEnd::End).map(|b| b.handle), Some(Anchor::E));
        assert!(shape.binding(LineEnd::Start).is_none());
    }

    #[test]
    fn test_paint_arrows() {
        let shape = LineShape {
            start_arrow: true,
            end_arrow: true,
            ..LineShape::default()
        };
        let mut painter = RecordingPainter::default();
        shape.paint(Point::ZERO, Point::new(50.0, 0.0), false, &mut painter);
        assert_eq!(painter.ops, vec![PaintOp::Stroke(2.0), PaintOp::Fill, PaintOp::Fill]);
    }

    #[test]
    fn test_serialized_binding_shape() {
        let shape = LineShape {
            end_binding: Some(LineBinding::new("r1", Anchor::Sw)),
            ..LineShape::default()
        };
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["endBinding"], serde_json::json!({"nodeId": "r1", "handle": "sw"}));
        assert_eq!(value["lineWidth"], 2.0);
    }
}
