//! Freehand stroke shape.

use super::point_to_polyline_dist;
use crate::paint::{Painter, SELECTION_COLOR, parse_color};
use crate::shapes::line::LINE_HIT_TOLERANCE;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A stroke drawn with the freehand tool.
///
/// Points are stored relative to the owning node's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FreehandShape {
    pub points: Vec<Point>,
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for FreehandShape {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            stroke: "#000000".to_string(),
            stroke_width: 2.0,
        }
    }
}

impl FreehandShape {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scale relative points, e.g. after a resize.
    pub fn scale_points(&mut self, sx: f64, sy: f64) {
        for p in &mut self.points {
            p.x *= sx;
            p.y *= sy;
        }
    }

    pub(crate) fn hit_test(&self, origin: Point, bounds: Rect, point: Point) -> bool {
        let tolerance = LINE_HIT_TOLERANCE.max(self.stroke_width);
        let expanded = bounds.inflate(tolerance, tolerance);
        if point.x < expanded.x0 || point.x > expanded.x1 || point.y < expanded.y0 || point.y > expanded.y1 {
            return false;
        }
        let local = Point::new(point.x - origin.x, point.y - origin.y);
        point_to_polyline_dist(local, &self.points) <= tolerance
    }

    pub(crate) fn paint(&self, origin: Point, selected: bool, painter: &mut dyn Painter) {
        if self.points.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        for (i, p) in self.points.iter().enumerate() {
            let abs = Point::new(p.x + origin.x, p.y + origin.y);
            if i == 0 {
                path.move_to(abs);
            } else {
                path.line_to(abs);
            }
        }
        let color = if selected {
            SELECTION_COLOR
        } else {
            parse_color(&self.stroke)
        };
        painter.stroke_path(&path, color, self.stroke_width);
    }
}

/// Tight bounding box of a point set.
pub(crate) fn bounds_of(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut bounds = Rect::from_points(*first, *first);
    for p in &points[1..] {
        bounds = bounds.union_pt(*p);
    }
    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::SceneNode;

    #[test]
    fn test_bounds_of() {
        assert!(bounds_of(&[]).is_none());
        let b = bounds_of(&[Point::new(5.0, 1.0), Point::new(-2.0, 8.0)]).unwrap();
        assert_eq!(b, Rect::new(-2.0, 1.0, 5.0, 8.0));
    }

    #[test]
    fn test_hit_test_near_stroke() {
        let node = SceneNode::freehand(
            &[Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 100.0)],
            "#000000",
            2.0,
        );
        assert!(node.hit_test(Point::new(50.0, 4.0)));
        assert!(node.hit_test(Point::new(104.0, 50.0)));
        assert!(!node.hit_test(Point::new(50.0, 50.0)));
        assert!(!node.hit_test(Point::new(-20.0, 0.0)));
    }

    #[test]
    fn test_wide_stroke_extends_tolerance() {
        let node = SceneNode::freehand(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], "#000000", 10.0);
        assert!(node.hit_test(Point::new(50.0, 9.0)));
    }

    #[test]
    fn test_scale_points() {
        let mut shape = FreehandShape {
            points: vec![Point::new(10.0, 20.0)],
            ..FreehandShape::default()
        };
        shape.scale_points(2.0, 0.5);
        assert_eq!(shape.points[0], Point::new(20.0, 10.0));
    }
}
