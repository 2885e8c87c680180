//! Text shape.

use crate::paint::{LINE_HEIGHT, Painter, SELECTION_COLOR, TextAlign, approximate_text_size, measure_lines, parse_color};
use kurbo::{Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Multi-line text body. The owning node's size is derived from measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextShape {
    pub text: String,
    pub font_size: f64,
    pub color: String,
}

impl Default for TextShape {
    fn default() -> Self {
        Self {
            text: "Hello".to_string(),
            font_size: 16.0,
            color: "#000000".to_string(),
        }
    }
}

impl TextShape {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Size estimate used before any painter has measured the text.
    pub fn approximate_size(&self) -> Size {
        let mut width: f64 = 0.0;
        let mut lines = 0;
        for line in self.text.split('\n') {
            width = width.max(approximate_text_size(line, self.font_size).width);
            lines += 1;
        }
        Size::new(width, lines as f64 * self.font_size * LINE_HEIGHT)
    }

    /// Paint top-aligned lines and return the measured size.
    pub(crate) fn paint(&self, origin: Point, selected: bool, painter: &mut dyn Painter) -> Size {
        let size = measure_lines(painter, &self.text, self.font_size);
        let color = parse_color(&self.color);
        let line_height = self.font_size * LINE_HEIGHT;
        for (i, line) in self.text.split('\n').enumerate() {
            let line_origin = Point::new(origin.x, origin.y + i as f64 * line_height);
            painter.fill_text(line, line_origin, self.font_size, color, TextAlign::Start);
        }
        if selected {
            let outline = Rect::from_origin_size(origin, size).inflate(2.0, 2.0);
            painter.stroke_path(&outline.to_path(0.1), SELECTION_COLOR, 1.0);
        }
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::testing::RecordingPainter;

    #[test]
    fn test_approximate_size() {
        let shape = TextShape {
            text: "abc\nab".to_string(),
            font_size: 10.0,
            color: "#000".to_string(),
        };
        let size = shape.approximate_size();
        assert!((size.width - 18.0).abs() < 1e-9);
        assert!((size.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_paint_returns_measured_size() {
        let shape = TextShape::new("one\ntwo\nthree");
        let mut painter = RecordingPainter::default();
        let size = shape.paint(Point::ZERO, false, &mut painter);
        assert_eq!(painter.texts(), vec!["one", "two", "three"]);
        assert!((size.height - 3.0 * 16.0 * LINE_HEIGHT).abs() < 1e-9);
    }
}
