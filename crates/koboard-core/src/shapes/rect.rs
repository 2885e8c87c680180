//! Rectangle shape.

use super::Label;
use crate::paint::{Painter, SELECTION_COLOR, fill_centered_lines, parse_color};
use kurbo::{Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Style of a rectangle node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectShape {
    pub fill: String,
    pub stroke: String,
    /// Corner radius (absent = sharp corners).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Default for RectShape {
    fn default() -> Self {
        Self {
            fill: "#ffffff".to_string(),
            stroke: "#000000".to_string(),
            corner_radius: None,
            label: None,
        }
    }
}

impl RectShape {
    pub(crate) fn paint(&self, frame: Rect, selected: bool, painter: &mut dyn Painter) {
        let rect = frame.abs();
        let path = match self.corner_radius {
            Some(radius) if radius > 0.0 => {
                let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
                RoundedRect::from_rect(rect, radius).to_path(0.1)
            }
            _ => rect.to_path(0.1),
        };
        painter.fill_path(&path, parse_color(&self.fill));
        if selected {
            painter.stroke_path(&path, SELECTION_COLOR, 2.0);
        } else {
            painter.stroke_path(&path, parse_color(&self.stroke), 1.0);
        }
        if let Some(label) = &self.label {
            fill_centered_lines(painter, &label.text, rect.center(), label.font_size, parse_color(&label.color));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::testing::{PaintOp, RecordingPainter};

    #[test]
    fn test_default_style() {
        let shape = RectShape::default();
        assert_eq!(shape.fill, "#ffffff");
        assert_eq!(shape.stroke, "#000000");
        assert!(shape.corner_radius.is_none());
    }

    #[test]
    fn test_paint_with_label() {
        let shape = RectShape {
            label: Some(Label::new("a\nb")),
            ..RectShape::default()
        };
        let mut painter = RecordingPainter::default();
        shape.paint(Rect::new(0.0, 0.0, 100.0, 50.0), false, &mut painter);
        assert_eq!(painter.ops[0], PaintOp::Fill);
        assert_eq!(painter.ops[1], PaintOp::Stroke(1.0));
        assert_eq!(painter.texts(), vec!["a", "b"]);
    }

    #[test]
    fn test_selected_outline_is_thicker() {
        let shape = RectShape {
            corner_radius: Some(8.0),
            ..RectShape::default()
        };
        let mut painter = RecordingPainter::default();
        shape.paint(Rect::new(0.0, 0.0, 10.0, 10.0), true, &mut painter);
        assert_eq!(painter.ops[1], PaintOp::Stroke(2.0));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let shape: RectShape = serde_json::from_str(r##"{"fill":"#ff0000"}"##).unwrap();
        assert_eq!(shape.fill, "#ff0000");
        assert_eq!(shape.stroke, "#000000");
    }
}
