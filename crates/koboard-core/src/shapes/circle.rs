//! Ellipse shape.

use super::Label;
use crate::paint::{Painter, SELECTION_COLOR, fill_centered_lines, parse_color};
use kurbo::{Ellipse, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Style of an ellipse node, inscribed in the node's box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircleShape {
    pub fill: String,
    pub stroke: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl Default for CircleShape {
    fn default() -> Self {
        Self {
            fill: "#ffffff".to_string(),
            stroke: "#000000".to_string(),
            label: None,
        }
    }
}

impl CircleShape {
    pub(crate) fn paint(&self, frame: Rect, selected: bool, painter: &mut dyn Painter) {
        let rect = frame.abs();
        let path = Ellipse::from_rect(rect).to_path(0.1);
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
    fn test_paint_ellipse() {
        let mut painter = RecordingPainter::default();
        CircleShape::default().paint(Rect::new(0.0, 0.0, 40.0, 20.0), false, &mut painter);
        assert_eq!(painter.ops, vec![PaintOp::Fill, PaintOp::Stroke(1.0)]);
    }
}
