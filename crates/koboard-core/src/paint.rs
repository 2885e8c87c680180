//! Painting abstraction consumed by scene rendering.
//!
//! The core never talks to a concrete surface. Anything that can fill and
//! stroke kurbo paths and lay out a line of text can display a scene.

use kurbo::{Affine, BezPath, Point, Size};
use peniko::Color;

/// Outline color used for selection feedback.
pub const SELECTION_COLOR: Color = Color::from_rgba8(0x00, 0x66, 0xcc, 0xff);

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Horizontal placement of a text run relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Origin is the top-left corner of the run.
    Start,
    /// Origin is the top-center of the run.
    Center,
}

/// A 2D drawing surface.
pub trait Painter {
    /// Set the transform applied to all following geometry.
    fn set_transform(&mut self, transform: Affine);

    /// Fill a closed path.
    fn fill_path(&mut self, path: &BezPath, color: Color);

    /// Stroke a path with the given width in world units.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);

    /// Draw a single line of text with its top edge at `origin.y`.
    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color, align: TextAlign);

    /// Measure a single line of text.
    fn measure_text(&mut self, text: &str, font_size: f64) -> Size {
        approximate_text_size(text, font_size)
    }
}

/// Metric-free estimate of a single text line.
pub fn approximate_text_size(text: &str, font_size: f64) -> Size {
    Size::new(
        text.chars().count() as f64 * font_size * 0.6,
        font_size * LINE_HEIGHT,
    )
}

/// Measure multi-line text: widest line by total height.
pub fn measure_lines(painter: &mut dyn Painter, text: &str, font_size: f64) -> Size {
    let mut width: f64 = 0.0;
    let mut lines = 0;
    for line in text.split('\n') {
        width = width.max(painter.measure_text(line, font_size).width);
        lines += 1;
    }
    Size::new(width, lines as f64 * font_size * LINE_HEIGHT)
}

/// Draw multi-line text centered on `center`.
pub fn fill_centered_lines(
    painter: &mut dyn Painter,
    text: &str,
    center: Point,
    font_size: f64,
    color: Color,
) {
    let line_height = font_size * LINE_HEIGHT;
    let count = text.split('\n').count() as f64;
    let top = center.y - count * line_height / 2.0;
    for (i, line) in text.split('\n').enumerate() {
        let origin = Point::new(center.x, top + i as f64 * line_height);
        painter.fill_text(line, origin, font_size, color, TextAlign::Center);
    }
}

/// Parse a CSS hex color like "#f00", "#ff0000" or "#ff000080".
///
/// "transparent" and "none" map to a fully transparent color. Anything that
/// cannot be parsed falls back to black.
pub fn parse_color(s: &str) -> Color {
    try_parse_color(s).unwrap_or(Color::from_rgba8(0, 0, 0, 255))
}

fn try_parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") || s.eq_ignore_ascii_case("none") {
        return Some(Color::from_rgba8(0, 0, 0, 0));
    }
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
    match hex.len() {
        3 => Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        6 => Some(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Some(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// One recorded paint call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum PaintOp {
        Fill,
        Stroke(f64),
        Text(String),
    }

    /// Painter double that records calls instead of drawing.
    #[derive(Debug, Default)]
    pub struct RecordingPainter {
        pub ops: Vec<PaintOp>,
        pub transform: Option<Affine>,
    }

    impl RecordingPainter {
        pub fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    PaintOp::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Painter for RecordingPainter {
        fn set_transform(&mut self, transform: Affine) {
            self.transform = Some(transform);
        }

        fn fill_path(&mut self, _path: &BezPath, _color: Color) {
            self.ops.push(PaintOp::Fill);
        }

        fn stroke_path(&mut self, _path: &BezPath, _color: Color, width: f64) {
            self.ops.push(PaintOp::Stroke(width));
        }

        fn fill_text(&mut self, text: &str, _origin: Point, _font_size: f64, _color: Color, _align: TextAlign) {
            self.ops.push(PaintOp::Text(text.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingPainter;
    use super::*;

    fn rgba(color: Color) -> [u8; 4] {
        let c = color.to_rgba8();
        [c.r, c.g, c.b, c.a]
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(rgba(parse_color("#ff8000")), [255, 128, 0, 255]);
        assert_eq!(rgba(parse_color("#f00")), [255, 0, 0, 255]);
        assert_eq!(rgba(parse_color("#00000080")), [0, 0, 0, 128]);
        assert_eq!(rgba(parse_color("transparent")), [0, 0, 0, 0]);
    }

    #[test]
    fn test_parse_invalid_falls_back_to_black() {
        assert_eq!(rgba(parse_color("chartreuse")), [0, 0, 0, 255]);
        assert_eq!(rgba(parse_color("#12")), [0, 0, 0, 255]);
        assert_eq!(rgba(parse_color("#gg0000")), [0, 0, 0, 255]);
    }

    #[test]
    fn test_measure_lines() {
        let mut painter = RecordingPainter::default();
        let size = measure_lines(&mut painter, "ab\nabcd", 10.0);
        assert!((size.width - 24.0).abs() < 1e-9);
        assert!((size.height - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_lines_draw_each_line() {
        let mut painter = RecordingPainter::default();
        fill_centered_lines(&mut painter, "one\ntwo", Point::ZERO, 12.0, parse_color("#000"));
        assert_eq!(painter.texts(), vec!["one", "two"]);
    }
}
