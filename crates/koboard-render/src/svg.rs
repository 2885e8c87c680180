//! Vector export: a [`Painter`] that writes SVG elements.

use crate::renderer::RenderOptions;
use koboard_core::paint::{Painter, TextAlign};
use koboard_core::scene::Scene;
use kurbo::{Affine, BezPath, Point, Rect, Shape};
use peniko::Color;
use std::fmt::Write;

/// Baseline offset from the top of a line, as a fraction of the font size.
const ASCENT: f64 = 0.8;

/// Collects painted geometry as SVG markup.
#[derive(Debug, Default)]
pub struct SvgPainter {
    transform: Affine,
    body: String,
}

impl SvgPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup painted so far, without the enclosing `<svg>` element.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    fn transform_attr(&self) -> String {
        if self.transform == Affine::IDENTITY {
            return String::new();
        }
        let [a, b, c, d, e, f] = self.transform.as_coeffs();
        format!(" transform=\"matrix({a} {b} {c} {d} {e} {f})\"")
    }
}

impl Painter for SvgPainter {
    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        let (fill, opacity) = svg_color(color);
        let _ = writeln!(
            self.body,
            "<path d=\"{}\" fill=\"{fill}\"{}{} stroke=\"none\"/>",
            path.to_svg(),
            opacity_attr("fill-opacity", opacity),
            self.transform_attr(),
        );
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        let (stroke, opacity) = svg_color(color);
        let _ = writeln!(
            self.body,
            "<path d=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{width}\"{} stroke-linecap=\"round\" stroke-linejoin=\"round\"{}/>",
            path.to_svg(),
            opacity_attr("stroke-opacity", opacity),
            self.transform_attr(),
        );
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color, align: TextAlign) {
        if text.is_empty() {
            return;
        }
        let (fill, opacity) = svg_color(color);
        let anchor = match align {
            TextAlign::Start => "start",
            TextAlign::Center => "middle",
        };
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"{font_size}\" fill=\"{fill}\"{} text-anchor=\"{anchor}\" xml:space=\"preserve\"{}>{}</text>",
            origin.x,
            origin.y + font_size * ASCENT,
            opacity_attr("fill-opacity", opacity),
            self.transform_attr(),
            escape_xml(text),
        );
    }
}

fn svg_color(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    (
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b),
        f64::from(rgba.a) / 255.0,
    )
}

fn opacity_attr(name: &str, opacity: f64) -> String {
    if opacity >= 1.0 {
        String::new()
    } else {
        format!(" {name}=\"{opacity:.3}\"")
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// World rectangle covered by an export: scene bounds plus padding.
pub fn export_bounds(scene: &Scene, options: &RenderOptions) -> Rect {
    let bounds = scene.bounds().unwrap_or(Rect::ZERO);
    let padding = options.padding.max(0.0);
    let rect = bounds.inflate(padding, padding);
    // Never produce an empty canvas.
    Rect::new(rect.x0, rect.y0, rect.x1.max(rect.x0 + 1.0), rect.y1.max(rect.y0 + 1.0))
}

/// Render the whole scene as a standalone SVG document.
///
/// Selection state is not drawn.
pub fn export_svg(scene: &Scene, options: &RenderOptions) -> String {
    let view = export_bounds(scene, options);
    let mut scene = scene.clone();
    scene.clear_selection();

    let mut painter = SvgPainter::new();
    if options.background.to_rgba8().a > 0 {
        painter.fill_path(&Rect::from_origin_size(Point::ZERO, view.size()).to_path(0.1), options.background);
    }
    painter.set_transform(Affine::translate((-view.x0, -view.y0)));
    scene.render(&mut painter, None);
    log::debug!("Exported {} nodes to SVG", scene.len());

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{}</svg>\n",
        painter.into_body(),
        w = view.width(),
        h = view.height(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use koboard_core::shapes::SceneNode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_color_conversion() {
        assert_eq!(svg_color(Color::from_rgba8(0, 102, 204, 255)), ("#0066cc".to_string(), 1.0));
        let (_, alpha) = svg_color(Color::from_rgba8(0, 0, 0, 0));
        assert!(alpha.abs() < f64::EPSILON);
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_export_bounds_pad_scene() {
        let mut scene = Scene::new();
        scene.add_node(SceneNode::rect(10.0, 20.0, 100.0, 50.0)).unwrap();
        let bounds = export_bounds(&scene, &RenderOptions::default());
        assert_eq!(bounds, Rect::new(-10.0, 0.0, 130.0, 90.0));
    }

    #[test]
    fn test_empty_scene_exports_blank_canvas() {
        let svg = export_svg(&Scene::new(), &RenderOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("width=\"40\""));
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn test_export_contains_shapes_and_labels() {
        let mut scene = Scene::new();
        let mut rect = SceneNode::rect(0.0, 0.0, 100.0, 40.0);
        rect.set_label(Some("Start & go".to_string()));
        rect.selected = true;
        scene.add_node(rect).unwrap();
        scene.add_node(SceneNode::text(0.0, 60.0, "Hello")).unwrap();

        let svg = export_svg(&scene, &RenderOptions::default());
        assert!(svg.contains("Start &amp; go"));
        assert!(svg.contains(">Hello</text>"));
        assert!(svg.contains("matrix(1 0 0 1 20 20)"));
        // Selection outline is not exported.
        assert!(!svg.contains("#0066cc"));
    }
}
