//! SVG export: serialize the scene back into a vector document.

use crate::scene::Scene;
use crate::shapes::Shape;
use std::fmt::Write as _;
use std::path::Path;

/// Background fill of the exported canvas.
const BACKGROUND_FILL: &str = "#ffffff";

/// Serialize the scene into an SVG document.
///
/// Pure: identical scene and canvas size produce byte-identical output.
/// Shapes are emitted in z-order after a full-canvas background rect;
/// rectangles are normalized here to non-negative extent so every emitted
/// element is valid.
pub fn serialize(scene: &Scene, canvas_width: f64, canvas_height: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas_width,
        h = canvas_height,
    );
    let _ = writeln!(
        out,
        r#"  <rect x="0" y="0" width="{w}" height="{h}" fill="{fill}"/>"#,
        w = canvas_width,
        h = canvas_height,
        fill = BACKGROUND_FILL,
    );

    for shape in scene.shapes_ordered() {
        let stroke = escape_xml(&shape.style().stroke_color);
        let width = shape.style().stroke_width;
        match shape {
            Shape::Line(line) => {
                let _ = writeln!(
                    out,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                    line.start.x, line.start.y, line.end.x, line.end.y, stroke, width,
                );
            }
            Shape::Rect(rect) => {
                let norm = rect.normalized();
                let _ = writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                    norm.x0,
                    norm.y0,
                    norm.width(),
                    norm.height(),
                    stroke,
                    width,
                );
            }
            Shape::Circle(circle) => {
                let _ = writeln!(
                    out,
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                    circle.center.x, circle.center.y, circle.radius, stroke, width,
                );
            }
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Write an exported document to disk (the download sink for native hosts).
pub fn write_path(path: impl AsRef<Path>, document: &str) -> std::io::Result<()> {
    std::fs::write(path, document)
}

/// Escape a string for use inside an XML attribute value.
fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import;
    use crate::shapes::{Circle, Line, Rect as RectShape, Shape, ShapeStyle};
    use kurbo::Point;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
        )));
        scene.add_shape(Shape::Rect(RectShape::new(Point::new(20.0, 20.0), 60.0, 40.0)));
        scene.add_shape(Shape::Circle(Circle::new(Point::new(50.0, 50.0), 25.0)));
        scene
    }

    #[test]
    fn test_deterministic_output() {
        let scene = sample_scene();
        let a = serialize(&scene, 800.0, 600.0);
        let b = serialize(&scene, 800.0, 600.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_document_structure() {
        let svg = serialize(&sample_scene(), 800.0, 600.0);
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"viewBox="0 0 800 600""#));
        assert!(svg.contains(r##"<rect x="0" y="0" width="800" height="600" fill="#ffffff"/>"##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_line_has_no_fill() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Line(Line::new(Point::ZERO, Point::new(10.0, 0.0))));
        let svg = serialize(&scene, 100.0, 100.0);
        let line = svg.lines().find(|l| l.contains("<line")).unwrap();
        assert!(!line.contains("fill"));
        assert!(line.contains(r##"stroke="#000000""##));
        assert!(line.contains(r#"stroke-width="2""#));
    }

    #[test]
    fn test_negative_rect_normalized_at_export() {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Rect(RectShape::new(Point::new(10.0, 10.0), -5.0, 20.0)));
        let svg = serialize(&scene, 100.0, 100.0);
        assert!(svg.contains(r#"<rect x="5" y="10" width="5" height="20" fill="none""#));
    }

    #[test]
    fn test_color_escaped() {
        let mut scene = Scene::new();
        let mut line = Line::new(Point::ZERO, Point::new(10.0, 0.0));
        line.style = ShapeStyle::new("a&b", 2.0);
        scene.add_shape(Shape::Line(line));
        let svg = serialize(&scene, 100.0, 100.0);
        assert!(svg.contains(r#"stroke="a&amp;b""#));
    }

    #[test]
    fn test_export_reimport_round_trip() {
        let scene = sample_scene();
        let svg = serialize(&scene, 800.0, 600.0);

        let geometry = import::parse(&svg).unwrap();
        assert_eq!(geometry.shapes.len(), scene.len());

        for (exported, reimported) in scene.shapes_ordered().zip(&geometry.shapes) {
            let (a, b) = (exported.bounds(), reimported.bounds());
            assert!((a.x0 - b.x0).abs() < 1e-9);
            assert!((a.y0 - b.y0).abs() < 1e-9);
            assert!((a.x1 - b.x1).abs() < 1e-9);
            assert!((a.y1 - b.y1).abs() < 1e-9);
            assert_eq!(exported.style().stroke_color, reimported.style().stroke_color);
        }
    }

    #[test]
    fn test_write_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawing.svg");
        let svg = serialize(&sample_scene(), 800.0, 600.0);

        write_path(&path, &svg).unwrap();
        let read_back = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read_back, svg);
    }
}
