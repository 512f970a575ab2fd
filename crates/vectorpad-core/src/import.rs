//! SVG import: parse a foreign document into normalized shape records.
//!
//! One malformed element never aborts an import: the element is skipped
//! with a warning and the rest of the document is processed. Only a
//! structurally broken document, or one yielding zero usable shapes,
//! fails the operation.

use crate::shapes::{
    Circle, Line, Rect, Shape, ShapeStyle, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
    clamp_stroke_width,
};
use kurbo::{Point, Rect as KurboRect};
use std::path::Path;
use thiserror::Error;

/// Minimum bounding-box extent. A degenerate (zero or negative) extent is
/// widened to this so later scale-to-fit math never divides by zero.
pub const MIN_EXTENT: f64 = 10.0;

/// Import errors.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("document contains no supported shapes")]
    NoSupportedShapes,
    #[error("could not read file: {0}")]
    IOFailure(String),
}

/// The normalized result of parsing a foreign document: shapes in the
/// document's own coordinate space plus their aggregate bounding box.
#[derive(Debug, Clone)]
pub struct ImportedGeometry {
    /// Parsed shapes, in document order.
    pub shapes: Vec<Shape>,
    /// Bounding-box top-left (minimum x/y over all shapes).
    pub origin: Point,
    /// Bounding-box width, at least [`MIN_EXTENT`].
    pub width: f64,
    /// Bounding-box height, at least [`MIN_EXTENT`].
    pub height: f64,
    /// Number of recognized elements dropped with a warning.
    pub skipped: usize,
}

/// Attribute schema entry: a geometric field with an optional default.
/// Fields without a default are required; an element missing one is skipped.
struct AttrSpec {
    name: &'static str,
    default: Option<f64>,
}

const LINE_ATTRS: &[AttrSpec] = &[
    AttrSpec { name: "x1", default: None },
    AttrSpec { name: "y1", default: None },
    AttrSpec { name: "x2", default: None },
    AttrSpec { name: "y2", default: None },
];

const RECT_ATTRS: &[AttrSpec] = &[
    AttrSpec { name: "x", default: Some(0.0) },
    AttrSpec { name: "y", default: Some(0.0) },
    AttrSpec { name: "width", default: None },
    AttrSpec { name: "height", default: None },
];

const CIRCLE_ATTRS: &[AttrSpec] = &[
    AttrSpec { name: "cx", default: Some(0.0) },
    AttrSpec { name: "cy", default: Some(0.0) },
    AttrSpec { name: "r", default: Some(0.0) },
];

/// Parse an SVG document into an [`ImportedGeometry`].
pub fn parse(text: &str) -> Result<ImportedGeometry, ImportError> {
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| ImportError::MalformedDocument(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ImportError::MalformedDocument(format!(
            "root element is <{}>, expected <svg>",
            root.tag_name().name()
        )));
    }

    let root_size = root_size(root);
    let mut shapes = Vec::new();
    let mut skipped = 0usize;
    collect_shapes(root, root_size, true, &mut shapes, &mut skipped);

    if shapes.is_empty() {
        return Err(ImportError::NoSupportedShapes);
    }

    let mut bounds: Option<KurboRect> = None;
    for shape in &shapes {
        let b = shape.bounds();
        bounds = Some(match bounds {
            Some(acc) => acc.union(b),
            None => b,
        });
    }
    let bounds = bounds.unwrap_or(KurboRect::ZERO);

    let width = (bounds.x1 - bounds.x0).max(0.0);
    let height = (bounds.y1 - bounds.y0).max(0.0);
    Ok(ImportedGeometry {
        shapes,
        origin: Point::new(bounds.x0, bounds.y0),
        width: if width <= 0.0 { MIN_EXTENT } else { width },
        height: if height <= 0.0 { MIN_EXTENT } else { height },
        skipped,
    })
}

/// Read a document from disk and parse it.
pub fn load_path(path: impl AsRef<Path>) -> Result<ImportedGeometry, ImportError> {
    let path = path.as_ref();
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if !is_svg {
        return Err(ImportError::IOFailure(format!(
            "{} is not an SVG file",
            path.display()
        )));
    }
    let text =
        std::fs::read_to_string(path).map_err(|e| ImportError::IOFailure(e.to_string()))?;
    parse(&text)
}

/// Walk an element's children, recursing through groups. Group nesting is
/// flattened: children contribute to the same list, groups themselves are
/// not modeled.
fn collect_shapes(
    parent: roxmltree::Node,
    root_size: Option<(f64, f64)>,
    at_root: bool,
    shapes: &mut Vec<Shape>,
    skipped: &mut usize,
) {
    for node in parent.children().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "g" => collect_shapes(node, root_size, false, shapes, skipped),
            "line" => match parse_line(node) {
                Ok(shape) => shapes.push(shape),
                Err(reason) => {
                    log::warn!("skipping <line>: {reason}");
                    *skipped += 1;
                }
            },
            "rect" => {
                if at_root && is_page_background(node, root_size) {
                    log::debug!("skipping page background rect");
                    continue;
                }
                match parse_rect(node) {
                    Ok(shape) => shapes.push(shape),
                    Err(reason) => {
                        log::warn!("skipping <rect>: {reason}");
                        *skipped += 1;
                    }
                }
            }
            "circle" => match parse_circle(node) {
                Ok(shape) => shapes.push(shape),
                Err(reason) => {
                    log::warn!("skipping <circle>: {reason}");
                    *skipped += 1;
                }
            },
            other => {
                log::debug!("ignoring unsupported element <{other}>");
            }
        }
    }
}

fn parse_line(node: roxmltree::Node) -> Result<Shape, String> {
    let v = read_attrs(node, LINE_ATTRS)?;
    let mut line = Line::new(Point::new(v[0], v[1]), Point::new(v[2], v[3]));
    line.style = read_style(node);
    Ok(Shape::Line(line))
}

fn parse_rect(node: roxmltree::Node) -> Result<Shape, String> {
    let v = read_attrs(node, RECT_ATTRS)?;
    let mut rect = Rect::new(Point::new(v[0], v[1]), v[2], v[3]);
    rect.style = read_style(node);
    Ok(Shape::Rect(rect))
}

fn parse_circle(node: roxmltree::Node) -> Result<Shape, String> {
    let v = read_attrs(node, CIRCLE_ATTRS)?;
    if v[2] < 0.0 {
        return Err(format!("negative radius {}", v[2]));
    }
    let mut circle = Circle::new(Point::new(v[0], v[1]), v[2]);
    circle.style = read_style(node);
    Ok(Shape::Circle(circle))
}

/// Evaluate an element's attribute schema: defaults fill in absent
/// defaulted fields, a missing or unparsable required field fails the
/// element.
fn read_attrs(node: roxmltree::Node, specs: &[AttrSpec]) -> Result<Vec<f64>, String> {
    specs
        .iter()
        .map(|spec| match parse_length(node.attribute(spec.name)) {
            Some(value) => Ok(value),
            None => spec
                .default
                .ok_or_else(|| format!("missing attribute {}", spec.name)),
        })
        .collect()
}

/// Read presentation attributes, falling back to the drawing defaults.
fn read_style(node: roxmltree::Node) -> ShapeStyle {
    let stroke_color = node
        .attribute("stroke")
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "none")
        .unwrap_or(DEFAULT_STROKE_COLOR)
        .to_string();
    let stroke_width = parse_length(node.attribute("stroke-width"))
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_STROKE_WIDTH);
    ShapeStyle {
        stroke_color,
        stroke_width: clamp_stroke_width(stroke_width),
    }
}

/// Parse a numeric attribute, tolerating a `px` unit suffix.
fn parse_length(value: Option<&str>) -> Option<f64> {
    let value = value?.trim();
    let value = value.strip_suffix("px").unwrap_or(value).trim();
    value.parse().ok()
}

fn root_size(root: roxmltree::Node) -> Option<(f64, f64)> {
    let width = parse_length(root.attribute("width"))?;
    let height = parse_length(root.attribute("height"))?;
    Some((width, height))
}

/// Detect the page background: a filled, stroke-less rect at the document
/// origin covering the root's full extent. Skipped so that an exported
/// drawing reimports shape-for-shape.
fn is_page_background(node: roxmltree::Node, root_size: Option<(f64, f64)>) -> bool {
    let Some((root_w, root_h)) = root_size else {
        return false;
    };
    if node.attribute("stroke").is_some() {
        return false;
    }
    let filled = node
        .attribute("fill")
        .is_some_and(|f| f != "none" && f != "transparent");
    if !filled {
        return false;
    }
    let x = parse_length(node.attribute("x")).unwrap_or(0.0);
    let y = parse_length(node.attribute("y")).unwrap_or(0.0);
    let w = parse_length(node.attribute("width")).unwrap_or(0.0);
    let h = parse_length(node.attribute("height")).unwrap_or(0.0);
    x == 0.0 && y == 0.0 && w == root_w && h == root_h
}
