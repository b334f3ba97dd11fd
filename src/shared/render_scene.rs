//! Render-Szene als expliziter Übergabevertrag zwischen App und Renderer.
//!
//! Lebt im shared-Modul, da `app` sie baut und ein externer Renderer sie
//! konsumiert. Die Szene ist ein Schnappschuss: der Renderer kann die
//! World darüber nicht verändern.

use crate::core::path::format_number;
use crate::core::{Camera, Color, Coordinates, PointId, PointType, RenderHints, ShapeId};
use glam::DAffine2;
use std::fmt::Write;

/// Radius gezeichneter Punkte in Bildschirm-Pixeln.
const POINT_RADIUS_PX: f64 = 3.0;
/// Rand um den Inhalt, wenn kein Viewport bekannt ist.
const CONTENT_MARGIN: f64 = 10.0;

/// Eine Form mit aufgelöstem Pfad.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderShape {
    pub id: ShapeId,
    pub path: String,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    pub hints: RenderHints,
    /// Achsenparallele Hülle `(min, max)` in Weltkoordinaten
    pub bounds: (Coordinates, Coordinates),
    /// Vom aktiven Werkzeug hervorgehoben
    pub highlighted: bool,
    /// Während einer Vorschau-Transformation mitbewegt
    pub transformed: bool,
}

/// Ein sichtbarer Punkt.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPoint {
    pub id: PointId,
    pub coordinates: Coordinates,
    pub point_type: PointType,
    pub color: Color,
}

/// Werkzeug-Vorschau (nur Darstellung, nie Teil der Historie).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewLayer {
    /// Zusätzliche Geister-Pfade (Kopie, neue Vorlage)
    pub paths: Vec<String>,
    /// Affine Abbildung für die Formen mit `transformed`
    pub transform: Option<DAffine2>,
    /// Markierungen (Zentrum, Achse, Zeiger)
    pub markers: Vec<Coordinates>,
}

/// Read-only Daten für einen Render-Frame.
#[derive(Debug, Clone)]
pub struct RenderScene {
    /// Kamera-Zustand für diesen Frame
    pub camera: Camera,
    /// Viewport-Größe in Pixeln [Breite, Höhe]
    pub viewport_size: [f64; 2],
    /// Formen in Zeichenreihenfolge (unterste zuerst)
    pub shapes: Vec<RenderShape>,
    pub points: Vec<RenderPoint>,
    pub preview: PreviewLayer,
    pub status_message: Option<String>,
}

impl RenderScene {
    /// Gibt zurück, ob etwas zu zeichnen ist.
    pub fn has_content(&self) -> bool {
        !self.shapes.is_empty() || !self.points.is_empty() || !self.preview.paths.is_empty()
    }

    /// Sichtbarer Weltausschnitt `(min, größe)`.
    ///
    /// Mit bekanntem Viewport der Kamera-Ausschnitt, sonst die Ausdehnung
    /// aller Punkte und Formen plus Rand.
    pub fn view_box(&self) -> (Coordinates, Coordinates) {
        let [width, height] = self.viewport_size;
        if width > 0.0 && height > 0.0 {
            let size = Coordinates::new(width / self.camera.zoom, height / self.camera.zoom);
            return (self.camera.position - size * 0.5, size);
        }
        let mut min = Coordinates::new(f64::INFINITY, f64::INFINITY);
        let mut max = Coordinates::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in self
            .shapes
            .iter()
            .flat_map(|s| [s.bounds.0, s.bounds.1])
            .chain(self.points.iter().map(|p| p.coordinates))
            .chain(self.preview.markers.iter().copied())
        {
            min = Coordinates::new(min.x.min(p.x), min.y.min(p.y));
            max = Coordinates::new(max.x.max(p.x), max.y.max(p.y));
        }
        if !min.x.is_finite() || !max.x.is_finite() {
            return (
                Coordinates::new(-CONTENT_MARGIN, -CONTENT_MARGIN),
                Coordinates::new(2.0 * CONTENT_MARGIN, 2.0 * CONTENT_MARGIN),
            );
        }
        let margin = Coordinates::new(CONTENT_MARGIN, CONTENT_MARGIN);
        (min - margin, max - min + margin * 2.0)
    }

    /// Die Szene als eigenständiges SVG-Dokument.
    pub fn to_svg(&self) -> String {
        let (origin, size) = self.view_box();
        let point_radius = POINT_RADIUS_PX / self.camera.zoom.max(f64::EPSILON);
        let mut svg = String::new();
        // Schreiben in einen String kann nicht fehlschlagen
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">"#,
            format_number(origin.x),
            format_number(origin.y),
            format_number(size.x),
            format_number(size.y)
        );
        if self.shapes.iter().any(|s| s.hints.arrow_head) {
            svg.push_str(concat!(
                r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" "#,
                r#"markerWidth="6" markerHeight="6" orient="auto-start-reverse">"#,
                r#"<path d="M 0 0 L 10 5 L 0 10 Z"/></marker></defs>"#,
                "\n"
            ));
        }

        for shape in &self.shapes {
            if shape.path.is_empty() {
                continue;
            }
            let _ = write!(svg, r#"<path d="{}""#, shape.path);
            if shape.hints.filled {
                let _ = write!(
                    svg,
                    r#" fill="{}" fill-opacity="{}""#,
                    shape.fill_color,
                    format_number(shape.fill_opacity)
                );
            } else {
                svg.push_str(r#" fill="none""#);
            }
            let _ = write!(
                svg,
                r#" stroke="{}" stroke-width="{}""#,
                shape.stroke_color,
                format_number(shape.stroke_width)
            );
            if shape.hints.dashed {
                svg.push_str(r#" stroke-dasharray="4 2""#);
            }
            if shape.hints.arrow_head {
                svg.push_str(r#" marker-end="url(#arrow)""#);
            }
            if shape.highlighted {
                svg.push_str(r#" class="highlighted""#);
            }
            if let Some(transform) = self.preview.transform.filter(|_| shape.transformed) {
                let _ = write!(svg, r#" transform="{}""#, svg_matrix(&transform));
            }
            svg.push_str("/>\n");
        }

        for point in &self.points {
            let _ = writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                format_number(point.coordinates.x),
                format_number(point.coordinates.y),
                format_number(point_radius),
                point.color
            );
        }

        for path in &self.preview.paths {
            let _ = writeln!(
                svg,
                r#"<path d="{}" fill="none" stroke="{}" stroke-dasharray="2 2"/>"#,
                path,
                Color::BLACK
            );
        }
        for marker in &self.preview.markers {
            let _ = writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}"/>"#,
                format_number(marker.x),
                format_number(marker.y),
                format_number(point_radius * 1.5),
                Color::BLACK
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// `matrix(a b c d e f)` einer affinen Abbildung.
fn svg_matrix(transform: &DAffine2) -> String {
    let m = transform.matrix2;
    let t = transform.translation;
    format!(
        "matrix({} {} {} {} {} {})",
        format_number(m.x_axis.x),
        format_number(m.x_axis.y),
        format_number(m.y_axis.x),
        format_number(m.y_axis.y),
        format_number(t.x),
        format_number(t.y)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn square() -> RenderShape {
        RenderShape {
            id: ShapeId(1),
            path: "M 0 0 L 10 0 L 10 10 L 0 10 Z".into(),
            fill_color: Color::rgb(0xff, 0, 0),
            fill_opacity: 0.5,
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            hints: RenderHints {
                filled: true,
                ..RenderHints::default()
            },
            bounds: (Coordinates::new(0.0, 0.0), Coordinates::new(10.0, 10.0)),
            highlighted: false,
            transformed: false,
        }
    }

    fn scene(shapes: Vec<RenderShape>) -> RenderScene {
        RenderScene {
            camera: Camera::new(),
            viewport_size: [0.0, 0.0],
            shapes,
            points: Vec::new(),
            preview: PreviewLayer::default(),
            status_message: None,
        }
    }

    #[test]
    fn filled_shape_carries_colors() {
        let svg = scene(vec![square()]).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"d="M 0 0 L 10 0 L 10 10 L 0 10 Z""#));
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.5""##));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn open_arrow_line_is_unfilled_with_marker() {
        let mut line = square();
        line.path = "M 0 0 L 10 0".into();
        line.hints = RenderHints {
            arrow_head: true,
            ..RenderHints::default()
        };
        let svg = scene(vec![line]).to_svg();
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"marker-end="url(#arrow)""#));
        assert!(svg.contains("<marker"));
    }

    #[test]
    fn preview_transform_only_on_transformed_shapes() {
        let mut moving = square();
        moving.transformed = true;
        let mut s = scene(vec![square(), moving]);
        s.preview.transform = Some(DAffine2::from_translation(DVec2::new(5.0, -2.0)));
        let svg = s.to_svg();
        assert_eq!(svg.matches("transform=").count(), 1);
        assert!(svg.contains("matrix(1 0 0 1 5 -2)"));
    }

    #[test]
    fn view_box_without_viewport_wraps_content() {
        let (origin, size) = scene(vec![square()]).view_box();
        assert_eq!(origin, Coordinates::new(-10.0, -10.0));
        assert_eq!(size, Coordinates::new(30.0, 30.0));
    }

    #[test]
    fn viewport_defines_view_box() {
        let mut s = scene(vec![]);
        s.viewport_size = [200.0, 100.0];
        s.camera.zoom = 2.0;
        s.camera.position = Coordinates::new(10.0, 10.0);
        let (origin, size) = s.view_box();
        assert_eq!(origin, Coordinates::new(-40.0, -15.0));
        assert_eq!(size, Coordinates::new(100.0, 50.0));
    }
}
