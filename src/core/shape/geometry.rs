//! Aufgelöste Form-Geometrie: Pfad, Enthaltensein, Überlappung.

use super::{RenderHints, ShapeKind};
use crate::core::coordinates::COINCIDENCE_EPSILON;
use crate::core::path::{format_number, geometries_to_path};
use crate::core::segment::SegmentGeometry;
use crate::core::Coordinates;

/// Wertetyp mit den aufgelösten Segmenten (und freien Punkten) einer Form.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeGeometry {
    pub kind: ShapeKind,
    pub segments: Vec<SegmentGeometry>,
    /// Punkte ohne Segment (`SinglePoint`)
    pub points: Vec<Coordinates>,
}

impl ShapeGeometry {
    pub fn new(kind: ShapeKind, segments: Vec<SegmentGeometry>) -> Self {
        Self {
            kind,
            segments,
            points: Vec::new(),
        }
    }

    /// Form aus einem einzelnen Punkt.
    pub fn single_point(point: Coordinates) -> Self {
        Self {
            kind: ShapeKind::SinglePoint,
            segments: Vec::new(),
            points: vec![point],
        }
    }

    /// Genau ein Bogen, dessen Vertices zusammenfallen.
    pub fn is_circle(&self) -> bool {
        self.segments.len() == 1 && self.segments[0].is_circle()
    }

    /// Einzelnes offenes Segment (Strecke oder Bogen).
    pub fn is_segment(&self) -> bool {
        self.segments.len() == 1 && !self.segments[0].is_circle()
    }

    /// Geschlossener Umriss (bei `Cube`/`StripLine` immer eine Fläche).
    pub fn is_closed(&self) -> bool {
        match self.kind {
            ShapeKind::Cube | ShapeKind::StripLine => true,
            ShapeKind::SinglePoint | ShapeKind::ArrowLine => false,
            ShapeKind::Regular => match (self.segments.first(), self.segments.last()) {
                (Some(first), Some(last)) => {
                    self.segments
                        .windows(2)
                        .all(|w| w[0].vertices[1].coincides(w[1].vertices[0]))
                        && last.vertices[1].coincides(first.vertices[0])
                }
                _ => false,
            },
        }
    }

    pub fn render_hints(&self) -> RenderHints {
        self.kind.render_hints(self.is_closed())
    }

    /// Alle Vertices ohne Duplikate, in Kettenreihenfolge.
    pub fn vertices(&self) -> Vec<Coordinates> {
        let mut vertices: Vec<Coordinates> = Vec::new();
        for candidate in self
            .segments
            .iter()
            .flat_map(|s| s.vertices)
            .chain(self.points.iter().copied())
        {
            if !vertices.iter().any(|v| v.coincides(candidate)) {
                vertices.push(candidate);
            }
        }
        vertices
    }

    /// Zentrum: Kreiszentrum, sonst Schwerpunkt der Vertices.
    pub fn center(&self) -> Coordinates {
        if self.is_circle() {
            if let Some(center) = self.segments[0].arc_center {
                return center;
            }
        }
        let vertices = self.vertices();
        if vertices.is_empty() {
            return Coordinates::ZERO;
        }
        let sum = vertices
            .iter()
            .fold(Coordinates::ZERO, |acc, v| acc + *v);
        sum * (1.0 / vertices.len() as f64)
    }

    /// Achsparallele Bounding-Box (unendliche Segmente zählen mit ihren Vertices).
    pub fn bounds(&self) -> (Coordinates, Coordinates) {
        let mut points: Vec<Coordinates> = self.points.clone();
        for segment in &self.segments {
            if segment.is_infinite || segment.is_semi_infinite {
                points.extend(segment.vertices);
            } else {
                let (min, max) = segment.bounds();
                points.push(min);
                points.push(max);
            }
        }
        crate::core::segment::bounding_box(&points)
    }

    /// Pfad der Form: Fragmente aller Segmente hintereinander.
    pub fn svg_path(&self, scaling: f64) -> String {
        match self.kind {
            ShapeKind::SinglePoint => self
                .points
                .first()
                .map(|p| {
                    format!(
                        "M {} {}",
                        format_number(p.x * scaling),
                        format_number(p.y * scaling)
                    )
                })
                .unwrap_or_default(),
            ShapeKind::StripLine => self
                .segments
                .iter()
                .map(|s| s.svg_path(scaling, true, true))
                .collect::<Vec<_>>()
                .join(" "),
            _ => geometries_to_path(&self.segments, scaling),
        }
    }

    // ── Enthaltensein ─────────────────────────────────────────

    /// Liegt `coord` auf dem Umriss?
    pub fn is_coordinates_on_border(&self, coord: Coordinates) -> bool {
        self.segments
            .iter()
            .any(|s| s.is_coordinates_on_segment(coord, COINCIDENCE_EPSILON))
            || self.points.iter().any(|p| p.coincides(coord))
    }

    /// Liegt `coord` in der Form (Rand eingeschlossen)?
    pub fn is_coordinates_in_path(&self, coord: Coordinates) -> bool {
        if self.is_coordinates_on_border(coord) {
            return true;
        }
        match self.kind {
            ShapeKind::SinglePoint | ShapeKind::ArrowLine => false,
            ShapeKind::Cube => point_in_polygon(&convex_hull(&self.vertices()), coord),
            ShapeKind::StripLine => self.is_between_strip_lines(coord),
            ShapeKind::Regular => {
                if self.is_circle() {
                    let segment = &self.segments[0];
                    return segment
                        .arc_center
                        .map(|c| c.dist(coord) < segment.radius())
                        .unwrap_or(false);
                }
                self.is_closed() && point_in_polygon(&self.flattened_outline(), coord)
            }
        }
    }

    /// Strikt im Inneren (nicht auf dem Rand).
    pub fn is_coordinates_strictly_inside(&self, coord: Coordinates) -> bool {
        !self.is_coordinates_on_border(coord) && self.is_coordinates_in_path(coord)
    }

    fn is_between_strip_lines(&self, coord: Coordinates) -> bool {
        let [first, second] = match self.segments.as_slice() {
            [a, b] => [a, b],
            _ => return false,
        };
        let side = |line: &SegmentGeometry, p: Coordinates| {
            line.direction().cross(p - line.vertices[0]).signum()
        };
        side(first, coord) == side(first, second.vertices[0])
            && side(second, coord) == side(second, first.vertices[0])
    }

    /// Polygon-Approximation des geschlossenen Umrisses.
    fn flattened_outline(&self) -> Vec<Coordinates> {
        let mut polygon: Vec<Coordinates> = Vec::new();
        for segment in &self.segments {
            let mut points = segment.flatten();
            // Endpunkt = Startpunkt des nächsten Segments
            points.pop();
            polygon.extend(points);
        }
        polygon
    }

    // ── Überlappung ──────────────────────────────────────────

    /// Überlappen sich zwei Formen?
    ///
    /// Wahr, wenn Stützpunkte (Vertices, Mittelpunkte, Zentrum) einer Form
    /// strikt in der anderen liegen oder sich Segmente abseits ihrer
    /// Vertices schneiden. Teilweise gemeinsame Kanten zählen nicht.
    pub fn overlaps_with(&self, other: &ShapeGeometry) -> bool {
        if self.has_sample_inside(other) || other.has_sample_inside(self) {
            return true;
        }
        for s1 in &self.segments {
            for s2 in &other.segments {
                if s1.does_intersect(s2, true) {
                    return true;
                }
            }
        }
        false
    }

    fn has_sample_inside(&self, other: &ShapeGeometry) -> bool {
        let center = self.center();
        let own_interior = self.is_coordinates_strictly_inside(center);
        self.segments
            .iter()
            .flat_map(|s| [s.vertices[0], s.vertices[1], s.middle()])
            .chain(own_interior.then_some(center))
            .chain(self.points.iter().copied())
            .any(|sample| other.is_coordinates_strictly_inside(sample))
    }
}

/// Even-odd-Strahltest.
fn point_in_polygon(polygon: &[Coordinates], coord: Coordinates) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > coord.y) != (pj.y > coord.y)
            && coord.x < (pj.x - pi.x) * (coord.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Konvexe Hülle (Monotone Chain), gegen den Uhrzeigersinn.
fn convex_hull(points: &[Coordinates]) -> Vec<Coordinates> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    if sorted.len() < 3 {
        return sorted;
    }
    let turn = |o: Coordinates, a: Coordinates, b: Coordinates| (a - o).cross(b - o);

    let mut lower: Vec<Coordinates> = Vec::new();
    for p in &sorted {
        while lower.len() >= 2 && turn(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Coordinates> = Vec::new();
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
