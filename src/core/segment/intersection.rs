//! Schnittpunkte zwischen Segmenten (Gerade–Gerade, Gerade–Kreis, Kreis–Kreis).

use super::SegmentGeometry;
use crate::core::coordinates::{COINCIDENCE_EPSILON, INTERSECTION_PRECISION};
use crate::core::Coordinates;

/// Steigungs-Toleranz, unter der zwei Geraden als parallel gelten.
const SLOPE_TOLERANCE: f64 = 0.001;

/// Horizontale Ausdehnung, unter der eine Gerade als senkrecht gilt.
const VERTICAL_TOLERANCE: f64 = 1e-9;

impl SegmentGeometry {
    /// Schnittpunkte mit `other`, gefiltert auf beide Segmente (Toleranz
    /// `precision`) und sortiert nach (y, x). `None` wenn keine existieren.
    pub fn intersection_with(
        &self,
        other: &SegmentGeometry,
        precision: f64,
    ) -> Option<Vec<Coordinates>> {
        self.intersection_with_hint(other, precision, None)
    }

    /// Wie [`Self::intersection_with`]; `hint` löst den Sonderfall zweier
    /// identischer Geraden auf (der Hinweis wird geliefert, wenn er auf beiden liegt).
    pub fn intersection_with_hint(
        &self,
        other: &SegmentGeometry,
        precision: f64,
        hint: Option<Coordinates>,
    ) -> Option<Vec<Coordinates>> {
        let raw = match (self.arc_center, other.arc_center) {
            (None, None) => line_line(self, other, hint),
            (None, Some(center)) => line_circle(self, center, other.radius()),
            (Some(center), None) => line_circle(other, center, self.radius()),
            (Some(c1), Some(c2)) => circle_circle(c1, self.radius(), c2, other.radius()),
        };

        let mut points: Vec<Coordinates> = Vec::with_capacity(raw.len());
        for candidate in raw {
            if !self.is_coordinates_on_segment(candidate, precision)
                || !other.is_coordinates_on_segment(candidate, precision)
            {
                continue;
            }
            if points.iter().any(|p| p.coincides(candidate)) {
                continue;
            }
            points.push(candidate);
        }
        if points.is_empty() {
            return None;
        }
        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        Some(points)
    }

    /// Schneiden sich die Segmente (Standard-Präzision)? Mit
    /// `false_if_edge_point` zählen Schnittpunkte auf einem Vertex eines der
    /// beiden Segmente nicht.
    pub fn does_intersect(&self, other: &SegmentGeometry, false_if_edge_point: bool) -> bool {
        let Some(points) = self.intersection_with(other, INTERSECTION_PRECISION) else {
            return false;
        };
        if !false_if_edge_point {
            return true;
        }
        let vertices = [
            self.vertices[0],
            self.vertices[1],
            other.vertices[0],
            other.vertices[1],
        ];
        points
            .iter()
            .any(|p| !vertices.iter().any(|v| v.coincides(*p)))
    }
}

/// Steigung und Achsenabschnitt, `None` für senkrechte Geraden.
fn slope_intercept(segment: &SegmentGeometry) -> Option<(f64, f64)> {
    let [a, b] = segment.vertices;
    let dx = b.x - a.x;
    if dx.abs() < VERTICAL_TOLERANCE {
        return None;
    }
    let slope = (b.y - a.y) / dx;
    Some((slope, a.y - slope * a.x))
}

fn line_line(
    first: &SegmentGeometry,
    second: &SegmentGeometry,
    hint: Option<Coordinates>,
) -> Vec<Coordinates> {
    let parallel_fallback = || {
        hint.filter(|h| {
            first.projection_on_segment(*h).coincides(*h)
                && second.projection_on_segment(*h).coincides(*h)
        })
        .into_iter()
        .collect()
    };

    match (slope_intercept(first), slope_intercept(second)) {
        (None, None) => parallel_fallback(),
        (None, Some((m, q))) => {
            let x = first.vertices[0].x;
            vec![Coordinates::new(x, m * x + q)]
        }
        (Some((m, q)), None) => {
            let x = second.vertices[0].x;
            vec![Coordinates::new(x, m * x + q)]
        }
        (Some((m1, q1)), Some((m2, q2))) => {
            if (m1 - m2).abs() < SLOPE_TOLERANCE {
                return parallel_fallback();
            }
            let x = (q2 - q1) / (m1 - m2);
            // Flachere Gerade für y: numerisch stabiler
            let y = if m1.abs() <= m2.abs() {
                m1 * x + q1
            } else {
                m2 * x + q2
            };
            vec![Coordinates::new(x, y)]
        }
    }
}

fn line_circle(line: &SegmentGeometry, center: Coordinates, radius: f64) -> Vec<Coordinates> {
    let dir = line.direction();
    if dir == Coordinates::ZERO || radius <= 0.0 {
        return Vec::new();
    }
    let foot = line.projection_on_segment(center);
    let distance = foot.dist(center);

    if (distance - radius).abs() < COINCIDENCE_EPSILON {
        return vec![foot];
    }
    if distance > radius {
        return Vec::new();
    }
    let half_chord = (radius * radius - distance * distance).sqrt();
    vec![foot - dir * half_chord, foot + dir * half_chord]
}

fn circle_circle(c1: Coordinates, r1: f64, c2: Coordinates, r2: f64) -> Vec<Coordinates> {
    let d = c1.dist(c2);
    // konzentrisch
    if d < COINCIDENCE_EPSILON {
        return Vec::new();
    }
    // disjunkt oder ineinander enthalten
    if d > r1 + r2 + COINCIDENCE_EPSILON || d < (r1 - r2).abs() - COINCIDENCE_EPSILON {
        return Vec::new();
    }

    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let axis = (c2 - c1) * (1.0 / d);
    let base = c1 + axis * a;

    let tangent =
        (d - (r1 + r2)).abs() < COINCIDENCE_EPSILON || (d - (r1 - r2).abs()).abs() < COINCIDENCE_EPSILON;
    let h_squared = r1 * r1 - a * a;
    if tangent || h_squared <= 0.0 {
        return vec![base];
    }
    let h = h_squared.sqrt();
    let normal = Coordinates::new(-axis.y, axis.x);
    vec![base + normal * h, base - normal * h]
}
