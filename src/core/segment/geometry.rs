//! Aufgelöste Segment-Geometrie: Projektion, Lage-Tests, Teilung, Pfad-Fragmente.

use crate::core::coordinates::{normalize_angle, COINCIDENCE_EPSILON};
use crate::core::path::format_number;
use crate::core::Coordinates;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Verlängerung unendlicher Segmente für die Darstellung (Welt-Einheiten).
pub const INFINITE_DISPLAY_OFFSET: f64 = 10000.0;

/// Schrittweite für die Polylinien-Approximation von Bögen (2°).
const FLATTEN_STEP: f64 = PI / 90.0;

/// SVG-Flags eines Bogens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcFlags {
    pub large_arc: bool,
    pub sweep: bool,
}

/// Wertetyp mit den aufgelösten Koordinaten eines Segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentGeometry {
    pub vertices: [Coordinates; 2],
    pub arc_center: Option<Coordinates>,
    pub counterclockwise: bool,
    pub is_infinite: bool,
    pub is_semi_infinite: bool,
}

impl SegmentGeometry {
    /// Gerade, endliche Strecke.
    pub fn line(start: Coordinates, end: Coordinates) -> Self {
        Self {
            vertices: [start, end],
            arc_center: None,
            counterclockwise: false,
            is_infinite: false,
            is_semi_infinite: false,
        }
    }

    /// Kreisbogen von `start` nach `end` um `center`.
    pub fn arc(start: Coordinates, end: Coordinates, center: Coordinates, ccw: bool) -> Self {
        Self {
            arc_center: Some(center),
            counterclockwise: ccw,
            ..Self::line(start, end)
        }
    }

    /// Vollkreis, beginnend und endend in `start`.
    pub fn circle(start: Coordinates, center: Coordinates, ccw: bool) -> Self {
        Self::arc(start, start, center, ccw)
    }

    /// Unendliche Gerade durch zwei Punkte.
    pub fn infinite_line(a: Coordinates, b: Coordinates) -> Self {
        Self {
            is_infinite: true,
            ..Self::line(a, b)
        }
    }

    /// Halbgerade ab `a` in Richtung `b`.
    pub fn semi_infinite_line(a: Coordinates, b: Coordinates) -> Self {
        Self {
            is_semi_infinite: true,
            ..Self::line(a, b)
        }
    }

    pub fn is_arc(&self) -> bool {
        self.arc_center.is_some()
    }

    /// Vollkreis: Bogen, dessen beide Vertices zusammenfallen.
    pub fn is_circle(&self) -> bool {
        self.is_arc() && self.vertices[0].coincides(self.vertices[1])
    }

    fn is_unbounded(&self) -> bool {
        self.is_infinite || self.is_semi_infinite
    }

    /// Radius (0 für gerade Segmente).
    pub fn radius(&self) -> f64 {
        self.arc_center
            .map(|c| c.dist(self.vertices[0]))
            .unwrap_or(0.0)
    }

    /// Normierte Richtung Vertex 0 → Vertex 1.
    pub fn direction(&self) -> Coordinates {
        (self.vertices[1] - self.vertices[0]).normalize()
    }

    /// Winkel der beiden Vertices vom Bogenzentrum aus.
    pub fn arc_angles(&self) -> Option<(f64, f64)> {
        let center = self.arc_center?;
        Some((
            center.angle_with(self.vertices[0]),
            center.angle_with(self.vertices[1]),
        ))
    }

    /// Überstrichener Winkel des Bogens in Laufrichtung (Vollkreis = 2π).
    pub fn span(&self) -> f64 {
        let Some((a0, a1)) = self.arc_angles() else {
            return 0.0;
        };
        if self.is_circle() {
            return TAU;
        }
        if self.counterclockwise {
            normalize_angle(a0 - a1)
        } else {
            normalize_angle(a1 - a0)
        }
    }

    /// Länge (Bogenlänge bei Kreisbögen).
    pub fn length(&self) -> f64 {
        if self.is_arc() {
            self.radius() * self.span()
        } else {
            self.vertices[0].dist(self.vertices[1])
        }
    }

    /// Winkel-Offset von Vertex 0 in Laufrichtung.
    fn angular_offset(&self, angle: f64) -> f64 {
        let (a0, _) = self.arc_angles().unwrap_or((0.0, 0.0));
        if self.counterclockwise {
            normalize_angle(a0 - angle)
        } else {
            normalize_angle(angle - a0)
        }
    }

    /// Punkt auf dem Bogenkreis unter dem absoluten Winkel `angle`.
    pub fn center_projection_on_segment(&self, angle: f64) -> Option<Coordinates> {
        let center = self.arc_center?;
        Some(center + Coordinates::from_angle(angle) * self.radius())
    }

    /// Orthogonale Projektion auf die Gerade (nicht geklemmt) bzw. radiale
    /// Projektion auf den Bogenkreis.
    pub fn projection_on_segment(&self, point: Coordinates) -> Coordinates {
        match self.arc_center {
            Some(center) => {
                let dir = (point - center).normalize();
                if dir == Coordinates::ZERO {
                    return self.vertices[0];
                }
                center + dir * self.radius()
            }
            None => {
                let dir = self.direction();
                if dir == Coordinates::ZERO {
                    return self.vertices[0];
                }
                self.vertices[0] + dir * (point - self.vertices[0]).dot(dir)
            }
        }
    }

    /// Liegt `coord` auf dem Segment (Toleranz `epsilon`)?
    pub fn is_coordinates_on_segment(&self, coord: Coordinates, epsilon: f64) -> bool {
        if let Some(center) = self.arc_center {
            if (center.dist(coord) - self.radius()).abs() >= epsilon {
                return false;
            }
            if self.is_circle() {
                return true;
            }
            if coord.equal(self.vertices[0], epsilon) || coord.equal(self.vertices[1], epsilon) {
                return true;
            }
            let offset = self.angular_offset(center.angle_with(coord));
            let angular_tolerance = epsilon / self.radius().max(epsilon);
            return offset <= self.span() + angular_tolerance;
        }

        if self.is_unbounded() {
            if !self.projection_on_segment(coord).equal(coord, epsilon) {
                return false;
            }
            if self.is_semi_infinite {
                return (coord - self.vertices[0]).dot(self.direction()) >= -epsilon;
            }
            return true;
        }

        self.vertices[0].dist(coord) + coord.dist(self.vertices[1]) - self.length() < epsilon
    }

    /// Punkt beim Verhältnis `t` ∈ [0, 1] entlang des Segments.
    pub fn point_at_ratio(&self, t: f64) -> Coordinates {
        match self.arc_angles() {
            Some((a0, _)) => {
                let delta = self.span() * t;
                let angle = if self.counterclockwise {
                    a0 - delta
                } else {
                    a0 + delta
                };
                self.center_projection_on_segment(angle)
                    .unwrap_or(self.vertices[0])
            }
            None => self.vertices[0].lerp(self.vertices[1], t),
        }
    }

    /// Verhältnis eines (auf dem Segment liegenden) Punktes.
    pub fn ratio_of(&self, coord: Coordinates) -> f64 {
        if let Some(center) = self.arc_center {
            let span = self.span();
            if span <= f64::EPSILON {
                return 0.0;
            }
            if !self.is_circle() && coord.coincides(self.vertices[1]) {
                return 1.0;
            }
            return (self.angular_offset(center.angle_with(coord)) / span).clamp(0.0, 1.0);
        }
        let length = self.length();
        if length <= f64::EPSILON {
            return 0.0;
        }
        (coord - self.vertices[0]).dot(self.direction()) / length
    }

    /// Mittelpunkt des Segments (bei Bögen auf dem Bogen).
    pub fn middle(&self) -> Coordinates {
        self.point_at_ratio(0.5)
    }

    /// Einheits-Tangente in Laufrichtung am Vertex `vertex_index`.
    pub fn tangent_at(&self, vertex_index: usize) -> Coordinates {
        match self.arc_center {
            Some(center) => {
                let radial = self.vertices[vertex_index.min(1)] - center;
                let tangent = if self.counterclockwise {
                    Coordinates::new(radial.y, -radial.x)
                } else {
                    Coordinates::new(-radial.y, radial.x)
                };
                tangent.normalize()
            }
            None => self.direction(),
        }
    }

    /// Haben beide Segmente an den angegebenen Vertices dieselbe Richtung?
    ///
    /// Bögen werden über ihre Tangenten verglichen und müssen zusätzlich
    /// dasselbe Zentrum haben. Ein Bogen und eine Gerade werden nur
    /// verglichen, wenn `match_arc_and_other` gesetzt ist.
    pub fn has_same_direction(
        &self,
        other: &SegmentGeometry,
        vertex_hint1: usize,
        vertex_hint2: usize,
        match_arc_and_other: bool,
    ) -> bool {
        match (self.arc_center, other.arc_center) {
            (Some(c1), Some(c2)) => {
                if !c1.coincides(c2) {
                    return false;
                }
            }
            (None, None) => {}
            _ => {
                if !match_arc_and_other {
                    return false;
                }
            }
        }
        let t1 = self.tangent_at(vertex_hint1);
        let t2 = other.tangent_at(vertex_hint2);
        t1 != Coordinates::ZERO && t1.equal(t2, COINCIDENCE_EPSILON)
    }

    /// Umgekehrte Laufrichtung. Ohne `change_clockwise` beschreibt ein
    /// umgedrehter Bogen den Komplementärbogen.
    pub fn reversed(&self, change_clockwise: bool) -> Self {
        Self {
            vertices: [self.vertices[1], self.vertices[0]],
            counterclockwise: self.counterclockwise ^ change_clockwise,
            ..*self
        }
    }

    /// Zerlegt das Segment an den gegebenen Punkten in eine Kette von Teilsegmenten.
    ///
    /// Die Punkte werden nach ihrem Verhältnis entlang des Segments sortiert;
    /// Punkte auf den Endpunkten oder doppelte Punkte werden ignoriert.
    pub fn divide_with(&self, points: &[Coordinates]) -> Vec<SegmentGeometry> {
        let mut cuts: Vec<(f64, Coordinates)> = points
            .iter()
            .filter(|p| {
                self.is_circle() || !(p.coincides(self.vertices[0]) || p.coincides(self.vertices[1]))
            })
            .map(|p| (self.ratio_of(*p), *p))
            .collect();
        cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        cuts.dedup_by(|b, a| a.1.coincides(b.1));

        if self.is_circle() {
            // Ein Vollkreis wird erst ab seinem ersten Schnittpunkt aufgetrennt
            cuts.retain(|(_, p)| !p.coincides(self.vertices[0]));
        }

        let mut chain = Vec::with_capacity(cuts.len() + 1);
        let mut current = self.vertices[0];
        for (_, cut) in &cuts {
            chain.push(self.sub_segment(current, *cut));
            current = *cut;
        }
        chain.push(self.sub_segment(current, self.vertices[1]));
        chain
    }

    fn sub_segment(&self, start: Coordinates, end: Coordinates) -> SegmentGeometry {
        match self.arc_center {
            Some(center) => SegmentGeometry::arc(start, end, center, self.counterclockwise),
            None => SegmentGeometry::line(start, end),
        }
    }

    /// Nächster Punkt auf dem (begrenzten) Segment.
    pub fn closest_point(&self, coord: Coordinates) -> Coordinates {
        let projection = self.projection_on_segment(coord);
        if self.is_coordinates_on_segment(projection, COINCIDENCE_EPSILON) {
            return projection;
        }
        if self.vertices[0].dist(coord) <= self.vertices[1].dist(coord) {
            self.vertices[0]
        } else {
            self.vertices[1]
        }
    }

    /// Distanz eines Punktes zum Segment.
    pub fn distance_to(&self, coord: Coordinates) -> f64 {
        self.closest_point(coord).dist(coord)
    }

    /// Achsparallele Bounding-Box `(min, max)`.
    pub fn bounds(&self) -> (Coordinates, Coordinates) {
        let mut points = self.vertices.to_vec();
        if let Some(center) = self.arc_center {
            let r = self.radius();
            for k in 0..4 {
                let angle = k as f64 * FRAC_PI_2;
                if self.is_circle() || self.angular_offset(angle) <= self.span() {
                    points.push(center + Coordinates::from_angle(angle) * r);
                }
            }
        } else if self.is_unbounded() {
            let [a, b] = self.display_vertices(INFINITE_DISPLAY_OFFSET);
            points = vec![a, b];
        }
        bounding_box(&points)
    }

    /// Polylinien-Approximation inkl. beider Endpunkte (Geraden: nur Endpunkte).
    pub fn flatten(&self) -> Vec<Coordinates> {
        if !self.is_arc() {
            return self.vertices.to_vec();
        }
        let steps = ((self.span() / FLATTEN_STEP).ceil() as usize).max(2);
        let mut points: Vec<Coordinates> = (0..steps)
            .map(|i| self.point_at_ratio(i as f64 / steps as f64))
            .collect();
        points.push(self.vertices[1]);
        points
    }

    /// Vertices, bei unendlichen Segmenten um `offset` verlängert.
    pub fn display_vertices(&self, offset: f64) -> [Coordinates; 2] {
        let dir = self.direction();
        if self.is_infinite {
            [self.vertices[0] - dir * offset, self.vertices[1] + dir * offset]
        } else if self.is_semi_infinite {
            [self.vertices[0], self.vertices[1] + dir * offset]
        } else {
            self.vertices
        }
    }

    /// SVG-Flags: aus dem positiven Winkelbereich berechnet und bei
    /// umgekehrtem Umlaufsinn gemeinsam gekippt.
    pub fn arc_flags(&self) -> Option<ArcFlags> {
        let (a0, a1) = self.arc_angles()?;
        let positive_span = normalize_angle(a1 - a0);
        let mut flags = ArcFlags {
            large_arc: positive_span > PI,
            sweep: true,
        };
        if self.counterclockwise {
            flags.large_arc = !flags.large_arc;
            flags.sweep = !flags.sweep;
        }
        Some(flags)
    }

    /// Pfad-Fragment dieses Segments (`M`/`L`/`A`).
    ///
    /// Vollkreise werden als zwei Halbbögen ausgegeben, unendliche Segmente
    /// bei `infinite_check` um [`INFINITE_DISPLAY_OFFSET`] verlängert.
    pub fn svg_path(&self, scaling: f64, include_move_to: bool, infinite_check: bool) -> String {
        let [start, end] = if infinite_check {
            self.display_vertices(INFINITE_DISPLAY_OFFSET)
        } else {
            self.vertices
        };
        let start = start * scaling;
        let end = end * scaling;

        let mut path = String::new();
        if include_move_to {
            path.push_str(&format!(
                "M {} {} ",
                format_number(start.x),
                format_number(start.y)
            ));
        }

        match (self.arc_center, self.arc_flags()) {
            (Some(center), Some(flags)) => {
                let r = format_number(self.radius() * scaling);
                let sweep = u8::from(flags.sweep);
                if self.is_circle() {
                    let opposite = (center * 2.0 - self.vertices[0]) * scaling;
                    path.push_str(&format!(
                        "A {r} {r} 0 0 {sweep} {} {} A {r} {r} 0 0 {sweep} {} {}",
                        format_number(opposite.x),
                        format_number(opposite.y),
                        format_number(end.x),
                        format_number(end.y),
                    ));
                } else {
                    path.push_str(&format!(
                        "A {r} {r} 0 {} {sweep} {} {}",
                        u8::from(flags.large_arc),
                        format_number(end.x),
                        format_number(end.y),
                    ));
                }
            }
            _ => path.push_str(&format!(
                "L {} {}",
                format_number(end.x),
                format_number(end.y)
            )),
        }
        path
    }

    /// Verschiebt alle Koordinaten (nur für Vorschau-Berechnungen).
    pub fn translated(&self, delta: Coordinates) -> Self {
        Self {
            vertices: [self.vertices[0] + delta, self.vertices[1] + delta],
            arc_center: self.arc_center.map(|c| c + delta),
            ..*self
        }
    }
}

/// Bounding-Box einer Punktmenge (leere Menge → Ursprung).
pub(crate) fn bounding_box(points: &[Coordinates]) -> (Coordinates, Coordinates) {
    let Some(first) = points.first() else {
        return (Coordinates::ZERO, Coordinates::ZERO);
    };
    points.iter().skip(1).fold((*first, *first), |(min, max), p| {
        (
            Coordinates::new(min.x.min(p.x), min.y.min(p.y)),
            Coordinates::new(max.x.max(p.x), max.y.max(p.y)),
        )
    })
}
