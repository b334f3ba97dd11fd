//! Benannter, typisierter Ort in der Ebene (Vertex, Teilungspunkt, Bogenzentrum, …).

use super::{Color, Coordinates, PointId, SegmentId, ShapeId};
use serde::{Deserialize, Serialize};

/// Rolle eines Punktes im Objektmodell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointType {
    /// Ecke eines Segments / einer Form
    #[default]
    Vertex,
    /// Punkt auf einem Segment bei gegebenem Verhältnis
    DivisionPoint,
    /// Zentrum eines Kreisbogens (wird nie als Umriss gezeichnet)
    ArcCenter,
    /// Zentrum einer Form (sichtbar wenn `is_center_shown`)
    ShapeCenter,
    /// Freier Punkt ohne Besitzer
    Free,
}

/// Ein Punkt in der Arena der `World`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub coordinates: Coordinates,
    pub point_type: PointType,
    /// Segmente, die diesen Punkt referenzieren
    pub segment_ids: Vec<SegmentId>,
    /// Besitzende Form (optional)
    pub shape_id: Option<ShapeId>,
    /// Position entlang des Segments (nur Teilungspunkte), in [0, 1]
    pub ratio: Option<f64>,
    pub visible: bool,
    pub color: Color,
}

impl Point {
    /// Erstellt einen Punkt ohne Besitzer-Referenzen.
    pub fn new(id: PointId, coordinates: Coordinates, point_type: PointType) -> Self {
        Self {
            id,
            coordinates,
            point_type,
            segment_ids: Vec::new(),
            shape_id: None,
            ratio: None,
            visible: point_type != PointType::ArcCenter,
            color: Color::BLACK,
        }
    }

    /// Erstellt einen Teilungspunkt mit Verhältnis.
    pub fn division(id: PointId, coordinates: Coordinates, ratio: f64) -> Self {
        let mut point = Self::new(id, coordinates, PointType::DivisionPoint);
        point.ratio = Some(ratio.clamp(0.0, 1.0));
        point
    }

    /// Verschiebt den Punkt um `delta`.
    pub fn translate(&mut self, delta: Coordinates) {
        self.coordinates = self.coordinates + delta;
    }

    /// Skaliert den Punkt relativ zum Ursprung.
    pub fn scale(&mut self, factor: f64) {
        self.coordinates = self.coordinates * factor;
    }

    /// Rotiert den Punkt um `center`.
    pub fn rotate(&mut self, angle: f64, center: Coordinates) {
        self.coordinates = self.coordinates.rotate(angle, center);
    }

    /// Referenz auf ein Segment hinzufügen (idempotent).
    pub fn attach_segment(&mut self, segment_id: SegmentId) {
        if !self.segment_ids.contains(&segment_id) {
            self.segment_ids.push(segment_id);
        }
    }

    /// Referenz auf ein Segment entfernen.
    pub fn detach_segment(&mut self, segment_id: SegmentId) {
        self.segment_ids.retain(|id| *id != segment_id);
    }

    /// Ist der Punkt ein Vertex?
    pub fn is_vertex(&self) -> bool {
        self.point_type == PointType::Vertex
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_center_is_hidden_by_default() {
        let p = Point::new(PointId(1), Coordinates::ZERO, PointType::ArcCenter);
        assert!(!p.visible);
        let v = Point::new(PointId(2), Coordinates::ZERO, PointType::Vertex);
        assert!(v.visible);
    }

    #[test]
    fn transforms_delegate_to_coordinates() {
        let mut p = Point::new(PointId(1), Coordinates::new(1.0, 0.0), PointType::Free);
        p.translate(Coordinates::new(1.0, 1.0));
        assert_eq!(p.coordinates, Coordinates::new(2.0, 1.0));
        p.scale(2.0);
        assert_eq!(p.coordinates, Coordinates::new(4.0, 2.0));
        p.rotate(std::f64::consts::PI, Coordinates::ZERO);
        assert!(p.coordinates.equal(Coordinates::new(-4.0, -2.0), 1e-9));
    }

    #[test]
    fn segment_references_are_unique() {
        let mut p = Point::new(PointId(1), Coordinates::ZERO, PointType::Vertex);
        p.attach_segment(SegmentId(3));
        p.attach_segment(SegmentId(3));
        p.attach_segment(SegmentId(4));
        assert_eq!(p.segment_ids, vec![SegmentId(3), SegmentId(4)]);
        p.detach_segment(SegmentId(3));
        assert_eq!(p.segment_ids, vec![SegmentId(4)]);
    }

    #[test]
    fn division_ratio_is_clamped() {
        let p = Point::division(PointId(9), Coordinates::ZERO, 1.5);
        assert_eq!(p.ratio, Some(1.0));
        assert_eq!(p.point_type, PointType::DivisionPoint);
    }
}
