//! Segment: gerade Strecke oder Kreisbogen zwischen zwei Vertices.
//!
//! Der Arena-Datensatz [`Segment`] hält nur IDs. Die eigentliche Geometrie
//! wird bei Bedarf als Wertetyp [`SegmentGeometry`] aufgelöst
//! (`World::segment_geometry`); Geometrie wird nie redundant gespeichert.

mod geometry;
mod intersection;

pub use geometry::{ArcFlags, SegmentGeometry, INFINITE_DISPLAY_OFFSET};
pub(crate) use geometry::bounding_box;

use super::{PointId, SegmentId, ShapeId};
use serde::{Deserialize, Serialize};

/// Ein Segment in der Arena der `World`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Start- und End-Vertex (bei Vollkreis identisch)
    pub vertex_ids: [PointId; 2],
    /// Teilungspunkte, sortiert nach aufsteigendem Verhältnis
    pub division_ids: Vec<PointId>,
    /// Bogenzentrum, gesetzt genau dann, wenn das Segment ein Kreisbogen ist
    pub arc_center_id: Option<PointId>,
    /// Laufrichtung des Bogens (false = steigender Winkel)
    pub counterclockwise: bool,
    /// Gerade unbegrenzt in beide Richtungen
    pub is_infinite: bool,
    /// Halbgerade ab Vertex 0 über Vertex 1 hinaus
    pub is_semi_infinite: bool,
    /// Besitzende Form
    pub shape_id: Option<ShapeId>,
    /// Position in der Segment-Liste der Form
    pub idx: usize,
}

impl Segment {
    /// Erstellt eine gerade Strecke.
    pub fn line(id: SegmentId, start: PointId, end: PointId) -> Self {
        Self {
            id,
            vertex_ids: [start, end],
            division_ids: Vec::new(),
            arc_center_id: None,
            counterclockwise: false,
            is_infinite: false,
            is_semi_infinite: false,
            shape_id: None,
            idx: 0,
        }
    }

    /// Erstellt einen Kreisbogen.
    pub fn arc(
        id: SegmentId,
        start: PointId,
        end: PointId,
        center: PointId,
        counterclockwise: bool,
    ) -> Self {
        Self {
            arc_center_id: Some(center),
            counterclockwise,
            ..Self::line(id, start, end)
        }
    }

    /// Ist das Segment ein Kreisbogen?
    pub fn is_arc(&self) -> bool {
        self.arc_center_id.is_some()
    }

    /// Alle Punkt-IDs dieses Segments (Vertices, Teilungspunkte, Zentrum).
    pub fn point_ids(&self) -> Vec<PointId> {
        let mut ids = vec![self.vertex_ids[0]];
        if self.vertex_ids[1] != self.vertex_ids[0] {
            ids.push(self.vertex_ids[1]);
        }
        ids.extend(self.division_ids.iter().copied());
        ids.extend(self.arc_center_id);
        ids
    }

    /// Vertex-Index (0/1) des Punktes, falls er ein Vertex dieses Segments ist.
    pub fn vertex_index(&self, point_id: PointId) -> Option<usize> {
        self.vertex_ids.iter().position(|id| *id == point_id)
    }
}
