//! Teilungspunkte auf Segmenten.

use super::{ActionError, Reversible};
use crate::core::{Point, PointId, PointType, SegmentId, World, WorldError};
use serde::{Deserialize, Serialize};

/// Verhältnis eines Punktes auf einem Segment: Vertices 0/1, Teilungspunkte ihr `ratio`.
fn ratio_on_segment(world: &World, segment_id: SegmentId, point_id: PointId) -> Option<f64> {
    let segment = world.segment(segment_id)?;
    if segment.vertex_ids[0] == point_id {
        return Some(0.0);
    }
    if segment.vertex_ids[1] == point_id {
        return Some(1.0);
    }
    if segment.division_ids.contains(&point_id) {
        return world.point(point_id).and_then(|p| p.ratio);
    }
    None
}

// ── DivideSegment ───────────────────────────────────────────────────

/// Teilt ein Segment (oder den Abschnitt zwischen zwei seiner Punkte) in
/// `parts` gleich lange Teile und legt die Teilungspunkte an.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivideSegment {
    pub segment_id: SegmentId,
    pub parts: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<PointId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<PointId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub created: Vec<Point>,
}

impl DivideSegment {
    /// Ganzes Segment teilen.
    pub fn whole(segment_id: SegmentId, parts: usize) -> Self {
        Self {
            segment_id,
            parts,
            from: None,
            to: None,
            created: Vec::new(),
        }
    }

    /// Abschnitt zwischen zwei Punkten desselben Segments teilen.
    pub fn between(segment_id: SegmentId, parts: usize, from: PointId, to: PointId) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::whole(segment_id, parts)
        }
    }

    fn ratio_range(&self, world: &World) -> Result<(f64, f64), ActionError> {
        match (self.from, self.to) {
            (None, None) => Ok((0.0, 1.0)),
            (Some(from), Some(to)) => {
                let r0 = ratio_on_segment(world, self.segment_id, from).ok_or_else(|| {
                    ActionError::InvalidParameter(format!("{from} liegt nicht auf {}", self.segment_id))
                })?;
                let r1 = ratio_on_segment(world, self.segment_id, to).ok_or_else(|| {
                    ActionError::InvalidParameter(format!("{to} liegt nicht auf {}", self.segment_id))
                })?;
                Ok(if r0 <= r1 { (r0, r1) } else { (r1, r0) })
            }
            _ => Err(ActionError::MissingParameter("from/to")),
        }
    }

    fn build(&self, world: &World) -> Result<Vec<Point>, ActionError> {
        let geometry = world
            .segment_geometry(self.segment_id)
            .ok_or(WorldError::MissingSegment(self.segment_id))?;
        let existing: Vec<PointId> = world
            .segment(self.segment_id)
            .map(|s| s.point_ids())
            .unwrap_or_default();
        let (r0, r1) = self.ratio_range(world)?;
        let mut ids = world.allocator();
        let mut points = Vec::new();
        for k in 1..self.parts {
            let ratio = r0 + (r1 - r0) * k as f64 / self.parts as f64;
            let coords = geometry.point_at_ratio(ratio);
            let taken = existing
                .iter()
                .filter_map(|id| world.coordinates(*id))
                .any(|c| c.coincides(coords));
            if !taken {
                points.push(Point::division(ids.point(), coords, ratio));
            }
        }
        if points.is_empty() {
            return Err(ActionError::Geometry("keine neuen Teilungspunkte"));
        }
        Ok(points)
    }
}

impl Reversible for DivideSegment {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        let segment = world
            .segment(self.segment_id)
            .ok_or(WorldError::MissingSegment(self.segment_id))?;
        if segment.is_infinite || segment.is_semi_infinite {
            return Err(ActionError::Geometry("unendliches Segment"));
        }
        if self.parts < 2 {
            return Err(ActionError::InvalidParameter(format!(
                "parts = {} (mindestens 2)",
                self.parts
            )));
        }
        if self.from.is_some() && self.from == self.to {
            return Err(ActionError::InvalidParameter("from und to sind gleich".into()));
        }
        let (r0, r1) = self.ratio_range(world)?;
        if r1 - r0 <= 0.0 {
            return Err(ActionError::Geometry("leerer Abschnitt"));
        }
        for point in &self.created {
            if world.id_in_use(point.id.0) {
                return Err(WorldError::IdInUse(point.id.0).into());
            }
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        if self.created.is_empty() {
            self.created = self.build(world)?;
        }
        for (index, point) in self.created.iter().enumerate() {
            if let Err(err) = world.add_division_point(self.segment_id, point.clone()) {
                for added in self.created[..index].iter().rev() {
                    let _ = world.remove_division_point(added.id);
                }
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        if self.created.is_empty() {
            return Err(ActionError::NotExecuted);
        }
        match self.created.iter().find(|p| world.point(p.id).is_none()) {
            Some(point) => Err(WorldError::MissingPoint(point.id).into()),
            None => Ok(()),
        }
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        for point in self.created.iter().rev() {
            world.remove_division_point(point.id)?;
        }
        Ok(())
    }
}

// ── RemoveDivisionPoint ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDivisionPoint {
    pub point_id: PointId,
    /// Segment, Position und Punkt vor dem Entfernen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<(SegmentId, usize, Point)>,
}

impl RemoveDivisionPoint {
    pub fn new(point_id: PointId) -> Self {
        Self {
            point_id,
            removed: None,
        }
    }
}

impl Reversible for RemoveDivisionPoint {
    fn check_do_parameters(&self, world: &World) -> Result<(), ActionError> {
        let point = world
            .point(self.point_id)
            .ok_or(WorldError::MissingPoint(self.point_id))?;
        if point.point_type != PointType::DivisionPoint {
            return Err(ActionError::InvalidParameter(format!(
                "{} ist kein Teilungspunkt",
                self.point_id
            )));
        }
        Ok(())
    }

    fn execute(&mut self, world: &mut World) -> Result<(), ActionError> {
        self.removed = Some(world.remove_division_point(self.point_id)?);
        Ok(())
    }

    fn check_undo_parameters(&self, world: &World) -> Result<(), ActionError> {
        let (segment_id, _, point) = self.removed.as_ref().ok_or(ActionError::NotExecuted)?;
        if world.segment(*segment_id).is_none() {
            return Err(WorldError::MissingSegment(*segment_id).into());
        }
        if world.id_in_use(point.id.0) {
            return Err(WorldError::IdInUse(point.id.0).into());
        }
        Ok(())
    }

    fn undo(&mut self, world: &mut World) -> Result<(), ActionError> {
        let (segment_id, index, point) = self.removed.take().ok_or(ActionError::NotExecuted)?;
        world.restore_division_point(segment_id, index, point)?;
        Ok(())
    }
}
