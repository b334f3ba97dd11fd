//! Geometrische Änderungen an Formen: Transformationen, Umdrehen, Zusammenfassen, Teilung.

use super::{World, WorldError};
use crate::core::coordinates::COINCIDENCE_EPSILON;
use crate::core::shape::merge_pair;
use crate::core::{Coordinates, Point, PointId, SegmentId, ShapeId, ShapeKind};

impl World {
    /// Wendet `f` auf jeden Punkt der angegebenen Formen genau einmal an.
    fn map_shape_points(
        &mut self,
        shape_ids: &[ShapeId],
        f: impl Fn(&mut Point),
    ) -> Result<(), WorldError> {
        let mut point_ids: Vec<PointId> = Vec::new();
        for shape_id in shape_ids {
            if !self.shapes.contains_key(shape_id) {
                return Err(WorldError::MissingShape(*shape_id));
            }
            for id in self.owned_point_ids(*shape_id) {
                if !point_ids.contains(&id) {
                    point_ids.push(id);
                }
            }
        }
        for id in point_ids {
            if let Some(point) = self.points.get_mut(&id) {
                f(point);
            }
        }
        self.rebuild_spatial_index();
        Ok(())
    }

    /// Verschiebt Formen um `delta`.
    pub fn translate_shapes(
        &mut self,
        shape_ids: &[ShapeId],
        delta: Coordinates,
    ) -> Result<(), WorldError> {
        self.map_shape_points(shape_ids, |p| p.translate(delta))
    }

    /// Rotiert Formen um `center`.
    pub fn rotate_shapes(
        &mut self,
        shape_ids: &[ShapeId],
        angle: f64,
        center: Coordinates,
    ) -> Result<(), WorldError> {
        self.map_shape_points(shape_ids, |p| p.rotate(angle, center))
    }

    /// Zentrische Streckung: skalieren, dann so verschieben, dass `center` fest bleibt.
    pub fn homothety_shapes(
        &mut self,
        shape_ids: &[ShapeId],
        factor: f64,
        center: Coordinates,
    ) -> Result<(), WorldError> {
        let offset = center - center * factor;
        self.map_shape_points(shape_ids, |p| {
            p.scale(factor);
            p.translate(offset);
        })
    }

    /// Spiegelt alle Punkte der Formen an der Achse `a → b`.
    pub fn reflect_shapes(
        &mut self,
        shape_ids: &[ShapeId],
        a: Coordinates,
        b: Coordinates,
    ) -> Result<(), WorldError> {
        self.map_shape_points(shape_ids, |p| p.coordinates = p.coordinates.reflect(a, b))
    }

    /// Dreht eine Form um: Bogen-Laufrichtungen kippen, Biface-Farbe
    /// komplementieren, `is_reversed` umschalten.
    pub fn reverse_shape(&mut self, shape_id: ShapeId) -> Result<(), WorldError> {
        let shape = self
            .shapes
            .get_mut(&shape_id)
            .ok_or(WorldError::MissingShape(shape_id))?;
        for segment_id in &shape.segment_ids {
            if let Some(segment) = self.segments.get_mut(segment_id) {
                if segment.is_arc() {
                    segment.counterclockwise = !segment.counterclockwise;
                }
            }
        }
        shape.reverse_attributes();
        Ok(())
    }

    /// Kehrt ein Segment um: Vertices tauschen, Teilungspunkte auf
    /// `1 - ratio` setzen und ihre Reihenfolge umkehren, optional die
    /// Bogenrichtung kippen.
    pub fn reverse_segment(
        &mut self,
        segment_id: SegmentId,
        change_clockwise: bool,
    ) -> Result<(), WorldError> {
        let segment = self
            .segments
            .get_mut(&segment_id)
            .ok_or(WorldError::MissingSegment(segment_id))?;
        segment.vertex_ids.swap(0, 1);
        segment.division_ids.reverse();
        if change_clockwise && segment.is_arc() {
            segment.counterclockwise = !segment.counterclockwise;
        }
        for id in &segment.division_ids {
            if let Some(ratio) = self.points.get_mut(id).and_then(|p| p.ratio.as_mut()) {
                *ratio = 1.0 - *ratio;
            }
        }
        Ok(())
    }

    /// Kehrt den Umlaufsinn einer regulären Form um, ohne ihre Geometrie zu
    /// ändern. Formen mit Halbgeraden bleiben unverändert.
    pub fn reverse_outline(&mut self, shape_id: ShapeId) -> Result<(), WorldError> {
        let shape = self
            .shapes
            .get(&shape_id)
            .ok_or(WorldError::MissingShape(shape_id))?;
        if shape.kind != ShapeKind::Regular {
            return Ok(());
        }
        let mut segment_ids = shape.segment_ids.clone();
        let has_ray = segment_ids
            .iter()
            .filter_map(|id| self.segments.get(id))
            .any(|s| s.is_semi_infinite);
        if has_ray {
            return Ok(());
        }
        segment_ids.reverse();
        for id in &segment_ids {
            self.reverse_segment(*id, true)?;
        }
        if let Some(shape) = self.shapes.get_mut(&shape_id) {
            shape.segment_ids = segment_ids;
        }
        self.reindex_segments(shape_id);
        Ok(())
    }

    /// Setzt `idx` und Besitzer aller Segmente einer Form neu.
    pub fn reindex_segments(&mut self, shape_id: ShapeId) {
        let Some(shape) = self.shapes.get(&shape_id) else {
            return;
        };
        for (idx, segment_id) in shape.segment_ids.iter().enumerate() {
            if let Some(segment) = self.segments.get_mut(segment_id) {
                segment.idx = idx;
                segment.shape_id = Some(shape_id);
            }
        }
    }

    /// Entfernt einen Punkt, falls ihn kein Segment und keine Form mehr referenziert.
    fn remove_point_if_orphaned(&mut self, point_id: PointId) {
        let referenced_by_shape = self
            .shapes
            .values()
            .any(|s| s.point_ids.contains(&point_id) || s.center_id == Some(point_id));
        let orphaned = self
            .points
            .get(&point_id)
            .map(|p| p.segment_ids.is_empty() && !referenced_by_shape)
            .unwrap_or(false);
        if orphaned {
            self.points.remove(&point_id);
        }
    }

    // ── Zusammenfassen ──────────────────────────────────────────

    /// Verschmilzt aufeinanderfolgende Segmente gleicher Richtung und
    /// löscht die gemeinsamen Mittel-Vertices. Ein Kreis mit Radius 0
    /// wird zur `SinglePoint`-Form. Liefert `true`, wenn sich etwas geändert hat.
    pub fn clean_same_direction(&mut self, shape_id: ShapeId) -> Result<bool, WorldError> {
        let geometry = self
            .shape_geometry(shape_id)
            .ok_or(WorldError::MissingShape(shape_id))?;
        if geometry.kind == ShapeKind::SinglePoint {
            return Ok(false);
        }
        if geometry.is_circle() && geometry.segments[0].radius() < COINCIDENCE_EPSILON {
            self.collapse_to_single_point(shape_id)?;
            return Ok(true);
        }
        let closed = geometry.is_closed();

        let mut changed = false;
        let mut i = 0;
        loop {
            let segment_ids = self
                .shapes
                .get(&shape_id)
                .map(|s| s.segment_ids.clone())
                .unwrap_or_default();
            let n = segment_ids.len();
            if n < 2 || i >= n {
                break;
            }
            let j = if i + 1 < n {
                i + 1
            } else if closed {
                0
            } else {
                break;
            };
            if self.merge_segments(shape_id, segment_ids[i], segment_ids[j])? {
                changed = true;
                if j < i {
                    i -= 1;
                }
            } else {
                i += 1;
            }
        }

        if changed {
            self.reindex_segments(shape_id);
            self.rebuild_spatial_index();
        }
        Ok(changed)
    }

    /// Verschmilzt `second` in `first`, falls beide dieselbe Richtung haben.
    fn merge_segments(
        &mut self,
        shape_id: ShapeId,
        first_id: SegmentId,
        second_id: SegmentId,
    ) -> Result<bool, WorldError> {
        let first_geo = self
            .segment_geometry(first_id)
            .ok_or(WorldError::MissingSegment(first_id))?;
        let second_geo = self
            .segment_geometry(second_id)
            .ok_or(WorldError::MissingSegment(second_id))?;
        let (Some(first), Some(second)) = (self.segments.get(&first_id), self.segments.get(&second_id))
        else {
            return Ok(false);
        };
        // Der Mittel-Vertex muss derselbe Punkt sein
        if first.vertex_ids[1] != second.vertex_ids[0] {
            return Ok(false);
        }
        let Some(merged) = merge_pair(&first_geo, &second_geo) else {
            return Ok(false);
        };

        let middle = first.vertex_ids[1];
        let new_end = second.vertex_ids[1];
        let mut divisions: Vec<PointId> = first.division_ids.clone();
        divisions.extend(second.division_ids.iter().copied());
        let second_center = second.arc_center_id;
        let first_center = first.arc_center_id;

        // Teilungspunkte auf das verschmolzene Segment umrechnen
        let mut with_ratio: Vec<(f64, PointId)> = divisions
            .iter()
            .filter_map(|pid| {
                let coords = self.coordinates(*pid)?;
                Some((merged.ratio_of(coords), *pid))
            })
            .collect();
        with_ratio.sort_by(|a, b| a.0.total_cmp(&b.0));
        for (ratio, pid) in &with_ratio {
            if let Some(point) = self.points.get_mut(pid) {
                point.ratio = Some(ratio.clamp(0.0, 1.0));
                point.detach_segment(second_id);
                point.attach_segment(first_id);
            }
        }

        if let Some(segment) = self.segments.get_mut(&first_id) {
            segment.vertex_ids[1] = new_end;
            segment.division_ids = with_ratio.iter().map(|(_, pid)| *pid).collect();
        }
        self.segments.remove(&second_id);
        if let Some(shape) = self.shapes.get_mut(&shape_id) {
            shape.segment_ids.retain(|id| *id != second_id);
        }

        for point_id in [middle, new_end] {
            if let Some(point) = self.points.get_mut(&point_id) {
                point.detach_segment(second_id);
            }
        }
        if let Some(point) = self.points.get_mut(&new_end) {
            point.attach_segment(first_id);
        }
        if let Some(point) = self.points.get_mut(&middle) {
            point.detach_segment(first_id);
        }
        self.remove_point_if_orphaned(middle);
        if second_center != first_center {
            if let Some(center) = second_center {
                if let Some(point) = self.points.get_mut(&center) {
                    point.detach_segment(second_id);
                }
                self.remove_point_if_orphaned(center);
            }
        }
        Ok(true)
    }

    fn collapse_to_single_point(&mut self, shape_id: ShapeId) -> Result<(), WorldError> {
        let shape = self
            .shapes
            .get_mut(&shape_id)
            .ok_or(WorldError::MissingShape(shape_id))?;
        let segment_ids = std::mem::take(&mut shape.segment_ids);
        shape.kind = ShapeKind::SinglePoint;
        let mut keep: Option<PointId> = None;
        for segment_id in segment_ids {
            let Some(segment) = self.segments.remove(&segment_id) else {
                continue;
            };
            keep = keep.or(Some(segment.vertex_ids[0]));
            for point_id in segment.point_ids() {
                if let Some(point) = self.points.get_mut(&point_id) {
                    point.detach_segment(segment_id);
                }
                if Some(point_id) != keep {
                    self.remove_point_if_orphaned(point_id);
                }
            }
        }
        if let (Some(point_id), Some(shape)) = (keep, self.shapes.get_mut(&shape_id)) {
            shape.point_ids.push(point_id);
        }
        self.rebuild_spatial_index();
        Ok(())
    }

    // ── Teilungspunkte ──────────────────────────────────────────

    /// Fügt einen Teilungspunkt in ein Segment ein (Position nach Verhältnis).
    pub fn add_division_point(
        &mut self,
        segment_id: SegmentId,
        mut point: Point,
    ) -> Result<(), WorldError> {
        if self.id_in_use(point.id.0) {
            return Err(WorldError::IdInUse(point.id.0));
        }
        let segment = self
            .segments
            .get(&segment_id)
            .ok_or(WorldError::MissingSegment(segment_id))?;
        let ratio = point.ratio.unwrap_or(0.0);
        let index = segment
            .division_ids
            .iter()
            .position(|pid| {
                self.points
                    .get(pid)
                    .and_then(|p| p.ratio)
                    .map(|r| r > ratio)
                    .unwrap_or(false)
            })
            .unwrap_or(segment.division_ids.len());
        point.shape_id = segment.shape_id;
        point.attach_segment(segment_id);
        let point_id = point.id;
        self.points.insert(point_id, point);
        if let Some(segment) = self.segments.get_mut(&segment_id) {
            segment.division_ids.insert(index, point_id);
        }
        self.rebuild_spatial_index();
        Ok(())
    }

    /// Entfernt einen Teilungspunkt; liefert Segment, Position und Punkt.
    pub fn remove_division_point(
        &mut self,
        point_id: PointId,
    ) -> Result<(SegmentId, usize, Point), WorldError> {
        let point = self
            .points
            .get(&point_id)
            .ok_or(WorldError::MissingPoint(point_id))?;
        let segment_id = point
            .segment_ids
            .first()
            .copied()
            .ok_or(WorldError::MissingPoint(point_id))?;
        let segment = self
            .segments
            .get_mut(&segment_id)
            .ok_or(WorldError::MissingSegment(segment_id))?;
        let index = segment
            .division_ids
            .iter()
            .position(|id| *id == point_id)
            .ok_or(WorldError::MissingPoint(point_id))?;
        segment.division_ids.remove(index);
        let point = self
            .points
            .remove(&point_id)
            .ok_or(WorldError::MissingPoint(point_id))?;
        self.rebuild_spatial_index();
        Ok((segment_id, index, point))
    }

    /// Setzt einen entfernten Teilungspunkt an seine alte Position zurück.
    pub fn restore_division_point(
        &mut self,
        segment_id: SegmentId,
        index: usize,
        point: Point,
    ) -> Result<(), WorldError> {
        if self.id_in_use(point.id.0) {
            return Err(WorldError::IdInUse(point.id.0));
        }
        let segment = self
            .segments
            .get_mut(&segment_id)
            .ok_or(WorldError::MissingSegment(segment_id))?;
        let index = index.min(segment.division_ids.len());
        segment.division_ids.insert(index, point.id);
        self.points.insert(point.id, point);
        self.rebuild_spatial_index();
        Ok(())
    }
}
